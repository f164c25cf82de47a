//! # Stream Decoder
//!
//! Turns token ids back into bytes. The bulk path concatenates every
//! token's expansion in order; the streaming path holds back any
//! trailing bytes that don't yet form a complete UTF-8 sequence, so a
//! caller emitting output incrementally never sees a codepoint split
//! across two `decode_one` calls.

use crate::types::TokenId;
use crate::vocab::Vocabulary;

/// The maximum number of bytes a UTF-8 sequence can carry across a
/// `decode_one` call: three continuation bytes waiting on a fourth.
const MAX_CARRY: usize = 3;

/// The length, in bytes, of the UTF-8 sequence starting at `lead`.
///
/// Continuation bytes (`10xxxxxx`) and the two invalid lead patterns
/// (`11111xxx`) have no defined length; both are treated as length 1 so a
/// decoder facing corrupt input always makes forward progress instead of
/// stalling on a byte it can never complete.
fn utf8_len_from_lead(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// Decode a full id sequence to bytes in one shot.
///
/// ## Arguments
/// * `ids` - The token ids to decode. Ids `>= vocab.vocab_size()` are
///   skipped with a logged warning rather than rejected.
/// * `vocab` - The vocabulary to expand each id against.
///
/// ## Returns
/// The concatenation of every resolvable id's byte expansion, in order.
pub fn decode_bulk(
    ids: &[TokenId],
    vocab: &Vocabulary,
) -> Vec<u8> {
    let mut out = Vec::new();
    for &id in ids {
        match vocab.bytes_of(id) {
            Some(bytes) => out.extend_from_slice(bytes),
            None => log::warn!("decode_bulk: token id {id} is outside the vocabulary, skipping"),
        }
    }
    out
}

/// Incremental decoder that withholds an incomplete trailing UTF-8
/// sequence between calls.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    carry: [u8; MAX_CARRY],
    carry_len: usize,
}

impl StreamDecoder {
    /// Create a decoder with no pending carry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a single token id, returning the bytes now safe to emit.
    ///
    /// Any trailing bytes that don't yet complete a UTF-8 sequence are
    /// held back and prefixed onto the next call's output instead.
    ///
    /// ## Arguments
    /// * `id` - The token id to decode.
    /// * `vocab` - The vocabulary to expand `id` against.
    ///
    /// ## Returns
    /// The bytes that are now complete and safe to emit. Empty if `id`'s
    /// entire expansion had to be held back as carry, or if `id` is
    /// outside the vocabulary (the carry can never be completed now, so
    /// it is dropped rather than emitted).
    pub fn decode_one(
        &mut self,
        id: TokenId,
        vocab: &Vocabulary,
    ) -> Vec<u8> {
        let Some(token_bytes) = vocab.bytes_of(id) else {
            log::warn!("decode_one: token id {id} is outside the vocabulary, clearing carry");
            self.clear();
            return Vec::new();
        };

        let mut buf = Vec::with_capacity(self.carry_len + token_bytes.len());
        buf.extend_from_slice(&self.carry[..self.carry_len]);
        buf.extend_from_slice(token_bytes);

        let mut complete = 0;
        let mut i = utf8_len_from_lead(buf[0]);
        while i <= buf.len() {
            complete = i;
            if i == buf.len() {
                break;
            }
            i += utf8_len_from_lead(buf[i]);
        }

        let remainder = &buf[complete..];
        self.carry_len = remainder.len();
        self.carry[..self.carry_len].copy_from_slice(remainder);

        buf.truncate(complete);
        buf
    }

    /// Whether any bytes are currently being held back as carry.
    pub fn has_carry(&self) -> bool {
        self.carry_len > 0
    }

    /// Zero the pending carry, discarding any withheld bytes.
    pub fn clear(&mut self) {
        self.carry_len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pair;

    fn simple_vocab() -> Vocabulary {
        let merges: [Pair; 0] = [];
        Vocabulary::build(&merges).unwrap()
    }

    #[test]
    fn test_decode_bulk_ascii() {
        let vocab = simple_vocab();
        let ids: Vec<TokenId> = b"hello".iter().map(|&b| TokenId::from(b)).collect();
        assert_eq!(decode_bulk(&ids, &vocab), b"hello".to_vec());
    }

    #[test]
    fn test_decode_bulk_skips_unknown_id() {
        let vocab = simple_vocab();
        let ids = vec![TokenId::from(b'a'), 9000, TokenId::from(b'b')];
        assert_eq!(decode_bulk(&ids, &vocab), b"ab".to_vec());
    }

    #[test]
    fn test_stream_decoder_holds_incomplete_sequence() {
        // U+00E9 'é' = 0xC3 0xA9, split across two decode_one calls.
        let vocab = simple_vocab();
        let mut decoder = StreamDecoder::new();

        let first = decoder.decode_one(0xC3, &vocab);
        assert!(first.is_empty());
        assert!(decoder.has_carry());

        let second = decoder.decode_one(0xA9, &vocab);
        assert_eq!(second, vec![0xC3, 0xA9]);
        assert!(!decoder.has_carry());
    }

    #[test]
    fn test_stream_decoder_whole_sequence_in_one_call() {
        let vocab = simple_vocab();
        let mut decoder = StreamDecoder::new();
        let out = decoder.decode_one(TokenId::from(b'x'), &vocab);
        assert_eq!(out, vec![b'x']);
        assert!(!decoder.has_carry());
    }

    #[test]
    fn test_stream_decoder_three_byte_sequence_across_calls() {
        // U+20AC '€' = 0xE2 0x82 0xAC
        let vocab = simple_vocab();
        let mut decoder = StreamDecoder::new();

        assert!(decoder.decode_one(0xE2, &vocab).is_empty());
        assert!(decoder.decode_one(0x82, &vocab).is_empty());
        assert_eq!(decoder.decode_one(0xAC, &vocab), vec![0xE2, 0x82, 0xAC]);
    }

    #[test]
    fn test_stream_decoder_drops_carry_on_unknown_id() {
        let vocab = simple_vocab();
        let mut decoder = StreamDecoder::new();

        decoder.decode_one(0xC3, &vocab);
        assert!(decoder.has_carry());

        let out = decoder.decode_one(9000, &vocab);
        assert!(out.is_empty());
        assert!(!decoder.has_carry());
    }

    #[test]
    fn test_stream_decoder_clear() {
        let vocab = simple_vocab();
        let mut decoder = StreamDecoder::new();

        decoder.decode_one(0xC3, &vocab);
        assert!(decoder.has_carry());

        decoder.clear();
        assert!(!decoder.has_carry());
    }
}
