//! # Tokenizer Facade
//!
//! Combines a validated merge table, its derived [`Vocabulary`], and an
//! optional set of special tokens into the single entry point most
//! callers want: bytes in, ids out, and back.
//!
//! Special tokens are matched whole-input, not as part of the ordinary
//! merge-driven encode: a caller that wants `<|endoftext|>` recognized
//! inside a longer string still has to split on it before calling
//! [`Tokenizer::encode`].

use std::collections::HashMap;

use crate::decoder::{self, StreamDecoder};
use crate::encoder;
use crate::error::BpeResult;
use crate::ordered_map::OrderedPairMap;
use crate::types::{Pair, TokenId};
use crate::vocab::Vocabulary;

/// A byte-pair-encoding tokenizer: merge table, vocabulary, and optional
/// special tokens bound together.
pub struct Tokenizer {
    merges: Vec<Pair>,
    merge_ranks: OrderedPairMap<TokenId>,
    vocab: Vocabulary,
    special_by_bytes: HashMap<Vec<u8>, TokenId>,
    special_by_id: HashMap<TokenId, Vec<u8>>,
}

impl Tokenizer {
    /// Build a tokenizer from a merge table, with no special tokens.
    ///
    /// ## Arguments
    /// * `merges` - The merge table, in rank order, as signed pairs from
    ///   the tokenizer's boundary.
    ///
    /// ## Returns
    /// A `Tokenizer`, or the error that rejected `merges`.
    pub fn new(merges: &[(i64, i64)]) -> BpeResult<Self> {
        Self::with_special_tokens(merges, &[])
    }

    /// Build a tokenizer with an explicit set of special tokens.
    ///
    /// Special token ids are assigned contiguously above the merge
    /// vocabulary, in the order given.
    ///
    /// ## Arguments
    /// * `merges` - The merge table, in rank order, as signed pairs.
    /// * `special_tokens` - Extra whole-string tokens (e.g. `<|endoftext|>`)
    ///   recognized only as an exact match for the entire encode input.
    ///
    /// ## Returns
    /// A `Tokenizer`, or the error that rejected `merges`.
    pub fn with_special_tokens(
        merges: &[(i64, i64)],
        special_tokens: &[&[u8]],
    ) -> BpeResult<Self> {
        let merges = crate::validate::convert_signed_pairs(merges)?;
        let vocab = Vocabulary::build(&merges)?;

        let mut merge_ranks = OrderedPairMap::new();
        for (i, &pair) in merges.iter().enumerate() {
            merge_ranks.insert(pair, 256 + i as TokenId);
        }

        let base = vocab.vocab_size() as TokenId;
        let mut special_by_bytes = HashMap::with_capacity(special_tokens.len());
        let mut special_by_id = HashMap::with_capacity(special_tokens.len());
        for (i, &bytes) in special_tokens.iter().enumerate() {
            let id = base + i as TokenId;
            special_by_bytes.insert(bytes.to_vec(), id);
            special_by_id.insert(id, bytes.to_vec());
        }

        Ok(Self {
            merges,
            merge_ranks,
            vocab,
            special_by_bytes,
            special_by_id,
        })
    }

    /// Encode a byte string to token ids.
    ///
    /// If `input` exactly matches a special token, the result is that
    /// token's single id. Otherwise the input is encoded under ordinary
    /// merge-priority rules.
    pub fn encode(
        &self,
        input: &[u8],
    ) -> Vec<TokenId> {
        if let Some(&id) = self.special_by_bytes.get(input) {
            return vec![id];
        }
        encoder::encode(input, &self.merge_ranks)
    }

    /// Decode a full id sequence to bytes in one shot.
    ///
    /// Ids within the merge vocabulary are decoded as contiguous runs;
    /// special token ids are substituted from their registered bytes.
    /// An id belonging to neither is logged and skipped.
    pub fn decode(
        &self,
        ids: &[TokenId],
    ) -> Vec<u8> {
        let vocab_size = self.vocab.vocab_size() as TokenId;
        let mut out = Vec::new();
        let mut run_start = 0;

        let flush = |out: &mut Vec<u8>, run: &[TokenId]| {
            if !run.is_empty() {
                out.extend_from_slice(&decoder::decode_bulk(run, &self.vocab));
            }
        };

        for (i, &id) in ids.iter().enumerate() {
            if id < vocab_size {
                continue;
            }

            flush(&mut out, &ids[run_start..i]);
            run_start = i + 1;

            match self.special_by_id.get(&id) {
                Some(bytes) => out.extend_from_slice(bytes),
                None => log::warn!("decode: unknown token id {id}"),
            }
        }
        flush(&mut out, &ids[run_start..]);

        out
    }

    /// Decode token ids one at a time, withholding incomplete trailing
    /// UTF-8 sequences across calls.
    ///
    /// Special token ids are emitted whole, with no carry interaction:
    /// any pending carry is cleared first, since a special token can't
    /// continue an in-progress multi-byte sequence.
    pub fn decode_stream(
        &self,
        decoder: &mut StreamDecoder,
        id: TokenId,
    ) -> Vec<u8> {
        let vocab_size = self.vocab.vocab_size() as TokenId;
        if id < vocab_size {
            return decoder.decode_one(id, &self.vocab);
        }

        decoder.clear();
        match self.special_by_id.get(&id) {
            Some(bytes) => bytes.clone(),
            None => {
                log::warn!("decode_stream: unknown token id {id}");
                Vec::new()
            }
        }
    }

    /// Zero a stream decoder's pending carry, discarding any withheld
    /// bytes from an interrupted multi-byte sequence.
    pub fn cache_clear(
        &self,
        decoder: &mut StreamDecoder,
    ) {
        decoder.clear();
    }

    /// The merge table, in rank order.
    pub fn merges(&self) -> &[Pair] {
        &self.merges
    }

    /// The total number of ids this tokenizer can produce, merge
    /// vocabulary plus special tokens.
    pub fn vocab_size(&self) -> usize {
        self.vocab.vocab_size() + self.special_by_id.len()
    }

    /// The byte expansion of a merge-vocabulary token id.
    ///
    /// Returns `None` for special token ids; use the id to look it up in
    /// the table passed to [`Tokenizer::with_special_tokens`] instead.
    pub fn bytes_of(
        &self,
        id: TokenId,
    ) -> Option<&[u8]> {
        self.vocab.bytes_of(id)
    }
}
