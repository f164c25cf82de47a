//! # Vocabulary Builder
//!
//! Given a validated merge table, materializes for every id `0..vocab_size`
//! the exact byte string it expands to, using a single shared arena and
//! length+offset views.
//!
//! The two-pass size-then-fill construction first computes every derived
//! token's expansion length, then allocates one arena of the exact total
//! size and copies each expansion into it contiguously.

use crate::error::BpeResult;
use crate::types::{BYTE_SPACE, Pair, TokenId};
use crate::validate::validate_merges;

/// A `{offset, length}` view into a [`Vocabulary`]'s shared byte arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TokenView {
    offset: usize,
    length: usize,
}

/// The full byte expansion of every token id `0..vocab_size`, backed by a
/// single shared arena.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    arena: Vec<u8>,
    views: Vec<TokenView>,
}

impl Vocabulary {
    /// Build a vocabulary from a validated merge table.
    ///
    /// ## Arguments
    /// * `merges` - The merge table, in rank order. Must already be
    ///   validated by the caller, or will be rejected here.
    ///
    /// ## Returns
    /// A `Result` containing the new `Vocabulary`, or the validation error
    /// that rejected `merges`.
    pub fn build(merges: &[Pair]) -> BpeResult<Self> {
        validate_merges(merges)?;
        Ok(Self::build_unchecked(merges))
    }

    /// Build a vocabulary from a merge table already known to be valid,
    /// skipping the validation pass [`Vocabulary::build`] runs first.
    pub(crate) fn build_unchecked(merges: &[Pair]) -> Self {
        let k = merges.len();

        // Pass 1: compute each merged token's expansion length.
        let mut sizes: Vec<usize> = Vec::with_capacity(k);
        let mut total = BYTE_SPACE;
        for &(first, second) in merges {
            let length = Self::expansion_len(&sizes, first) + Self::expansion_len(&sizes, second);
            total += length;
            sizes.push(length);
        }

        // Pass 2: allocate the arena and fill it.
        let mut arena = Vec::with_capacity(total);
        let mut views = Vec::with_capacity(BYTE_SPACE + k);

        for b in 0..BYTE_SPACE {
            arena.push(b as u8);
            views.push(TokenView {
                offset: b,
                length: 1,
            });
        }

        for (i, &(first, second)) in merges.iter().enumerate() {
            let offset = arena.len();
            let length = sizes[i];

            let first_view = views[first as usize];
            let second_view = views[second as usize];
            arena.extend_from_within(first_view.offset..first_view.offset + first_view.length);
            arena.extend_from_within(second_view.offset..second_view.offset + second_view.length);

            debug_assert_eq!(arena.len() - offset, length);
            views.push(TokenView { offset, length });
        }

        debug_assert_eq!(arena.len(), total);
        debug_assert_eq!(views.len(), BYTE_SPACE + k);

        Self { arena, views }
    }

    /// `bytes_of(b) = 1` for `b < 256`; otherwise the already-computed size
    /// of the earlier merge `b - 256`.
    fn expansion_len(
        sizes: &[usize],
        id: TokenId,
    ) -> usize {
        let id = id as usize;
        if id < BYTE_SPACE {
            1
        } else {
            sizes[id - BYTE_SPACE]
        }
    }

    /// The byte expansion of a token id.
    ///
    /// ## Arguments
    /// * `id` - The token id to look up.
    ///
    /// ## Returns
    /// The bytes `id` expands to, or `None` if `id >= vocab_size`.
    pub fn bytes_of(
        &self,
        id: TokenId,
    ) -> Option<&[u8]> {
        let view = self.views.get(id as usize)?;
        Some(&self.arena[view.offset..view.offset + view.length])
    }

    /// The total number of tokens (`256 + len(merge_table)`).
    pub fn vocab_size(&self) -> usize {
        self.views.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte_tokens() {
        let vocab = Vocabulary::build(&[]).unwrap();
        assert_eq!(vocab.vocab_size(), 256);
        for b in 0..256u32 {
            assert_eq!(vocab.bytes_of(b).unwrap(), &[b as u8]);
        }
        assert_eq!(vocab.bytes_of(256), None);
    }

    #[test]
    fn test_merged_token_expansion() {
        // 256 = "ab", 257 = "ab" + "c" = "abc"
        let vocab = Vocabulary::build(&[(97, 98), (256, 99)]).unwrap();
        assert_eq!(vocab.vocab_size(), 258);
        assert_eq!(vocab.bytes_of(256).unwrap(), b"ab");
        assert_eq!(vocab.bytes_of(257).unwrap(), b"abc");
    }

    #[test]
    fn test_vocabulary_expansion_invariant() {
        let merges = [(97, 98), (256, 99), (257, 257)];
        let vocab = Vocabulary::build(&merges).unwrap();
        for (i, &(first, second)) in merges.iter().enumerate() {
            let id = 256 + i as TokenId;
            let expected: Vec<u8> = vocab
                .bytes_of(first)
                .unwrap()
                .iter()
                .chain(vocab.bytes_of(second).unwrap())
                .copied()
                .collect();
            assert_eq!(vocab.bytes_of(id).unwrap(), expected.as_slice());
        }
    }

    #[test]
    fn test_build_rejects_invalid_table() {
        assert!(Vocabulary::build(&[(97, 98), (97, 98)]).is_err());
    }
}
