//! # Common Types
//!
//! The core is monomorphic over a single token id width. `u32` comfortably
//! covers any merge table that fits in memory; the source this crate is
//! grounded on reaches for a wider platform integer only because its FFI
//! boundary has no narrower unsigned type that is still convenient to pass
//! across it.

/// A token id. Ids `0..=255` are literal bytes; ids `>= 256` are merged
/// tokens assigned in the order their merge was learned or replayed.
pub type TokenId = u32;

/// An ordered pair of token ids, compared lexicographically on
/// `(first, second)`: the native [`Ord`] impl on tuples already gives us
/// this, so [`crate::pair::compare_pair`] exists mainly to name the
/// contract explicitly.
pub type Pair = (TokenId, TokenId);

/// The number of single-byte tokens that always occupy ids `0..256`.
pub const BYTE_SPACE: usize = 256;
