//! # Pair Codec
//!
//! A total ordering over pairs of token ids. Pair comparison is
//! lexicographic on `(first, second)`.

use core::cmp::Ordering;

use crate::types::Pair;

/// Compare two pairs lexicographically on `(first, second)`.
///
/// This is exactly what `Pair`'s derived tuple [`Ord`] already computes;
/// the free function exists so the ordering contract has a name call sites
/// can reference, the way the ordered map and the trainer's
/// tie-break rule describe it.
///
/// ## Arguments
/// * `a` - The first pair.
/// * `b` - The second pair.
///
/// ## Returns
/// `Ordering::Less` if `a < b`, `Ordering::Equal` if `a == b`,
/// `Ordering::Greater` if `a > b`.
pub fn compare_pair(
    a: &Pair,
    b: &Pair,
) -> Ordering {
    a.cmp(b)
}
