//! # Merge-Table Validator
//!
//! Checks that an externally supplied merge list is well-formed before it
//! is handed to the trainer's `apply_merges`, the encoder, or the
//! vocabulary builder.

use crate::error::{BpeError, BpeResult};
use crate::ordered_map::OrderedPairMap;
use crate::types::{BYTE_SPACE, Pair, TokenId};

/// Validate a merge table.
///
/// Every component of `pairs[i]` must already be a known id by the time
/// merge `i` is introduced (`< 256 + i`), and no pair may appear twice.
///
/// ## Arguments
/// * `pairs` - The merge table to validate, in rank order.
///
/// ## Returns
/// `Ok(())` if the table is well-formed, or `Err(BpeError::InvalidMerges)`
/// naming the first violation found.
pub fn validate_merges(pairs: &[Pair]) -> BpeResult<()> {
    let mut max_id = BYTE_SPACE as TokenId;
    let mut seen: OrderedPairMap<()> = OrderedPairMap::new();

    for (i, &pair) in pairs.iter().enumerate() {
        if pair.0 >= max_id || pair.1 >= max_id {
            return Err(BpeError::InvalidMerges(format!(
                "merge {i} ({}, {}) references an id >= {max_id}",
                pair.0, pair.1
            )));
        }

        let (_, was_new) = seen.insert_or_get(pair, ());
        if !was_new {
            return Err(BpeError::InvalidMerges(format!(
                "merge {i} ({}, {}) duplicates an earlier entry",
                pair.0, pair.1
            )));
        }

        max_id += 1;
    }

    Ok(())
}

/// Convert a boundary-supplied signed pair to a [`Pair`], rejecting
/// negative components and components that overflow [`TokenId`]'s range.
///
/// ## Arguments
/// * `a` - The pair's first component, as supplied at the boundary.
/// * `b` - The pair's second component, as supplied at the boundary.
///
/// ## Returns
/// The converted [`Pair`], or an error describing why the conversion was
/// rejected.
pub fn convert_signed_pair(
    a: i64,
    b: i64,
) -> BpeResult<Pair> {
    if a < 0 || b < 0 {
        return Err(BpeError::NegativePair(a, b));
    }
    let a = TokenId::try_from(a)
        .map_err(|_| BpeError::InvalidMerges(format!("pair component {a} exceeds token id range")))?;
    let b = TokenId::try_from(b)
        .map_err(|_| BpeError::InvalidMerges(format!("pair component {b} exceeds token id range")))?;
    Ok((a, b))
}

/// Convert a boundary-supplied list of signed pairs to [`Pair`]s.
///
/// ## Arguments
/// * `raw` - The pairs as supplied at the boundary (e.g. from a host
///   language binding, where integers are naturally signed).
///
/// ## Returns
/// The converted pairs, in order, or the first conversion error
/// encountered.
pub fn convert_signed_pairs(raw: &[(i64, i64)]) -> BpeResult<Vec<Pair>> {
    raw.iter().map(|&(a, b)| convert_signed_pair(a, b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_well_formed_table() {
        // 256=ab, 257=(ab)c
        assert!(validate_merges(&[(97, 98), (256, 99)]).is_ok());
    }

    #[test]
    fn test_validate_rejects_forward_reference() {
        let err = validate_merges(&[(97, 97), (300, 97)]).unwrap_err();
        assert!(matches!(err, BpeError::InvalidMerges(_)));
    }

    #[test]
    fn test_validate_rejects_duplicate() {
        let err = validate_merges(&[(97, 98), (97, 98)]).unwrap_err();
        assert!(matches!(err, BpeError::InvalidMerges(_)));
    }

    #[test]
    fn test_validate_empty_table_is_ok() {
        assert!(validate_merges(&[]).is_ok());
    }

    #[test]
    fn test_convert_signed_pair_rejects_negative() {
        let err = convert_signed_pair(-1, 5).unwrap_err();
        assert!(matches!(err, BpeError::NegativePair(-1, 5)));
    }

    #[test]
    fn test_convert_signed_pair_accepts_nonnegative() {
        assert_eq!(convert_signed_pair(97, 98).unwrap(), (97, 98));
    }

    #[test]
    fn test_convert_signed_pairs_batch() {
        let converted = convert_signed_pairs(&[(97, 98), (256, 99)]).unwrap();
        assert_eq!(converted, vec![(97, 98), (256, 99)]);
    }
}
