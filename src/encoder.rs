//! # Encoder
//!
//! Given bytes and a merge-rank map, produces a token-id sequence by
//! iteratively applying the lowest-rank matching adjacent pair until no
//! merge applies.
//!
//! Only one occurrence of the winning pair merges per iteration, at
//! whichever position has the lowest rank (ties broken by lowest index).
//! A variant that merges every occurrence of the winning pair in one
//! sweep produces the same final sequence, since any newly formed pair
//! always has strictly higher rank than the merge that formed it, so it
//! can never jump ahead of a same-rank occurrence waiting elsewhere.
//!
//! Ranks are recomputed incrementally rather than by rescanning the whole
//! buffer on every iteration: after a merge at position `i`, only the pair
//! ending at `i` and the pair starting at `i` can have changed, so only
//! those two entries are recomputed.

use crate::ordered_map::OrderedPairMap;
use crate::types::TokenId;

/// Encode a byte buffer into a token-id sequence under rank-priority
/// merge semantics.
///
/// ## Arguments
/// * `bytes` - The input to encode.
/// * `merge_ranks` - A pair-to-rank map, where the rank of merge `i` is its
///   assigned id `256 + i` (lower id ⇒ applied earlier).
///
/// ## Returns
/// The encoded token-id sequence.
pub fn encode(
    bytes: &[u8],
    merge_ranks: &OrderedPairMap<TokenId>,
) -> Vec<TokenId> {
    let mut ids: Vec<TokenId> = bytes.iter().map(|&b| TokenId::from(b)).collect();
    if ids.len() < 2 {
        return ids;
    }

    let rank_at = |ids: &[TokenId], i: usize| -> TokenId {
        merge_ranks
            .lookup(&(ids[i], ids[i + 1]))
            .copied()
            .unwrap_or(TokenId::MAX)
    };

    let mut ranks: Vec<TokenId> = (0..ids.len() - 1).map(|i| rank_at(&ids, i)).collect();

    loop {
        // Minimum rank, ties broken by lowest position index: tuple
        // comparison on `(rank, index)` gives us exactly that for free.
        let Some((pos, &min_rank)) = ranks
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r != TokenId::MAX)
            .min_by_key(|&(i, &r)| (r, i))
        else {
            break;
        };

        ids[pos] = min_rank;
        ids.remove(pos + 1);
        ranks.remove(pos);

        // Only the pairs touching the merge site can have changed.
        if pos > 0 {
            ranks[pos - 1] = rank_at(&ids, pos - 1);
        }
        if pos < ranks.len() {
            ranks[pos] = rank_at(&ids, pos);
        }

        if ids.len() < 2 {
            break;
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks_from(merges: &[(TokenId, TokenId)]) -> OrderedPairMap<TokenId> {
        let mut map = OrderedPairMap::new();
        for (i, &pair) in merges.iter().enumerate() {
            map.insert(pair, 256 + i as TokenId);
        }
        map
    }

    #[test]
    fn test_encode_empty_input() {
        let map = ranks_from(&[]);
        assert_eq!(encode(b"", &map), Vec::<TokenId>::new());
    }

    #[test]
    fn test_encode_single_byte() {
        let map = ranks_from(&[(97, 98)]);
        assert_eq!(encode(b"a", &map), vec![97]);
    }

    #[test]
    fn test_encode_decode_round_trip_scenario() {
        // 256 = "ab", 257 = "ab" + "c" = "abc"
        let map = ranks_from(&[(97, 98), (256, 99)]);
        assert_eq!(encode(b"abcab", &map), vec![257, 256]);
    }

    #[test]
    fn test_encode_tie_break_lowest_index() {
        let map = ranks_from(&[(97, 98), (98, 97)]);
        assert_eq!(encode(b"aba", &map), vec![256, 97]);
    }

    #[test]
    fn test_encode_no_applicable_merges() {
        let map = ranks_from(&[(1, 2)]);
        assert_eq!(encode(b"xyz", &map), vec![120, 121, 122]);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let map = ranks_from(&[(97, 98), (256, 99), (257, 257)]);
        let input = b"abcabcabc";
        assert_eq!(encode(input, &map), encode(input, &map));
    }
}
