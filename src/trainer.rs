//! # Trainer Core
//!
//! Holds the working corpus (a collection of id sequences, "pieces") and a
//! monotonically increasing next-rank counter. Repeatedly scans the corpus,
//! picks the most-frequent adjacent pair, assigns it the next rank, and
//! rewrites the corpus in place.
//!
//! The in-place piece rewrite is a single pass over the same backing
//! buffer with a write cursor that never runs ahead of the read cursor.

use crate::error::{BpeError, BpeResult};
use crate::ordered_map::OrderedPairMap;
use crate::types::{BYTE_SPACE, Pair, TokenId};
use crate::validate::{convert_signed_pairs, validate_merges};

/// Rewrite `piece` in place, replacing every non-overlapping, left-to-right
/// occurrence of `pair` with `replacement`.
///
/// ## Arguments
/// * `piece` - The token sequence to rewrite.
/// * `pair` - The adjacent pair to merge.
/// * `replacement` - The token id to substitute for each match.
fn rewrite_piece_in_place(
    piece: &mut [TokenId],
    pair: Pair,
    replacement: TokenId,
) -> usize {
    let n = piece.len();
    if n < 2 {
        return n;
    }

    let mut write = 0;
    let mut read = 0;
    while read < n {
        if read + 1 < n && piece[read] == pair.0 && piece[read + 1] == pair.1 {
            piece[write] = replacement;
            write += 1;
            read += 2;
        } else {
            piece[write] = piece[read];
            write += 1;
            read += 1;
        }
    }
    write
}

/// The working training corpus and merge-rank counter.
#[derive(Debug, Clone)]
struct TrainingContext {
    pieces: Vec<Vec<TokenId>>,
    next_rank: TokenId,
}

impl TrainingContext {
    fn new(byte_pieces: Vec<Vec<u8>>) -> BpeResult<Self> {
        if byte_pieces.is_empty() {
            return Err(BpeError::InputShape(
                "training corpus must contain at least one piece".into(),
            ));
        }

        let pieces = byte_pieces
            .into_iter()
            .map(|bytes| bytes.into_iter().map(TokenId::from).collect())
            .collect();

        Ok(Self {
            pieces,
            next_rank: (BYTE_SPACE - 1) as TokenId,
        })
    }

    /// Greedily finds the most frequent adjacent pair across all pieces and
    /// absorbs it as a new merge.
    fn step(&mut self) -> Option<(Pair, TokenId, u32)> {
        let mut counts: OrderedPairMap<u32> = OrderedPairMap::new();
        // First-insertion order of the statistics pass, tracked separately
        // from the map's key order: the tie-break rule is defined
        // over traversal order, not pair order.
        let mut insertion_order: Vec<Pair> = Vec::new();

        for piece in &self.pieces {
            for window in piece.windows(2) {
                let pair = (window[0], window[1]);
                let (count, was_new) = counts.insert_or_get(pair, 0);
                *count += 1;
                if was_new {
                    insertion_order.push(pair);
                }
            }
        }

        if insertion_order.is_empty() {
            return None;
        }

        let mut leader = insertion_order[0];
        let mut leader_count = *counts.lookup(&leader).expect("just counted");
        for &pair in &insertion_order[1..] {
            let count = *counts.lookup(&pair).expect("just counted");
            if count > leader_count {
                leader = pair;
                leader_count = count;
            }
        }

        self.next_rank += 1;
        let new_id = self.next_rank;

        for piece in &mut self.pieces {
            let new_len = rewrite_piece_in_place(piece, leader, new_id);
            piece.truncate(new_len);
        }

        Some((leader, new_id, leader_count))
    }

    /// Replays a validated merge sequence without recomputing statistics.
    fn apply_merges(
        &mut self,
        pairs: &[Pair],
    ) {
        for &pair in pairs {
            self.next_rank += 1;
            let new_id = self.next_rank;
            for piece in &mut self.pieces {
                let new_len = rewrite_piece_in_place(piece, pair, new_id);
                piece.truncate(new_len);
            }
        }
    }
}

/// Options driving [`Trainer::train_to_vocab_size`].
#[derive(Debug, Clone, Copy)]
pub struct TrainerOptions {
    /// The target vocabulary size; must be `>= 256`.
    pub vocab_size: usize,
}

impl TrainerOptions {
    /// Create new trainer options.
    ///
    /// ## Arguments
    /// * `vocab_size` - The target vocabulary size.
    ///
    /// ## Returns
    /// A `Result` containing the new options, or an error if `vocab_size`
    /// is below the single-byte space.
    pub fn new(vocab_size: usize) -> BpeResult<Self> {
        if vocab_size < BYTE_SPACE {
            return Err(BpeError::InputShape(format!(
                "vocab_size ({vocab_size}) must be >= {BYTE_SPACE}"
            )));
        }
        Ok(Self { vocab_size })
    }
}

/// Trainer for learning byte-pair-encoding merges.
#[derive(Debug)]
pub struct Trainer {
    context: TrainingContext,
    merges: Vec<Pair>,
}

impl Trainer {
    /// Initialize a trainer from a training corpus.
    ///
    /// ## Arguments
    /// * `pieces` - The training corpus; one entry per independent sample.
    ///   Must be nonempty.
    ///
    /// ## Returns
    /// A `Result` containing the new `Trainer`, or `Err(BpeError::InputShape)`
    /// if `pieces` is empty.
    pub fn new(pieces: Vec<Vec<u8>>) -> BpeResult<Self> {
        let context = TrainingContext::new(pieces)?;
        log::info!(
            "starting BPE training: {} pieces, next_rank={}",
            context.pieces.len(),
            context.next_rank
        );
        Ok(Self {
            context,
            merges: Vec::new(),
        })
    }

    /// Run a single training step.
    ///
    /// ## Returns
    /// The merged pair, its assigned id, and its occurrence count, or
    /// `None` if every piece has length `<= 1` (saturated).
    pub fn step(&mut self) -> Option<(Pair, TokenId, u32)> {
        let result = self.context.step();
        if let Some((pair, ..)) = result {
            self.merges.push(pair);
        }
        result
    }

    /// Replay an externally supplied merge table.
    ///
    /// Must only be called while no merges have been learned or loaded yet.
    ///
    /// ## Arguments
    /// * `raw` - The merge table, as boundary-supplied signed integer pairs.
    ///
    /// ## Returns
    /// `Ok(())` on success, or an error if the trainer already has merges,
    /// or the table fails conversion or validation.
    pub fn load_merges(
        &mut self,
        raw: &[(i64, i64)],
    ) -> BpeResult<()> {
        if !self.merges.is_empty() {
            return Err(BpeError::AlreadyInitialized(self.merges.len()));
        }

        let pairs = convert_signed_pairs(raw)?;
        validate_merges(&pairs)?;

        self.context.apply_merges(&pairs);
        self.merges.extend_from_slice(&pairs);
        Ok(())
    }

    /// Drive the trainer to a target vocabulary size.
    ///
    /// ## Arguments
    /// * `options` - The target vocabulary size to train towards.
    ///
    /// ## Returns
    /// The merges produced by this call, in order. May be shorter than
    /// requested if the corpus saturates first.
    pub fn train_to_vocab_size(
        &mut self,
        options: &TrainerOptions,
    ) -> Vec<(Pair, TokenId, u32)> {
        let target_merges = options.vocab_size.saturating_sub(BYTE_SPACE);
        let mut results = Vec::with_capacity(target_merges);
        let mut last_logged_percent = 0u32;

        while results.len() < target_merges {
            let Some(step_result) = self.step() else {
                break;
            };
            results.push(step_result);

            let percent = (results.len() as u32 * 100) / target_merges as u32;
            if percent > last_logged_percent {
                log::info!(
                    "training progress: {percent}% ({}/{target_merges} merges)",
                    results.len()
                );
                last_logged_percent = percent;
            }
        }

        results
    }

    /// The accumulated merge table, in rank order.
    pub fn merges(&self) -> &[Pair] {
        &self.merges
    }

    /// The number of merges accumulated so far.
    pub fn merges_len(&self) -> usize {
        self.merges.len()
    }
}
