#![warn(missing_docs, unused)]
//! # `bytepair`
//!
//! A byte-pair-encoding core: train a merge table from a corpus, validate
//! one supplied from elsewhere, encode bytes to ids under it, expand ids
//! back to bytes, and decode an id stream incrementally.
//!
//! ## Training
//!
//! [`Trainer`] holds the working corpus and learns merges greedily, one
//! most-frequent-pair at a time. [`TrainerOptions`] drives it to a target
//! vocabulary size in one call via [`Trainer::train_to_vocab_size`].
//!
//! ## Using a merge table
//!
//! [`Tokenizer`] combines a merge table (trained, or loaded from
//! elsewhere via [`validate::validate_merges`]) with its derived
//! [`Vocabulary`] into a single `encode`/`decode` surface. For output
//! that needs to be streamed incrementally, pair it with a
//! [`StreamDecoder`] so a multi-byte UTF-8 sequence is never split across
//! two emitted chunks.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod ordered_map;
pub mod pair;
pub mod tokenizer;
pub mod trainer;
pub mod types;
pub mod validate;
pub mod vocab;

#[doc(inline)]
pub use decoder::StreamDecoder;
#[doc(inline)]
pub use error::{BpeError, BpeResult};
#[doc(inline)]
pub use ordered_map::OrderedPairMap;
#[doc(inline)]
pub use tokenizer::Tokenizer;
#[doc(inline)]
pub use trainer::{Trainer, TrainerOptions};
#[doc(inline)]
pub use types::{BYTE_SPACE, Pair, TokenId};
#[doc(inline)]
pub use vocab::Vocabulary;
