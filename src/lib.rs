//! nearword — embedding round engine for a word-association game.
//!
//! Modules:
//! - `parse`: one embedding row into a `WordEntry`.
//! - `index`: EmbeddingIndex (lookup, suggestions, row-major vectors).
//! - `sampler`: distinct random words without replacement.
//! - `metric`: dot, norm, cosine distance.
//! - `challenge`: equation targets and team splits.
//! - `scoring`: point rules for both variants.
//! - `session`: the round state machine and its command interface.
//! - `seed`: SplitMix64 for deterministic RNG.
//! - `source`: dataset transport seam.
//! - `config`: GameConfig, presets, languages.
//! - `synth`: synthetic embedding tables.

pub mod error;
pub mod metric;
pub mod types;
pub mod seed;
pub mod parse;
pub mod index;
pub mod sampler;
pub mod challenge;
pub mod scoring;
pub mod config;
pub mod source;
pub mod session;
pub mod synth;

pub use error::{EngineError, Result};
pub use parse::{parse_line, WordEntry};
pub use index::{EmbeddingIndex, MIN_DATASET_ROWS};
pub use challenge::{Challenge, ChallengeView, Equation, TeamSplit};
pub use config::{GameConfig, Language, Variant};
pub use source::{DatasetSource, FileSource};
pub use session::{Breakdown, GuessOutcome, LoadReport, Phase, ScoredGuess, Session, SessionScore};
pub use types::{IndexSummary, RankedWord, Side, WordDistance};
pub use seed::SplitMix64;
