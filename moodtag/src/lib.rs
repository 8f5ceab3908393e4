//! moodtag: BPM and mood tagging for audio collections
//!
//! Each audio file is reduced to a `(bpm, energy)` pair, mapped to a mood
//! label through an ordered rule table, and tagged in place:
//!
//! - [`analysis`]: decoding and feature extraction
//! - [`mood`]: mood catalog and decision engine
//! - [`tags`]: ID3 / Vorbis comment storage
//! - [`scanner`]: input folder discovery
//! - [`pipeline`]: sequential batch driver
//! - [`report`]: per-file outcomes and batch totals

pub mod analysis;
pub mod error;
pub mod mood;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod tags;

pub use crate::error::{FailureKind, TaggingError};
pub use crate::mood::{builtin_catalog, classify, Classification, MatchTier, MoodCatalog};
pub use crate::pipeline::{PipelineOptions, TaggedTrack, TaggingPipeline};
pub use crate::report::{BatchSummary, FileOutcome, FileReport};
