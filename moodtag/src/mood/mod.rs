//! Mood catalog and decision engine

pub mod catalog;
pub mod classifier;

pub use catalog::{builtin_catalog, CatalogError, MoodCatalog, MoodCategory, Range};
pub use classifier::{
    classify, Classification, MatchTier, DEFAULT_MOOD, ETHEREAL_MOOD, MELANCHOLIC_MOOD,
    SUPPRESSED_MOOD,
};
