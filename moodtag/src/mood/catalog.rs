//! Mood catalog
//!
//! An ordered, read-only list of mood categories. Order is the tie-break at
//! every matching tier: when categories overlap, the one declared first wins.
//! The catalog is a `Vec` scanned linearly and is never re-keyed by name.

use moodtag_common::config::MoodCategoryConfig;
use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

/// Catalog construction errors
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// No categories supplied
    #[error("Mood catalog is empty")]
    Empty,

    /// Category name is blank
    #[error("Mood category #{0} has a blank name")]
    BlankName(usize),

    /// Two categories share a name
    #[error("Duplicate mood category name: {0}")]
    DuplicateName(String),

    /// Range bounds are not finite or `low >= high`
    #[error("Mood category '{name}': invalid {field} range [{low}, {high})")]
    InvalidRange {
        name: String,
        field: &'static str,
        low: f64,
        high: f64,
    },

    /// Fuzzy threshold present but not a positive finite number
    #[error("Mood category '{name}': fuzzy_energy_thresh must be positive, got {value}")]
    InvalidFuzzyThreshold { name: String, value: f64 },
}

/// Half-open interval `[low, high)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Low-inclusive, high-exclusive containment
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value < self.high
    }

    /// Midpoint of the interval
    pub fn center(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    fn is_well_formed(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low < self.high
    }
}

impl From<(f64, f64)> for Range {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

/// One mood category definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodCategory {
    /// Label written to the genre field; unique within a catalog
    pub name: String,
    /// Tempo range in BPM
    pub bpm_range: Range,
    /// Normalized energy range
    pub energy_range: Range,
    /// Presence makes the category eligible for fuzzy (center-distance) matching
    pub fuzzy_energy_thresh: Option<f64>,
}

impl MoodCategory {
    pub fn new(
        name: impl Into<String>,
        bpm_range: (f64, f64),
        energy_range: (f64, f64),
        fuzzy_energy_thresh: Option<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            bpm_range: bpm_range.into(),
            energy_range: energy_range.into(),
            fuzzy_energy_thresh,
        }
    }

    /// Convert back to the TOML representation
    pub fn to_config(&self) -> MoodCategoryConfig {
        MoodCategoryConfig {
            name: self.name.clone(),
            bpm_range: (self.bpm_range.low, self.bpm_range.high),
            energy_range: (self.energy_range.low, self.energy_range.high),
            fuzzy_energy_thresh: self.fuzzy_energy_thresh,
        }
    }
}

impl From<&MoodCategoryConfig> for MoodCategory {
    fn from(config: &MoodCategoryConfig) -> Self {
        Self::new(
            config.name.clone(),
            config.bpm_range,
            config.energy_range,
            config.fuzzy_energy_thresh,
        )
    }
}

/// Ordered, immutable list of mood categories
#[derive(Debug, Clone, PartialEq)]
pub struct MoodCatalog {
    categories: Vec<MoodCategory>,
}

static BUILTIN: Lazy<MoodCatalog> = Lazy::new(MoodCatalog::builtin);

/// Shared built-in catalog
pub fn builtin_catalog() -> &'static MoodCatalog {
    &BUILTIN
}

impl MoodCatalog {
    /// Build a catalog, checking basic well-formedness only
    ///
    /// Overlapping ranges are allowed; catalog order resolves them.
    pub fn new(categories: Vec<MoodCategory>) -> Result<Self, CatalogError> {
        if categories.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (idx, category) in categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(CatalogError::BlankName(idx + 1));
            }

            if categories[..idx].iter().any(|c| c.name == category.name) {
                return Err(CatalogError::DuplicateName(category.name.clone()));
            }

            for (field, range) in [("bpm", category.bpm_range), ("energy", category.energy_range)] {
                if !range.is_well_formed() {
                    return Err(CatalogError::InvalidRange {
                        name: category.name.clone(),
                        field,
                        low: range.low,
                        high: range.high,
                    });
                }
            }

            if let Some(thresh) = category.fuzzy_energy_thresh {
                if !(thresh.is_finite() && thresh > 0.0) {
                    return Err(CatalogError::InvalidFuzzyThreshold {
                        name: category.name.clone(),
                        value: thresh,
                    });
                }
            }
        }

        Ok(Self { categories })
    }

    /// Build a catalog from `[[moods]]` configuration entries
    pub fn from_config(entries: &[MoodCategoryConfig]) -> Result<Self, CatalogError> {
        Self::new(entries.iter().map(MoodCategory::from).collect())
    }

    /// The built-in catalog
    ///
    /// The bounds and fuzzy thresholds are hand-tuned; keep them literal.
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                // Core moods
                MoodCategory::new("energetic", (150.0, 200.0), (0.85, 1.0), Some(0.1)),
                MoodCategory::new("passionate", (120.0, 160.0), (0.6, 0.95), Some(0.15)),
                MoodCategory::new("cheerful", (90.0, 130.0), (0.4, 0.85), Some(0.1)),
                MoodCategory::new("soothing", (60.0, 100.0), (0.2, 0.65), Some(0.1)),
                // Narrow low-energy moods, fuzzy-eligible
                MoodCategory::new("melancholic", (40.0, 80.0), (0.05, 0.4), Some(0.05)),
                MoodCategory::new("sentimental", (50.0, 90.0), (0.1, 0.3), Some(0.05)),
                MoodCategory::new("tense", (130.0, 170.0), (0.05, 0.3), Some(0.05)),
                // Exact or tempo-only
                MoodCategory::new("ethereal", (20.0, 60.0), (0.0, 0.25), None),
                MoodCategory::new("restless", (80.0, 140.0), (0.7, 0.9), None),
                MoodCategory::new("psychedelic", (60.0, 120.0), (0.25, 0.45), None),
                MoodCategory::new("tender", (70.0, 110.0), (0.15, 0.35), None),
                MoodCategory::new("suppressed", (0.0, 200.0), (0.0, 0.05), None),
            ],
        }
    }

    /// Categories in priority order
    pub fn iter(&self) -> std::slice::Iter<'_, MoodCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a category by name
    pub fn get(&self, name: &str) -> Option<&MoodCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// TOML `[[moods]]` entries equivalent to this catalog
    pub fn to_config(&self) -> Vec<MoodCategoryConfig> {
        self.categories.iter().map(MoodCategory::to_config).collect()
    }
}

impl<'a> IntoIterator for &'a MoodCatalog {
    type Item = &'a MoodCategory;
    type IntoIter = std::slice::Iter<'a, MoodCategory>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
