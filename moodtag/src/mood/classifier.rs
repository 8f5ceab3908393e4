//! Mood decision engine
//!
//! Maps a `(bpm, energy)` pair to one mood label. Rules are tried in order
//! and the first one that fires decides:
//!
//! 1. `energy < 0.05` → [`SUPPRESSED_MOOD`]
//! 2. `bpm < 20` → [`ETHEREAL_MOOD`] below energy 0.2, else [`MELANCHOLIC_MOOD`]
//! 3. Exact: first category containing both bpm and energy
//! 4. Fuzzy: first fuzzy-eligible category whose range centers are close
//! 5. Tempo only: first category containing bpm
//! 6. [`DEFAULT_MOOD`]
//!
//! Tiers 3-5 each scan the catalog from the top.

use serde::Serialize;

use super::catalog::{builtin_catalog, MoodCatalog, MoodCategory};

/// Label for near-silent tracks, regardless of tempo
pub const SUPPRESSED_MOOD: &str = "suppressed";

/// Label for very slow, quiet tracks
pub const ETHEREAL_MOOD: &str = "ethereal";

/// Label for very slow tracks with some energy
pub const MELANCHOLIC_MOOD: &str = "melancholic";

/// Label when no rule matches
pub const DEFAULT_MOOD: &str = "other";

/// Energy below this is always suppressed
pub const LOW_ENERGY_THRESHOLD: f64 = 0.05;

/// Tempo below this skips the catalog entirely
pub const LOW_TEMPO_THRESHOLD: f64 = 20.0;

/// Splits the low-tempo override into ethereal / melancholic
pub const LOW_TEMPO_ENERGY_SPLIT: f64 = 0.2;

/// Maximum distance from a category's BPM center for a fuzzy match.
/// Hand-tuned; not derived from range widths.
pub const FUZZY_BPM_TOLERANCE: f64 = 15.0;

/// Which rule produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    LowEnergy,
    LowTempo,
    Exact,
    Fuzzy,
    TempoOnly,
    Default,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchTier::LowEnergy => "low-energy",
            MatchTier::LowTempo => "low-tempo",
            MatchTier::Exact => "exact",
            MatchTier::Fuzzy => "fuzzy",
            MatchTier::TempoOnly => "tempo-only",
            MatchTier::Default => "default",
        };
        f.write_str(name)
    }
}

/// Result of classifying one `(bpm, energy)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub mood: &'a str,
    pub tier: MatchTier,
}

impl MoodCatalog {
    /// Classify a track from its tempo and energy
    ///
    /// Total over `f64`. Out-of-range values fall through the tiers; a NaN
    /// fails every comparison it takes part in, so NaN energy can still land
    /// in the tempo-only tier and NaN tempo ends at [`DEFAULT_MOOD`].
    pub fn classify(&self, bpm: f64, energy: f64) -> Classification<'_> {
        let (mood, tier) = self.decide(bpm, energy);

        tracing::trace!(bpm, energy, mood, tier = %tier, "Classified");

        Classification { mood, tier }
    }

    fn decide(&self, bpm: f64, energy: f64) -> (&str, MatchTier) {
        if energy < LOW_ENERGY_THRESHOLD {
            return (SUPPRESSED_MOOD, MatchTier::LowEnergy);
        }

        if bpm < LOW_TEMPO_THRESHOLD {
            let mood = if energy < LOW_TEMPO_ENERGY_SPLIT {
                ETHEREAL_MOOD
            } else {
                MELANCHOLIC_MOOD
            };
            return (mood, MatchTier::LowTempo);
        }

        if let Some(category) = self.iter().find(|c| exact_match(c, bpm, energy)) {
            return (category.name.as_str(), MatchTier::Exact);
        }

        if let Some(category) = self.iter().find(|c| fuzzy_match(c, bpm, energy)) {
            return (category.name.as_str(), MatchTier::Fuzzy);
        }

        if let Some(category) = self.iter().find(|c| c.bpm_range.contains(bpm)) {
            return (category.name.as_str(), MatchTier::TempoOnly);
        }

        (DEFAULT_MOOD, MatchTier::Default)
    }
}

fn exact_match(category: &MoodCategory, bpm: f64, energy: f64) -> bool {
    category.bpm_range.contains(bpm) && category.energy_range.contains(energy)
}

fn fuzzy_match(category: &MoodCategory, bpm: f64, energy: f64) -> bool {
    let Some(thresh) = category.fuzzy_energy_thresh else {
        return false;
    };

    (bpm - category.bpm_range.center()).abs() < FUZZY_BPM_TOLERANCE
        && (energy - category.energy_range.center()).abs() < thresh
}

/// Classify against the built-in catalog
pub fn classify(bpm: f64, energy: f64) -> &'static str {
    builtin_catalog().classify(bpm, energy).mood
}
