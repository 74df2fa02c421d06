//! Analysis configuration.
//!
//! All tunable constants consumed by the validator and the scorer, gathered
//! into one struct so a host can override them (e.g. by deserializing a
//! JSON fragment). Missing fields fall back to the documented defaults.

use serde::{Deserialize, Serialize};

/// Tunable constants for candidate filtering and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum statement count required of both the candidate and the
    /// remainder of the method after extraction.
    pub min_candidate_statements: usize,
    /// Multiplier applied to the smaller side of the split in the length
    /// score.
    pub length_score_constant: f64,
    /// Upper bound on the length score.
    pub length_score_max: f64,
    /// Multiplier applied in the nesting-area score.
    pub nesting_area_score_constant: f64,
    /// Starting value of the parameter score, reduced by one per needed
    /// parameter and by one for a needed return value.
    pub parameter_score_max: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            min_candidate_statements: 3,
            length_score_constant: 0.1,
            length_score_max: 3.0,
            nesting_area_score_constant: 2.0,
            parameter_score_max: 4.0,
        }
    }
}
