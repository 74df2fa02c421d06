//! Quality scoring for validated candidates.
//!
//! Four sub-scores and their sum, computed from the same tree shapes the
//! validator used: a capped length-balance reward, the nesting-depth
//! reduction either fragment achieves, a nesting-area reduction scaled by
//! the method's depth, and the cost of the parameter interface the
//! extracted method would need. The total is summed in fixed order
//! length → depth → area → parameter so results reproduce bit-for-bit.
//!
//! The area of a block is deliberately shallow: it sums only the direct
//! child blocks' own depths, one level of contribution per block. This
//! matches the observed metric and must not be "fixed" to a recursive sum.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::model::{Candidate, Method, Scores, Statement};
use crate::tree::{count_statements, flatten, mentions, remaining_after_removing, wrap_as_block};
use crate::validate::writes_outer_local;

/// One-entry-point scoring seam.
pub trait CandidateScoring: Send + Sync {
    /// Compute the four sub-scores and total for the candidate.
    ///
    /// Fails with an invalid-arguments error if the candidate holds no
    /// statements.
    fn score(&self, method: &Method, candidate: &Candidate) -> AnalysisResult<Scores>;
}

/// The default scorer.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    config: AnalysisConfig,
}

impl QualityScorer {
    /// Create a scorer with the given configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        QualityScorer { config }
    }
}

impl CandidateScoring for QualityScorer {
    fn score(&self, method: &Method, candidate: &Candidate) -> AnalysisResult<Scores> {
        if candidate.is_empty() {
            return Err(AnalysisError::invalid_arguments(
                "cannot score a candidate with no statements",
            ));
        }
        let method_block = wrap_as_block(&method.body);
        let candidate_block = wrap_as_block(&candidate.statements);
        let remaining = remaining_after_removing(&method_block, &candidate_block);

        let length = self.length_score(&candidate_block, &remaining);
        let depth = depth_score(method, candidate, &remaining);
        let area = self.area_score(method, candidate, &remaining);
        let parameters = self.parameter_score(method, candidate, &remaining);
        let total = length + depth + area + parameters;
        Ok(Scores {
            length,
            depth,
            area,
            parameters,
            total,
        })
    }
}

impl QualityScorer {
    /// Balanced splits score best: the smaller side of the split scaled by
    /// the length constant, capped.
    fn length_score(&self, candidate_block: &Statement, remaining: &Statement) -> f64 {
        let smaller = count_statements(candidate_block).min(count_statements(remaining));
        let score = self.config.length_score_constant * smaller as f64;
        score.min(self.config.length_score_max)
    }

    /// The area reduction the weaker fragment achieves, as a fraction of
    /// the method's area, scaled by depth and the area constant.
    fn area_score(&self, method: &Method, candidate: &Candidate, remaining: &Statement) -> f64 {
        let method_area = area_of(&method.body);
        if method_area == 0 {
            return 0.0;
        }
        let candidate_drop = method_area - area_of(&candidate.statements);
        let remaining_drop = method_area - area_of(remaining.children());
        let weaker_drop = candidate_drop.min(remaining_drop);
        self.config.nesting_area_score_constant
            * depth_of_list(&method.body) as f64
            * (weaker_drop as f64 / method_area as f64)
    }

    /// Parameter-interface cost: one point per escaping name the caller
    /// must supply, one more if a value must travel back.
    fn parameter_score(&self, method: &Method, candidate: &Candidate, remaining: &Statement) -> f64 {
        let needed = candidate
            .globals
            .iter()
            .filter(|&name| method.has_parameter(name) || method.has_local(name))
            .count();
        let return_cost = if needs_return(method, candidate, remaining) {
            1.0
        } else {
            0.0
        };
        self.config.parameter_score_max - needed as f64 - return_cost
    }
}

/// The depth reduction the weaker fragment achieves.
fn depth_score(method: &Method, candidate: &Candidate, remaining: &Statement) -> f64 {
    let method_depth = depth_of_list(&method.body);
    let remaining_gain = method_depth - depth_of_list(remaining.children());
    let candidate_gain = method_depth - depth_of_list(&candidate.statements);
    remaining_gain.min(candidate_gain) as f64
}

/// Maximum live nesting level reached while walking the list, with the
/// method body itself at level 0.
fn depth_of_list(statements: &[Statement]) -> i64 {
    statements.iter().map(depth_of).max().unwrap_or(0)
}

fn depth_of(statement: &Statement) -> i64 {
    match statement {
        Statement::Simple { .. } => 0,
        Statement::Block { children, .. } => 1 + depth_of_list(children),
    }
}

/// Shallow nesting area: the sum of direct child blocks' own depths, one
/// level of contribution per block.
fn area_of(statements: &[Statement]) -> i64 {
    statements
        .iter()
        .filter(|s| s.is_block())
        .map(depth_of)
        .sum()
}

/// A value escapes when a candidate-declared name is still mentioned after
/// the candidate in the remaining tree, or when the candidate writes an
/// outer method local.
fn needs_return(method: &Method, candidate: &Candidate, remaining: &Statement) -> bool {
    let Some(last) = candidate.last_index() else {
        return false;
    };
    let leaked = flatten(remaining.children()).iter().any(|s| {
        s.index() > last
            && candidate
                .locals
                .iter()
                .any(|v| mentions(s.text(), &v.name))
    });
    leaked || writes_outer_local(method, candidate)
}
