//! Candidate engine: enumeration and orchestration.
//!
//! The engine enumerates every contiguous run of sibling statements in
//! every block of the method (the body included), derives each run's
//! variable sets through the scope analyzer, filters through the
//! structural validator, and — in the scoring pipeline — scores the
//! survivors. The three analysis stages are one-entry-point traits wired
//! by explicit constructor injection, so a host can swap any of them.
//!
//! Analysis is synchronous and call-local: one engine per method may run
//! on as many threads as there are methods, with no locking.

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::model::{Candidate, Method, Statement};
use crate::scope::{ScopeAnalysis, TokenScopeAnalyzer};
use crate::score::{CandidateScoring, QualityScorer};
use crate::token::Tokenizer;
use crate::tree::flatten;
use crate::validate::{BehaviorValidator, ExtractabilityCheck};

/// Orchestrates candidate enumeration, analysis, filtering, and scoring
/// for one method at a time.
pub struct ExtractionEngine {
    analyzer: Box<dyn ScopeAnalysis>,
    validator: Box<dyn ExtractabilityCheck>,
    scorer: Box<dyn CandidateScoring>,
}

impl ExtractionEngine {
    /// Compose an engine from explicit analysis stages.
    pub fn new(
        analyzer: Box<dyn ScopeAnalysis>,
        validator: Box<dyn ExtractabilityCheck>,
        scorer: Box<dyn CandidateScoring>,
    ) -> Self {
        ExtractionEngine {
            analyzer,
            validator,
            scorer,
        }
    }

    /// Wire the default stages around the given tokenizer.
    pub fn with_tokenizer<T>(tokenizer: T, config: AnalysisConfig) -> Self
    where
        T: Tokenizer + Send + Sync + 'static,
    {
        ExtractionEngine::new(
            Box::new(TokenScopeAnalyzer::new(tokenizer)),
            Box::new(BehaviorValidator::new(config)),
            Box::new(QualityScorer::new(config)),
        )
    }

    /// Enumerate every contiguous run of direct children of every block,
    /// the method body included: `n(n+1)/2` runs per block of `n`
    /// children, in pre-order block order then (start, end) order.
    pub fn enumerate(&self, method: &Method) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        push_runs(&method.body, &mut candidates);
        for statement in flatten(&method.body) {
            if let Statement::Block { children, .. } = statement {
                push_runs(children, &mut candidates);
            }
        }
        candidates
    }

    /// Enumerate, analyze, and filter: the candidates whose extraction
    /// preserves behavior and meets the minimum size, with their derived
    /// variable sets populated.
    pub fn candidates(&self, method: &Method) -> AnalysisResult<Vec<Candidate>> {
        let enumerated = self.enumerate(method);
        let total = enumerated.len();
        let mut kept = Vec::new();
        for mut candidate in enumerated {
            self.analyzer.analyze(method, &mut candidate)?;
            if self.validator.is_extractable(method, &candidate) {
                kept.push(candidate);
            }
        }
        debug!(
            "{} of {} candidates survive filtering for {}",
            kept.len(),
            total,
            method.name
        );
        Ok(kept)
    }

    /// The filtered candidates with their sub-scores and total populated,
    /// ready for ranking.
    pub fn scored_candidates(&self, method: &Method) -> AnalysisResult<Vec<Candidate>> {
        let mut kept = self.candidates(method)?;
        for candidate in &mut kept {
            candidate.scores = Some(self.scorer.score(method, candidate)?);
        }
        Ok(kept)
    }

    /// Stable descending sort by total score; unscored candidates sink to
    /// the end.
    pub fn rank(candidates: &mut [Candidate]) {
        candidates.sort_by(|a, b| {
            let a_total = a.total_score().unwrap_or(f64::NEG_INFINITY);
            let b_total = b.total_score().unwrap_or(f64::NEG_INFINITY);
            b_total
                .partial_cmp(&a_total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

fn push_runs(list: &[Statement], candidates: &mut Vec<Candidate>) {
    for start in 0..list.len() {
        for end in start + 1..=list.len() {
            candidates.push(Candidate::new(list[start..end].to_vec()));
        }
    }
}
