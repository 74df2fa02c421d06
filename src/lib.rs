//! Carve: extract-method candidate analysis.
//!
//! Given one method already decomposed into a statement/block tree, carve
//! enumerates every contiguous run of sibling statements as an extraction
//! candidate, derives the variables each run declares and borrows from its
//! surroundings, filters the runs whose extraction would change program
//! behavior, and scores the survivors so the caller can rank the best
//! extraction.
//!
//! The crate is a pure in-process library: no parsing, no file or network
//! I/O, no rewriting. The statement tree and the lexer are supplied by the
//! host — the tree as a populated [`model::Method`], the lexer through the
//! [`token::Tokenizer`] trait.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod scope;
pub mod score;
pub mod token;
pub mod tree;
pub mod validate;

pub use config::AnalysisConfig;
pub use engine::ExtractionEngine;
pub use error::{AnalysisError, AnalysisResult};
pub use model::{
    Candidate, Method, Parameter, Scores, Span, Statement, StmtIndex, TokenRun, TreeBuilder,
    Variable,
};
pub use scope::{ScopeAnalysis, TokenScopeAnalyzer, INSTANCE_PREFIX};
pub use score::{CandidateScoring, QualityScorer};
pub use token::{DefaultTokenizer, Tokenizer};
pub use tree::PatternKind;
pub use validate::{BehaviorValidator, ExtractabilityCheck};
