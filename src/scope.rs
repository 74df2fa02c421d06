//! Scope analysis: token-level data-flow classification for one candidate.
//!
//! One pass over the candidate's statements in document order (recursing
//! into nested blocks in place) classifies every token into one of three
//! fates: it opens or names a local declared inside the candidate, it is an
//! instance-scope access recorded as escaping, or it is a use of an
//! existing variable recorded as escaping on first use. The full raw token
//! list of every scanned statement is retained for the behavior
//! preservation rules downstream.
//!
//! A single "type-name seen" flag is carried across the whole candidate,
//! so a declaration whose type and name tokens fall in the same statement
//! (the common case) and the running classification state stay consistent
//! statement to statement.

use indexmap::IndexSet;

use crate::error::{AnalysisError, AnalysisResult};
use crate::model::{Candidate, Method, Statement, StmtIndex, TokenRun, Variable};
use crate::token::Tokenizer;

/// Prefix marking an instance-scope access in a token (e.g. `this.total`).
pub const INSTANCE_PREFIX: &str = "this.";

/// One-entry-point analysis seam: derive a candidate's raw token runs and
/// its local/global variable sets.
pub trait ScopeAnalysis: Send + Sync {
    /// Populate `raw_tokens`, `locals`, and `globals` on the candidate.
    ///
    /// Fails with an invalid-arguments error if the candidate holds no
    /// statements; never partially mutates the candidate on failure.
    fn analyze(&self, method: &Method, candidate: &mut Candidate) -> AnalysisResult<()>;
}

/// Scope analyzer driven by an external [`Tokenizer`].
#[derive(Debug, Clone)]
pub struct TokenScopeAnalyzer<T> {
    tokenizer: T,
}

impl<T: Tokenizer> TokenScopeAnalyzer<T> {
    /// Create an analyzer over the given tokenizer.
    pub fn new(tokenizer: T) -> Self {
        TokenScopeAnalyzer { tokenizer }
    }
}

/// Classification state carried across the candidate's statements.
#[derive(Debug, Default)]
struct Scan {
    /// Type and declaring index of a just-opened local record, armed by a
    /// type-name token and consumed by the next plain token.
    opened: Option<(String, StmtIndex)>,
    runs: Vec<TokenRun>,
    locals: Vec<Variable>,
    globals: IndexSet<String>,
}

impl<T: Tokenizer + Send + Sync> ScopeAnalysis for TokenScopeAnalyzer<T> {
    fn analyze(&self, method: &Method, candidate: &mut Candidate) -> AnalysisResult<()> {
        if candidate.statements.is_empty() {
            return Err(AnalysisError::invalid_arguments(
                "cannot analyze a candidate with no statements",
            ));
        }
        let mut scan = Scan::default();
        self.scan_statements(&candidate.statements, &mut scan);

        // Locals shadowing a method parameter remain visible at the
        // extraction boundary (the caller supplies them), so they move to
        // the escaping set instead.
        let mut locals = Vec::new();
        for variable in scan.locals {
            if method.has_parameter(&variable.name) {
                scan.globals.insert(variable.name);
            } else {
                locals.push(variable);
            }
        }

        candidate.raw_tokens = scan.runs;
        candidate.locals = locals;
        candidate.globals = scan.globals;
        Ok(())
    }
}

impl<T: Tokenizer> TokenScopeAnalyzer<T> {
    fn scan_statements(&self, statements: &[Statement], scan: &mut Scan) {
        for statement in statements {
            self.scan_one(statement, scan);
            if let Statement::Block { children, .. } = statement {
                self.scan_statements(children, scan);
            }
        }
    }

    fn scan_one(&self, statement: &Statement, scan: &mut Scan) {
        let tokens = self.tokenizer.tokenize(statement.text());
        for token in &tokens {
            if !starts_like_identifier(token) {
                continue;
            }
            if self.tokenizer.is_type_name(token) {
                scan.opened = Some((token.clone(), statement.index()));
                continue;
            }
            if let Some(stripped) = token.strip_prefix(INSTANCE_PREFIX) {
                scan.globals.insert(stripped.to_string());
                continue;
            }
            match scan.opened.take() {
                Some((ty, decl_index)) => {
                    scan.locals.push(Variable::new(token.clone(), ty, decl_index));
                }
                None => {
                    let known = scan.locals.iter().any(|v| &v.name == token)
                        || scan.globals.contains(token.as_str());
                    if !known {
                        scan.globals.insert(token.clone());
                    }
                }
            }
        }
        scan.runs.push(TokenRun {
            index: statement.index(),
            tokens,
        });
    }
}

/// Operator and literal tokens carry no variable identity; only tokens
/// opening like an identifier are classified.
fn starts_like_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TreeBuilder;
    use crate::token::DefaultTokenizer;

    fn analyzer() -> TokenScopeAnalyzer<DefaultTokenizer> {
        TokenScopeAnalyzer::new(DefaultTokenizer::new())
    }

    fn analyzed(method: &Method, statements: Vec<Statement>) -> Candidate {
        let mut candidate = Candidate::new(statements);
        analyzer().analyze(method, &mut candidate).unwrap();
        candidate
    }

    #[test]
    fn empty_candidate_is_an_invalid_argument() {
        let method = Method::new("m", "void");
        let mut candidate = Candidate::new(Vec::new());
        let err = analyzer().analyze(&method, &mut candidate).unwrap_err();
        assert!(err.to_string().contains("invalid arguments"));
    }

    #[test]
    fn type_token_opens_local_and_next_token_names_it() {
        let mut b = TreeBuilder::new();
        let method = Method::new("m", "void");
        let candidate = analyzed(&method, vec![b.simple("int total = base;")]);
        assert_eq!(candidate.locals.len(), 1);
        assert_eq!(candidate.locals[0].name, "total");
        assert_eq!(candidate.locals[0].ty, "int");
        assert_eq!(candidate.locals[0].decl_index, StmtIndex::new(0));
        assert!(candidate.globals.contains("base"));
        assert!(!candidate.globals.contains("total"));
    }

    #[test]
    fn instance_prefix_strips_and_records_global() {
        let mut b = TreeBuilder::new();
        let method = Method::new("m", "void");
        let candidate = analyzed(&method, vec![b.simple("this.count = limit;")]);
        assert!(candidate.globals.contains("count"));
        assert!(candidate.globals.contains("limit"));
        assert!(candidate.locals.is_empty());
    }

    #[test]
    fn first_use_wins_and_duplicates_are_not_rerecorded() {
        let mut b = TreeBuilder::new();
        let method = Method::new("m", "void");
        let candidate = analyzed(
            &method,
            vec![b.simple("use(alpha, beta);"), b.simple("use(beta, alpha);")],
        );
        let order: Vec<&str> = candidate.globals.iter().map(String::as_str).collect();
        assert_eq!(order, ["use", "alpha", "beta"]);
    }

    #[test]
    fn uses_of_candidate_locals_are_not_escaping() {
        let mut b = TreeBuilder::new();
        let method = Method::new("m", "void");
        let candidate = analyzed(
            &method,
            vec![b.simple("int total = 0;"), b.simple("emit(total);")],
        );
        assert!(!candidate.globals.contains("total"));
        assert!(candidate.globals.contains("emit"));
    }

    #[test]
    fn nested_blocks_are_scanned_in_document_order() {
        let mut b = TreeBuilder::new();
        let method = Method::new("m", "void");
        let block = b.block("if (ready)", |b| {
            vec![b.simple("int inner = seed;"), b.simple("push(inner);")]
        });
        let candidate = analyzed(&method, vec![block]);
        assert_eq!(candidate.locals.len(), 1);
        assert_eq!(candidate.locals[0].name, "inner");
        assert_eq!(candidate.locals[0].decl_index, StmtIndex::new(1));
        assert!(candidate.globals.contains("seed"));
        assert!(!candidate.globals.contains("inner"));
        // one raw token run per scanned statement, header included
        assert_eq!(candidate.raw_tokens.len(), 3);
    }

    #[test]
    fn type_flag_carries_across_statement_boundary() {
        let mut b = TreeBuilder::new();
        let method = Method::new("m", "void");
        // the declaring type ends one statement, the name opens the next
        let candidate = analyzed(&method, vec![b.simple("int"), b.simple("split = 0;")]);
        assert_eq!(candidate.locals.len(), 1);
        assert_eq!(candidate.locals[0].name, "split");
        assert_eq!(candidate.locals[0].decl_index, StmtIndex::new(0));
    }

    #[test]
    fn locals_matching_parameters_reclassify_as_escaping() {
        let mut b = TreeBuilder::new();
        let mut method = Method::new("m", "void");
        method.parameters.push(crate::model::Parameter::new("limit", "int"));
        let candidate = analyzed(&method, vec![b.simple("int limit = 0;")]);
        assert!(candidate.locals.is_empty());
        assert!(candidate.globals.contains("limit"));
    }

    #[test]
    fn raw_runs_keep_operators_for_later_rules() {
        let mut b = TreeBuilder::new();
        let method = Method::new("m", "void");
        let candidate = analyzed(&method, vec![b.simple("total += delta;")]);
        assert_eq!(candidate.raw_tokens[0].tokens, ["total", "+=", "delta", ";"]);
    }
}
