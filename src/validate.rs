//! Structural validation: would extracting this candidate change behavior?
//!
//! Two independent gates, both required. Behavior preservation covers three
//! rules — no reassignment of a variable owned by the surrounding method,
//! no candidate-declared variable still referenced in a bounded window of
//! the remaining method, and structural completeness of both fragments.
//! The quality gate requires a configured minimum statement count on both
//! sides of the split.
//!
//! A rejected candidate is a data outcome, not an error: the check returns
//! `false` and the engine simply drops the candidate.

use crate::config::AnalysisConfig;
use crate::model::{Candidate, Method, Statement, StmtIndex, TokenRun};
use crate::tree::{
    self, count_statements, find_position, flatten, matches_pattern, mentions,
    remaining_after_removing, wrap_as_block, PatternKind,
};

/// One-entry-point validation seam.
pub trait ExtractabilityCheck: Send + Sync {
    /// Whether extracting the candidate preserves program behavior and
    /// syntactic completeness, and both fragments meet the minimum size.
    ///
    /// Expects the candidate's derived attributes (raw token runs, locals)
    /// to be populated by the scope analyzer.
    fn is_extractable(&self, method: &Method, candidate: &Candidate) -> bool;
}

/// The default validator.
#[derive(Debug, Clone)]
pub struct BehaviorValidator {
    config: AnalysisConfig,
}

impl BehaviorValidator {
    /// Create a validator with the given configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        BehaviorValidator { config }
    }
}

impl ExtractabilityCheck for BehaviorValidator {
    fn is_extractable(&self, method: &Method, candidate: &Candidate) -> bool {
        if candidate.is_empty() {
            return false;
        }
        let method_block = wrap_as_block(&method.body);
        let candidate_block = wrap_as_block(&candidate.statements);
        let remaining = remaining_after_removing(&method_block, &candidate_block);

        self.passes_size_gate(&candidate_block, &remaining)
            && !writes_outer_local(method, candidate)
            && no_scope_leak(method, candidate, &remaining)
            && is_structurally_complete(method, candidate)
    }
}

impl BehaviorValidator {
    fn passes_size_gate(&self, candidate_block: &Statement, remaining: &Statement) -> bool {
        let min = self.config.min_candidate_statements;
        count_statements(candidate_block) >= min && count_statements(remaining) >= min
    }
}

// ============================================================================
// Unsafe Mutation
// ============================================================================

/// Whether any candidate statement reassigns (or increments/decrements) a
/// variable the surrounding method owns. Once the statement moves into a
/// new method scope the update would stop propagating.
///
/// Also consulted by the scorer's return-cost rule.
pub(crate) fn writes_outer_local(method: &Method, candidate: &Candidate) -> bool {
    candidate
        .raw_tokens
        .iter()
        .any(|run| run_writes_outer_local(method, candidate, run))
}

fn run_writes_outer_local(method: &Method, candidate: &Candidate, run: &TokenRun) -> bool {
    let has_eq = run.tokens.iter().any(|t| t == "==");
    let has_ne = run.tokens.iter().any(|t| t == "!=");
    // Reproduced from the observed behavior: the assignment rule is
    // disabled only when the statement carries both comparison operators.
    let assignment_rule_active = !has_eq || !has_ne;

    for (i, token) in run.tokens.iter().enumerate() {
        if assignment_rule_active && is_assignment_operator(token) && i > 0 {
            if is_outer_local(method, candidate, &run.tokens[i - 1], run.index) {
                return true;
            }
        }
        if token == "++" || token == "--" {
            let operand = match run.tokens.get(i + 1) {
                Some(next) if !is_operator_token(next) => Some(next),
                _ => i.checked_sub(1).map(|p| &run.tokens[p]),
            };
            if let Some(operand) = operand {
                if is_outer_local(method, candidate, operand, run.index) {
                    return true;
                }
            }
        }
    }
    false
}

fn is_assignment_operator(token: &str) -> bool {
    matches!(
        token,
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" | ">>="
    )
}

fn is_operator_token(token: &str) -> bool {
    !token.chars().any(tree::is_ident_char)
}

/// A method local visible at the statement that is not declared by the
/// candidate itself.
fn is_outer_local(method: &Method, candidate: &Candidate, name: &str, at: StmtIndex) -> bool {
    method
        .locals
        .iter()
        .any(|v| v.name == name && v.decl_index <= at)
        && !candidate.has_local(name)
}

// ============================================================================
// Scope Leak
// ============================================================================

/// No candidate-declared variable may still be referenced in the bounded
/// forward window of the remaining tree. The window runs from just after
/// the candidate to the end marker of the first enclosing block (scanning
/// backward through the flattened remaining tree) whose end index reaches
/// the candidate's last index, falling back to the last statement of the
/// remaining tree. A candidate consuming an entire block leaves nothing in
/// its scope to check.
fn no_scope_leak(method: &Method, candidate: &Candidate, remaining: &Statement) -> bool {
    if candidate.locals.is_empty() {
        return true;
    }
    if consumes_entire_block(method, candidate) {
        return true;
    }
    let Some(last) = candidate.last_index() else {
        return true;
    };

    let flat = flatten(remaining.children());
    let cut = flat
        .iter()
        .position(|s| s.index() > last)
        .unwrap_or(flat.len());
    let boundary = flat[..cut]
        .iter()
        .rev()
        .find_map(|s| match s.end_marker() {
            Some(end) if end.index() >= last => Some(end.index()),
            _ => None,
        })
        .or_else(|| flat.last().map(|s| s.index()));
    let Some(boundary) = boundary else {
        return true;
    };

    flat[cut..]
        .iter()
        .take_while(|s| s.index() <= boundary)
        .all(|s| !candidate.locals.iter().any(|v| mentions(s.text(), &v.name)))
}

fn consumes_entire_block(method: &Method, candidate: &Candidate) -> bool {
    flatten(&method.body)
        .iter()
        .any(|s| s.is_block() && s.children() == candidate.statements.as_slice())
}

// ============================================================================
// Structural Completeness
// ============================================================================

fn is_structurally_complete(method: &Method, candidate: &Candidate) -> bool {
    !splits_guarded_block(method, candidate) && complete_list(method, &candidate.statements)
}

/// Walk a statement list (recursing into nested blocks) and reject any
/// fragment whose structural counterpart was left outside the candidate.
fn complete_list(method: &Method, list: &[Statement]) -> bool {
    for (i, statement) in list.iter().enumerate() {
        let text = statement.text();
        // moving a return into a callee changes control flow
        if matches_pattern(text, PatternKind::Return) {
            return false;
        }
        // a continuation block whose opener is outside the run
        let continuation = matches_pattern(text, PatternKind::Else)
            || matches_pattern(text, PatternKind::Catch)
            || matches_pattern(text, PatternKind::Finally);
        if continuation && i == 0 {
            return false;
        }
        if statement.is_block() {
            // an opener whose required continuation is outside the run
            let opener = matches_pattern(text, PatternKind::Try)
                || matches_pattern(text, PatternKind::Do);
            if opener && i + 1 == list.len() {
                return false;
            }
            if matches_pattern(text, PatternKind::If) && !else_is_paired(method, list, i) {
                return false;
            }
            if !complete_list(method, statement.children()) {
                return false;
            }
        } else if matches_pattern(text, PatternKind::While)
            && !list[..i]
                .iter()
                .any(|p| matches_pattern(p.text(), PatternKind::Do))
        {
            // a non-block while is the do-while tail
            return false;
        }
    }
    true
}

/// An `if` block may only be extracted together with its `else`: locate the
/// `if` in the original method's sibling lists and, when the immediately
/// following sibling is an `else` block, require the walked list to carry
/// it in the next position.
fn else_is_paired(method: &Method, list: &[Statement], i: usize) -> bool {
    let target = &list[i];
    for siblings in sibling_lists(method) {
        if let Some(position) = find_position(siblings, target) {
            return match siblings.get(position + 1) {
                Some(next) if next.is_block() && matches_pattern(next.text(), PatternKind::Else) => {
                    list.get(i + 1) == Some(next)
                }
                _ => true,
            };
        }
    }
    true
}

fn sibling_lists(method: &Method) -> Vec<&[Statement]> {
    let mut lists = vec![method.body.as_slice()];
    for statement in flatten(&method.body) {
        if let Statement::Block { children, .. } = statement {
            lists.push(children.as_slice());
        }
    }
    lists
}

/// Splitting the body of a `catch` (or `switch`) is unsafe regardless of
/// completeness: reject any candidate with a statement strictly inside such
/// a block when the block's end marker lies beyond the candidate.
fn splits_guarded_block(method: &Method, candidate: &Candidate) -> bool {
    let Some(last) = candidate.last_index() else {
        return false;
    };
    flatten(&method.body).iter().any(|s| {
        let Some(end) = s.end_marker() else {
            return false;
        };
        let guarded = matches_pattern(s.text(), PatternKind::Catch)
            || matches_pattern(s.text(), PatternKind::Switch);
        guarded
            && end.index() > last
            && candidate
                .statements
                .iter()
                .any(|c| c.index() > s.index() && c.index() < end.index())
    })
}
