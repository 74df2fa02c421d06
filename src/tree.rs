//! Shared, stateless operations over the statement/block tree.
//!
//! Everything here is a pure function: flattening, copying, counting,
//! positional search, sub-tree extraction (the "remaining" tree after a
//! candidate is removed), and the start-anchored pattern classification the
//! structural validator keys on. Not-found outcomes are `None` sentinels,
//! never errors.

use crate::model::{Span, Statement, StmtIndex};

/// Structural keywords a statement's text can be classified against. The
/// set is fixed and anchored to the start of the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    If,
    Else,
    Try,
    Catch,
    Finally,
    Do,
    While,
    Return,
    Switch,
}

impl PatternKind {
    fn keyword(self) -> &'static str {
        match self {
            PatternKind::If => "if",
            PatternKind::Else => "else",
            PatternKind::Try => "try",
            PatternKind::Catch => "catch",
            PatternKind::Finally => "finally",
            PatternKind::Do => "do",
            PatternKind::While => "while",
            PatternKind::Return => "return",
            PatternKind::Switch => "switch",
        }
    }
}

/// Whether a character can appear inside an identifier.
pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether the statement text begins with the given structural keyword,
/// followed by a non-identifier character (so `iffy()` is not an `if`).
pub fn matches_pattern(text: &str, kind: PatternKind) -> bool {
    let trimmed = text.trim_start();
    let keyword = kind.keyword();
    trimmed.starts_with(keyword)
        && !trimmed[keyword.len()..]
            .chars()
            .next()
            .is_some_and(is_ident_char)
}

/// Whether the text mentions `name` as a whole identifier (not as a
/// fragment of a longer one).
pub fn mentions(text: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    text.match_indices(name).any(|(pos, _)| {
        let before_ok = !text[..pos].chars().next_back().is_some_and(is_ident_char);
        let after_ok = !text[pos + name.len()..]
            .chars()
            .next()
            .is_some_and(is_ident_char);
        before_ok && after_ok
    })
}

/// Build a synthetic block over a statement list, so the method body and
/// any candidate run can be handled uniformly with real blocks. The end
/// marker carries the index following the run's last descendant.
pub fn wrap_as_block(statements: &[Statement]) -> Statement {
    let first_index = statements.first().map_or(0, |s| s.index().0);
    let last_index = statements.last().map_or(0, |s| s.last_index().0);
    let start = statements.first().map_or(0, |s| s.span().start);
    let end = statements.last().map_or(0, |s| s.span().end);
    let marker = Statement::simple("", StmtIndex::new(last_index + 1), Span::new(end, end));
    Statement::block(
        "",
        StmtIndex::new(first_index),
        Span::new(start, end),
        statements.to_vec(),
        marker,
    )
}

/// Total descendant statement count of a block (end markers excluded).
pub fn count_statements(block: &Statement) -> usize {
    block.children().iter().map(subtree_size).sum()
}

fn subtree_size(statement: &Statement) -> usize {
    match statement {
        Statement::Simple { .. } => 1,
        Statement::Block { children, .. } => {
            1 + children.iter().map(subtree_size).sum::<usize>()
        }
    }
}

/// Pre-order list of every statement and transitively every descendant.
/// End markers are reachable through their owning block, not listed.
pub fn flatten(statements: &[Statement]) -> Vec<&Statement> {
    let mut out = Vec::new();
    collect(statements, &mut out);
    out
}

fn collect<'a>(statements: &'a [Statement], out: &mut Vec<&'a Statement>) {
    for statement in statements {
        out.push(statement);
        if let Statement::Block { children, .. } = statement {
            collect(children, out);
        }
    }
}

/// Locate the statement with the given pre-order index anywhere in the
/// subtree, end markers included. Not-found is `None`, never an error.
pub fn find_by_index(statements: &[Statement], index: StmtIndex) -> Option<&Statement> {
    for statement in statements {
        if statement.index() == index {
            return Some(statement);
        }
        if let Statement::Block { children, end, .. } = statement {
            if end.index() == index {
                return Some(end);
            }
            if let Some(found) = find_by_index(children, index) {
                return Some(found);
            }
        }
    }
    None
}

/// Direct-child position of a statement structurally equal to `target`
/// within the given list.
pub fn find_position(statements: &[Statement], target: &Statement) -> Option<usize> {
    statements.iter().position(|s| s == target)
}

/// Deep-copy `method_block` and remove the candidate's statements at the
/// one nesting level that holds them all as direct children. Candidates are
/// removable at exactly one level by construction; a run found at no level
/// leaves the copy unchanged.
pub fn remaining_after_removing(method_block: &Statement, candidate_block: &Statement) -> Statement {
    let mut copy = method_block.clone();
    remove_run(&mut copy, candidate_block.children());
    copy
}

fn remove_run(block: &mut Statement, run: &[Statement]) -> bool {
    if run.is_empty() {
        return true;
    }
    let Statement::Block { children, .. } = block else {
        return false;
    };
    if let Some(position) = position_of_run(children, run) {
        children.drain(position..position + run.len());
        return true;
    }
    children.iter_mut().any(|child| remove_run(child, run))
}

fn position_of_run(children: &[Statement], run: &[Statement]) -> Option<usize> {
    if run.len() > children.len() {
        return None;
    }
    (0..=children.len() - run.len()).find(|&p| &children[p..p + run.len()] == run)
}
