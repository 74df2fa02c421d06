//! End-to-end scenarios over the full analysis pipeline.

use carve::{
    AnalysisConfig, Candidate, DefaultTokenizer, ExtractionEngine, Method, TreeBuilder, Variable,
};

fn engine(min: usize) -> ExtractionEngine {
    ExtractionEngine::with_tokenizer(
        DefaultTokenizer::new(),
        AnalysisConfig {
            min_candidate_statements: min,
            ..AnalysisConfig::default()
        },
    )
}

/// `r = f(); if (cond) { a(); b(); } return r;` with `r` a method local.
fn scenario_method() -> Method {
    let mut b = TreeBuilder::new();
    let body = vec![
        b.simple("r = f();"),
        b.block("if (cond)", |b| vec![b.simple("a();"), b.simple("b();")]),
        b.simple("return r;"),
    ];
    let mut method = Method::new("sample", "int");
    method.locals.push(Variable::new("r", "int", body[0].index()));
    method.body = body;
    method
}

fn texts(candidate: &Candidate) -> Vec<&str> {
    candidate.statements.iter().map(|s| s.text()).collect()
}

#[test]
fn enumeration_covers_every_run_of_every_block() {
    let method = scenario_method();
    // body has 3 direct children (6 runs), the if block has 2 (3 runs)
    assert_eq!(engine(1).enumerate(&method).len(), 9);
}

#[test]
fn scenario_survivors_are_exactly_the_safe_runs() {
    let method = scenario_method();
    let kept = engine(1).candidates(&method).unwrap();
    let shapes: Vec<Vec<&str>> = kept.iter().map(texts).collect();
    // runs touching `r = f();` reassign a method local; runs touching
    // `return r;` are abnormal; everything else survives
    assert_eq!(shapes, [
        vec!["if (cond)"],
        vec!["a();"],
        vec!["a();", "b();"],
        vec!["b();"],
    ]);
}

#[test]
fn full_block_slice_is_valid_without_a_leak_window() {
    let mut b = TreeBuilder::new();
    let body = vec![
        b.simple("start();"),
        b.block("if (cond)", |b| {
            vec![b.simple("int t = g();"), b.simple("h(t);")]
        }),
        b.simple("finish();"),
    ];
    let mut method = Method::new("sample", "void");
    method.body = body;
    let kept = engine(1).candidates(&method).unwrap();
    // the full block body travels with its declaration
    assert!(kept.iter().any(|c| texts(c) == ["int t = g();", "h(t);"]));
    // the partial slice leaves `h(t)` behind inside the same scope
    assert!(!kept.iter().any(|c| texts(c) == ["int t = g();"]));
}

#[test]
fn default_minimum_size_rejects_the_small_scenario() {
    let method = scenario_method();
    // with the default minimum of 3 statements per side, every run in this
    // small method leaves too little on one side or the other
    let kept = engine(3).candidates(&method).unwrap();
    assert!(kept.is_empty());
}

#[test]
fn scoring_pipeline_populates_and_ranks() {
    let method = scenario_method();
    let mut scored = engine(1).scored_candidates(&method).unwrap();
    assert!(scored.iter().all(|c| c.scores.is_some()));
    ExtractionEngine::rank(&mut scored);
    let totals: Vec<f64> = scored.iter().map(|c| c.total_score().unwrap()).collect();
    assert!(totals.windows(2).all(|w| w[0] >= w[1]));
    // the balanced whole-block runs outrank the single statements, and the
    // tie between them keeps enumeration order
    assert_eq!(texts(&scored[0]), ["if (cond)"]);
    assert_eq!(texts(&scored[1]), ["a();", "b();"]);
}

#[test]
fn analysis_is_repeatable() {
    let method = scenario_method();
    let first = engine(1).scored_candidates(&method).unwrap();
    let second = engine(1).scored_candidates(&method).unwrap();
    assert_eq!(first, second);
}

#[test]
fn scored_candidates_serialize_for_hosts() {
    let method = scenario_method();
    let scored = engine(1).scored_candidates(&method).unwrap();
    let json = serde_json::to_string(&scored).unwrap();
    assert!(json.contains("\"scores\""));
    assert!(json.contains("\"total\""));
    let back: Vec<Candidate> = serde_json::from_str(&json).unwrap();
    assert_eq!(scored, back);
}
