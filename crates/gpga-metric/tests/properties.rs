//! Metric-level behavior on decoded graphs and property checks

use gpga_codec::{metadata, penman};
use gpga_core::{Graph, PathQuery};
use gpga_metric::{
    canonicalize, greedy_match, AllPaths, CanonOptions, Metric, ScoreOptions, Scorer,
};
use proptest::prelude::*;

const WANT: &str = "# ::tok The boy wants to go\n\
(w / want-01\n   :ARG0 (b / boy)\n   :ARG1 (g / go-01\n            :ARG0 b))";

#[test]
fn suppressed_reentrancy_gives_two_paths() {
    let (_, graph) = penman::decode(WANT, false).unwrap();
    let query = PathQuery::new().suppress_reentrancy(true);
    let scorer = Scorer::new(Metric::Gpga, ScoreOptions { query, ..Default::default() }).unwrap();

    assert_eq!(
        scorer.paths(&graph).unwrap(),
        vec!["want-01 :ARG1 go-01", "want-01 :ARG0 boy"]
    );
}

#[test]
fn reentrant_node_kept_under_every_parent_by_default() {
    let (_, graph) = penman::decode(WANT, false).unwrap();
    let scorer = Scorer::new(Metric::Gpga, ScoreOptions::default()).unwrap();

    assert_eq!(
        scorer.paths(&graph).unwrap(),
        vec!["want-01 :ARG1 go-01 :ARG0 boy", "want-01 :ARG0 boy"]
    );
}

#[test]
fn case_insensitive_precision_example() {
    let gold = vec!["want-01 :arg0 boy".to_string(), "want-01 :arg1 go-01".to_string()];
    let predicted = vec!["WANT-01 :ARG0 BOY".to_string(), "go-01 :arg0 boy".to_string()];
    let matched = greedy_match(&predicted, &gold);

    assert_eq!(matched.hits, vec!["want-01 :arg0 boy"]);
    assert_eq!(matched.misses, vec!["go-01 :arg0 boy"]);
    let precision = matched.hits.len() as f64 / predicted.len() as f64;
    assert_eq!(precision, 0.5);
    let exact = matched.hits.len() == gold.len();
    assert!(!exact);
}

#[test]
fn case_insensitive_hit_without_full_gold_is_not_exact() {
    let gold = Graph::new(vec!["boy".into(), "wants".into(), "go".into()])
        .with_node("w", "want-01")
        .with_node("b", "boy")
        .with_node("g", "go-01")
        .with_edge("w", ":ARG0", "b")
        .with_edge("w", ":ARG1", "g")
        .with_root("w");
    let predicted = Graph::new(vec!["boy".into(), "wants".into(), "go".into()])
        .with_node("w", "WANT-01")
        .with_node("b", "BOY")
        .with_edge("w", ":ARG0", "b")
        .with_node("x", "go-01")
        .with_edge("w", ":mod", "x")
        .with_root("w");
    let scorer = Scorer::new(Metric::Gpga, ScoreOptions::default()).unwrap();
    let sentence = scorer.score_sentence(0, &predicted, &gold).unwrap();

    assert_eq!(sentence.hits, 1);
    assert_eq!(sentence.misses, 1);
    assert_eq!(sentence.predicted_paths, 2);
    assert!(!sentence.exact);
}

#[test]
fn kb_metric_scores_entity_question() {
    let block = "# ::tok Who did Obama meet ?\n\
# ::node\tm\tmeet-02\n\
# ::node\tp\tperson\n\
# ::node\tn\tname\n\
# ::node\t0\tObama\n\
# ::node\tu\tamr-unknown\n\
# ::node\tt\ttoday\n\
# ::root\tm\tmeet-02\n\
# ::edge\tmeet-02\tARG0\tperson\tm\tp\t\n\
# ::edge\tperson\tname\tname\tp\tn\t\n\
# ::edge\tname\top1\tObama\tn\t0\t\n\
# ::edge\tmeet-02\tARG1\tamr-unknown\tm\tu\t\n\
# ::edge\tmeet-02\ttime\ttoday\tm\tt\t\n";
    let gold = metadata::decode(block, false).unwrap();
    let scorer = Scorer::new(Metric::GpgaKb, ScoreOptions::default()).unwrap();

    assert_eq!(
        scorer.paths(&gold).unwrap(),
        vec!["meet-02 :ARG1 amr-unknown", "meet-02 :ARG0 person :name \"Obama\""]
    );

    let corpus = scorer.score_corpus(&[(0, &gold, &gold)]);
    assert_eq!(corpus.precision(), 1.0);
    assert_eq!(corpus.report_lines()[1], "Unknowns: 1/1 (EM 1.000)");
}

fn graph_strategy() -> impl Strategy<Value = Graph> {
    (2usize..8).prop_flat_map(|size| {
        let edge = (0..size, 0..size, prop::sample::select(vec![":ARG0", ":ARG1", ":mod"]));
        prop::collection::vec(edge, 1..14).prop_map(move |edges| {
            let mut graph = Graph::new(vec![]);
            for index in 0..size {
                graph = graph.with_node(format!("n{}", index), format!("c{}", index % 4));
            }
            for (source, target, role) in edges {
                graph = graph.with_edge(format!("n{}", source), role, format!("n{}", target));
            }
            graph.with_root("n0")
        })
    })
}

proptest! {
    #[test]
    fn canonicalization_is_idempotent(graph in graph_strategy(), ignore in any::<bool>()) {
        let options = CanonOptions::default().ignore_entity_types(ignore);
        let scorer = Scorer::with_selector(
            Metric::Gpga,
            Box::new(AllPaths::default()),
            options,
        );
        let once = scorer.paths(&graph).unwrap();
        prop_assert_eq!(canonicalize(once.clone(), options), once);
    }

    #[test]
    fn matching_ignores_prediction_order(
        predicted in prop::collection::vec("[a-cA-C]{1,2}", 0..8),
        gold in prop::collection::vec("[a-c]{1,2}", 0..8),
    ) {
        let mut reversed = predicted.clone();
        reversed.reverse();
        prop_assert_eq!(
            greedy_match(&predicted, &gold).hits,
            greedy_match(&reversed, &gold).hits
        );
    }

    #[test]
    fn self_comparison_is_exact(graph in graph_strategy()) {
        let scorer = Scorer::new(Metric::Gpga, ScoreOptions::default()).unwrap();
        let sentence = scorer.score_sentence(0, &graph, &graph).unwrap();
        prop_assert!(sentence.exact);
        prop_assert_eq!(sentence.misses, 0);
        prop_assert_eq!(sentence.hits, sentence.gold_paths);
    }
}
