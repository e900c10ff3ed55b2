use super::*;
use crate::data::{Encoding, Value};
use crate::shorthand::{def, seq};
use pretty_assertions::assert_eq;

fn pval(name: &str, definition: &Token, byte: u8) -> ParseValue {
    ParseValue::new(name, definition.clone(), Value::from_bytes(vec![byte], Encoding::default())).unwrap()
}

fn bytes_of(values: &ImmutableList<ParseValue>) -> Vec<u8> {
    values.iter().map(|v| v.value().as_bytes()[0]).collect()
}

/// root: a=1, seq[a=2, b=3, seq[a=4]], a=5
fn sample() -> (ParseGraph, Token, Token) {
    let a = def("a", 1);
    let b = def("b", 1);
    let s = seq("s", []);
    let graph = ParseGraph::empty()
        .add_value(pval("a", &a, 1))
        .add_branch(s.clone())
        .add_value(pval("a", &a, 2))
        .add_value(pval("b", &b, 3))
        .add_branch(s.clone())
        .add_value(pval("a", &a, 4))
        .close_branch()
        .unwrap()
        .close_branch()
        .unwrap()
        .add_value(pval("a", &a, 5));
    (graph, a, b)
}

#[test]
fn test_most_recent_first() {
    let (graph, _, _) = sample();
    let found = get_all_values_by_name(&graph, "a", Limit::Unbounded);
    assert_eq!(bytes_of(&found), vec![5, 4, 2, 1]);
}

#[test]
fn test_limit() {
    let (graph, _, _) = sample();
    assert_eq!(bytes_of(&get_all_values_by_name(&graph, "a", Limit::AtMost(2))), vec![5, 4]);
    assert!(get_all_values_by_name(&graph, "a", Limit::AtMost(0)).is_empty());
    assert_eq!(get_all_values_by_name(&graph, "a", Limit::AtMost(10)).len(), 4);
}

#[test]
fn test_by_definition() {
    let (graph, _, b) = sample();
    assert_eq!(bytes_of(&get_all_values_by_definition(&graph, &b, Limit::Unbounded)), vec![3]);
    let stranger = def("b", 1);
    assert!(get_all_values_by_definition(&graph, &stranger, Limit::Unbounded).is_empty());
}

#[test]
fn test_custom_predicate() {
    let (graph, _, _) = sample();
    let even = get_all_values(&graph, |v| v.value().as_bytes()[0] % 2 == 0, Limit::Unbounded);
    assert_eq!(bytes_of(&even), vec![4, 2]);
}

#[test]
fn test_find_token_by_name() {
    let (graph, a, _) = sample();
    assert_eq!(find_token_by_name(&graph, "a"), Some(a));
    assert_eq!(find_token_by_name(&graph, "s").map(|t| t.name().to_owned()), Some("s".to_owned()));
    assert_eq!(find_token_by_name(&graph, "missing"), None);
}

#[test]
fn test_get_all_roots() {
    let (graph, _, _) = sample();
    let s = find_token_by_name(&graph, "s").unwrap();
    assert_eq!(get_all_roots(&graph, &s).len(), 2);
}

#[test]
fn test_long_graph_is_stack_safe() {
    let a = def("a", 1);
    let mut graph = ParseGraph::empty();
    for i in 0..100_000u32 {
        let byte = i.to_le_bytes()[0];
        graph = graph.add_branch(seq("s", [])).add_value(pval("a", &a, byte));
        graph = graph.close_branch().unwrap();
    }
    assert_eq!(get_all_values_by_name(&graph, "a", Limit::Unbounded).len(), 100_000);
}
