//! Searching a parse graph.
//!
//! All traversals keep their pending work on the heap: either as a
//! [`Trampoline`] or as an explicit stack of graphs. Graph depth follows
//! the input, so nothing here recurses on the call stack.

use lode_list::ImmutableList;
use lode_stack::Trampoline;

use crate::config::Limit;
use crate::data::{ParseGraph, ParseItem, ParseValue, Source};
use crate::token::Token;

/// Every value in `graph` satisfying `predicate`, most recent first.
///
/// Nested graphs are searched in place. References are not followed: the
/// graph a reference stands for is already part of the same tree.
pub fn get_all_values(
    graph: &ParseGraph,
    predicate: impl Fn(&ParseValue) -> bool,
    limit: Limit,
) -> ImmutableList<ParseValue> {
    let found = scan(vec![graph.clone()], Vec::new(), &predicate, limit).compute();
    found.into_iter().collect()
}

pub fn get_all_values_by_name(graph: &ParseGraph, name: &str, limit: Limit) -> ImmutableList<ParseValue> {
    get_all_values(graph, |value| value.matches_name(name), limit)
}

pub fn get_all_values_by_definition(
    graph: &ParseGraph,
    definition: &Token,
    limit: Limit,
) -> ImmutableList<ParseValue> {
    get_all_values(graph, |value| value.matches_definition(definition), limit)
}

fn scan<'a>(
    mut pending: Vec<ParseGraph>,
    mut found: Vec<ParseValue>,
    predicate: &'a dyn Fn(&ParseValue) -> bool,
    limit: Limit,
) -> Trampoline<'a, Vec<ParseValue>> {
    if limit.is_reached(found.len()) {
        return Trampoline::complete(found);
    }
    let Some(graph) = pending.pop() else {
        return Trampoline::complete(found);
    };
    if let Some(head) = graph.head() {
        if let Some(tail) = graph.tail() {
            pending.push(tail.clone());
        }
        match head {
            ParseItem::Value(value) if predicate(value) => found.push(value.clone()),
            ParseItem::Graph(child) if child.value_count() > 0 => pending.push(child.clone()),
            _ => {}
        }
    }
    Trampoline::intermediate(move || scan(pending, found, predicate, limit))
}

/// Graphs in `root` (including `root`) defined by `definition`.
pub fn get_all_roots(root: &ParseGraph, definition: &Token) -> Vec<ParseGraph> {
    let mut roots = Vec::new();
    let mut pending = vec![root.clone()];
    while let Some(graph) = pending.pop() {
        if graph.definition().is_some_and(|token| token.stands_for(definition)) {
            roots.push(graph.clone());
        }
        pending.extend(graph.items().filter_map(|item| match item {
            ParseItem::Graph(child) => Some(child.clone()),
            _ => None,
        }));
    }
    roots
}

/// The graph defined by `definition` whose first value read from `source`
/// starts at `location`.
pub fn find_graph_at(
    root: &ParseGraph,
    definition: &Token,
    location: u64,
    source: &Source,
) -> Option<ParseGraph> {
    get_all_roots(root, definition)
        .into_iter()
        .find(|graph| first_offset(graph, source) == Some(location))
}

fn first_offset(graph: &ParseGraph, source: &Source) -> Option<u64> {
    get_all_values(graph, |value| value.value().slice().source() == source, Limit::Unbounded)
        .iter()
        .last()
        .map(|value| value.value().slice().offset())
}

/// The definition of the most recent item in `graph` named `name`.
pub fn find_token_by_name(graph: &ParseGraph, name: &str) -> Option<Token> {
    let mut pending = vec![graph.clone()];
    while let Some(graph) = pending.pop() {
        if let Some(token) = graph.definition().filter(|token| token.name() == name) {
            return Some(token.clone());
        }
        let Some(head) = graph.head() else {
            continue;
        };
        if let Some(tail) = graph.tail() {
            pending.push(tail.clone());
        }
        match head {
            ParseItem::Graph(child) => pending.push(child.clone()),
            item => {
                if let Some(token) = item.definition().filter(|token| token.name() == name) {
                    return Some(token.clone());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests;
