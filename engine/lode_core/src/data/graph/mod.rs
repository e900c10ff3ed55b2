//! The parse item model: values, graphs and references.
//!
//! # Representation
//!
//! A [`ParseGraph`] is a persistent cons list of [`ParseItem`]s whose head
//! is the most recently added item. Nested constructs appear as child
//! graphs. While a construct is being parsed its graph is *open*: it sits at
//! the head of its parent and the parent is flagged `branched`. Following
//! branched heads from the root therefore walks the *open spine* down to
//! the innermost open graph, which is where new items are added.
//!
//! Every change copies the spine only and shares everything else, so a
//! failed parse attempt is rolled back by dropping the new graph.

use std::fmt;
use std::sync::Arc;

use crate::data::{selection, ParseValue, Source};
use crate::token::Token;
use crate::{EngineError, EngineResult};

/// An element of a [`ParseGraph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseItem {
    Value(ParseValue),
    Graph(ParseGraph),
    Reference(ParseReference),
}

impl ParseItem {
    pub fn is_value(&self) -> bool {
        matches!(self, ParseItem::Value(_))
    }

    pub fn is_graph(&self) -> bool {
        matches!(self, ParseItem::Graph(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ParseItem::Reference(_))
    }

    pub fn as_value(&self) -> EngineResult<&ParseValue> {
        match self {
            ParseItem::Value(value) => Ok(value),
            _ => Err(EngineError::TypeMismatch {
                conversion: "ParseValue",
            }),
        }
    }

    pub fn as_graph(&self) -> EngineResult<&ParseGraph> {
        match self {
            ParseItem::Graph(graph) => Ok(graph),
            _ => Err(EngineError::TypeMismatch {
                conversion: "ParseGraph",
            }),
        }
    }

    pub fn as_reference(&self) -> EngineResult<&ParseReference> {
        match self {
            ParseItem::Reference(reference) => Ok(reference),
            _ => Err(EngineError::TypeMismatch {
                conversion: "ParseReference",
            }),
        }
    }

    /// The token that produced this item. The root graph has none.
    pub fn definition(&self) -> Option<&Token> {
        match self {
            ParseItem::Value(value) => Some(value.definition()),
            ParseItem::Graph(graph) => graph.definition(),
            ParseItem::Reference(reference) => Some(reference.definition()),
        }
    }
}

impl fmt::Display for ParseItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseItem::Value(value) => fmt::Display::fmt(value, f),
            ParseItem::Graph(graph) => fmt::Display::fmt(graph, f),
            ParseItem::Reference(reference) => fmt::Display::fmt(reference, f),
        }
    }
}

struct GraphNode {
    head: Option<ParseItem>,
    tail: Option<ParseGraph>,
    /// The head is an open child graph.
    branched: bool,
    definition: Option<Token>,
    size: usize,
    /// Values held transitively.
    values: usize,
}

impl Drop for GraphNode {
    // Graphs grow one node per parsed item; unlink uniquely owned nodes
    // with an explicit stack instead of recursing through `Arc` drops.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(graph) = pending.pop() {
            if let Some(mut node) = Arc::into_inner(graph.0) {
                detach_children(&mut node, &mut pending);
            }
        }
    }
}

fn detach_children(node: &mut GraphNode, pending: &mut Vec<ParseGraph>) {
    if let Some(ParseItem::Graph(child)) = node.head.take() {
        pending.push(child);
    }
    if let Some(tail) = node.tail.take() {
        pending.push(tail);
    }
}

/// A persistent graph of parse items.
#[derive(Clone)]
pub struct ParseGraph(Arc<GraphNode>);

impl ParseGraph {
    /// The empty root graph.
    pub fn empty() -> Self {
        ParseGraph::node(None, None, false, None, 0, 0)
    }

    /// An empty graph for a construct defined by `definition`.
    pub fn with_definition(definition: Token) -> Self {
        ParseGraph::node(None, None, false, Some(definition), 0, 0)
    }

    fn node(
        head: Option<ParseItem>,
        tail: Option<ParseGraph>,
        branched: bool,
        definition: Option<Token>,
        size: usize,
        values: usize,
    ) -> Self {
        ParseGraph(Arc::new(GraphNode {
            head,
            tail,
            branched,
            definition,
            size,
            values,
        }))
    }

    /// Most recently added item.
    pub fn head(&self) -> Option<&ParseItem> {
        self.0.head.as_ref()
    }

    /// The graph before the head was added.
    pub fn tail(&self) -> Option<&ParseGraph> {
        self.0.tail.as_ref()
    }

    pub fn is_branched(&self) -> bool {
        self.0.branched
    }

    pub fn definition(&self) -> Option<&Token> {
        self.0.definition.as_ref()
    }

    /// Number of direct items.
    pub fn len(&self) -> usize {
        self.0.size
    }

    pub fn is_empty(&self) -> bool {
        self.0.size == 0
    }

    /// Number of values in this graph and all nested graphs.
    ///
    /// References are not counted: the graphs they point at are already
    /// part of the tree.
    pub fn value_count(&self) -> usize {
        self.0.values
    }

    /// Direct items, most recent first.
    pub fn items(&self) -> Items<'_> {
        Items { next: Some(self) }
    }

    pub fn same_node(&self, other: &ParseGraph) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The root followed by every open graph, outermost first.
    pub(crate) fn open_spine(&self) -> Vec<&ParseGraph> {
        let mut spine = vec![self];
        let mut graph = self;
        while graph.is_branched() {
            match graph.head() {
                Some(ParseItem::Graph(child)) => {
                    spine.push(child);
                    graph = child;
                }
                _ => break,
            }
        }
        spine
    }

    /// Append a value to the innermost open graph.
    #[must_use]
    pub fn add_value(&self, value: ParseValue) -> ParseGraph {
        self.add_item(ParseItem::Value(value), 1)
    }

    /// Append a back-reference to the innermost open graph.
    #[must_use]
    pub fn add_reference(&self, reference: ParseReference) -> ParseGraph {
        self.add_item(ParseItem::Reference(reference), 0)
    }

    /// Open a new empty child graph for `definition` in the innermost open graph.
    #[must_use]
    pub fn add_branch(&self, definition: Token) -> ParseGraph {
        let spine = self.open_spine();
        let (innermost, ancestors) = split_innermost(&spine, self);
        let opened = ParseGraph::node(
            Some(ParseItem::Graph(ParseGraph::with_definition(definition))),
            Some(innermost.clone()),
            true,
            innermost.definition().cloned(),
            innermost.len() + 1,
            innermost.value_count(),
        );
        rebuild_spine(ancestors, opened, 0)
    }

    /// Seal the innermost open graph, making its parent the innermost one.
    pub fn close_branch(&self) -> EngineResult<ParseGraph> {
        let spine = self.open_spine();
        let Some((_, outer)) = spine.split_last() else {
            return Err(EngineError::NoOpenBranch);
        };
        let Some((parent, ancestors)) = outer.split_last() else {
            return Err(EngineError::NoOpenBranch);
        };
        let closed = ParseGraph::node(
            parent.head().cloned(),
            parent.tail().cloned(),
            false,
            parent.definition().cloned(),
            parent.len(),
            parent.value_count(),
        );
        Ok(rebuild_spine(ancestors, closed, 0))
    }

    /// The most recently added value, following the heads of nested graphs.
    pub fn current(&self) -> Option<&ParseValue> {
        let mut graph = self;
        loop {
            match graph.head()? {
                ParseItem::Value(value) => return Some(value),
                ParseItem::Graph(child) => graph = child,
                ParseItem::Reference(_) => return None,
            }
        }
    }

    fn add_item(&self, item: ParseItem, added_values: usize) -> ParseGraph {
        let spine = self.open_spine();
        let (innermost, ancestors) = split_innermost(&spine, self);
        let extended = ParseGraph::node(
            Some(item),
            Some(innermost.clone()),
            false,
            innermost.definition().cloned(),
            innermost.len() + 1,
            innermost.value_count() + added_values,
        );
        rebuild_spine(ancestors, extended, added_values)
    }
}

fn split_innermost<'s, 'g>(
    spine: &'s [&'g ParseGraph],
    root: &'g ParseGraph,
) -> (&'g ParseGraph, &'s [&'g ParseGraph]) {
    match spine.split_last() {
        Some((innermost, ancestors)) => (innermost, ancestors),
        None => (root, &[]),
    }
}

/// Replace the open child of each ancestor, innermost first, with the
/// rebuilt graph below it.
fn rebuild_spine(ancestors: &[&ParseGraph], innermost: ParseGraph, added_values: usize) -> ParseGraph {
    ancestors.iter().rev().fold(innermost, |child, ancestor| {
        ParseGraph::node(
            Some(ParseItem::Graph(child)),
            ancestor.tail().cloned(),
            true,
            ancestor.definition().cloned(),
            ancestor.len(),
            ancestor.value_count() + added_values,
        )
    })
}

impl Default for ParseGraph {
    fn default() -> Self {
        ParseGraph::empty()
    }
}

impl PartialEq for ParseGraph {
    /// Structural equality, with tokens compared by identity.
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.same_node(b) {
                continue;
            }
            if a.len() != b.len()
                || a.value_count() != b.value_count()
                || a.is_branched() != b.is_branched()
                || a.definition() != b.definition()
            {
                return false;
            }
            match (a.head(), b.head()) {
                (None, None) => {}
                (Some(ParseItem::Graph(x)), Some(ParseItem::Graph(y))) => pending.push((x, y)),
                (Some(x), Some(y)) if !x.is_graph() && !y.is_graph() => {
                    if x != y {
                        return false;
                    }
                }
                _ => return false,
            }
            match (a.tail(), b.tail()) {
                (None, None) => {}
                (Some(x), Some(y)) => pending.push((x, y)),
                _ => return false,
            }
        }
        true
    }
}

impl Eq for ParseGraph {}

impl fmt::Display for ParseGraph {
    /// `pg(item,item,...)`, most recent item first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece<'a> {
            Item(&'a ParseItem),
            Graph(&'a ParseGraph),
            Text(&'static str),
        }

        let mut pending = vec![Piece::Graph(self)];
        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Graph(graph) => {
                    f.write_str("pg(")?;
                    pending.push(Piece::Text(")"));
                    let items: Vec<&ParseItem> = graph.items().collect();
                    for (index, item) in items.into_iter().enumerate().rev() {
                        pending.push(match item {
                            ParseItem::Graph(child) => Piece::Graph(child),
                            _ => Piece::Item(item),
                        });
                        if index > 0 {
                            pending.push(Piece::Text(","));
                        }
                    }
                }
                Piece::Item(item) => fmt::Display::fmt(item, f)?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ParseGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Iterator over the direct items of a [`ParseGraph`].
pub struct Items<'a> {
    next: Option<&'a ParseGraph>,
}

impl<'a> Iterator for Items<'a> {
    type Item = &'a ParseItem;

    fn next(&mut self) -> Option<&'a ParseItem> {
        let graph = self.next?;
        let item = graph.head()?;
        self.next = graph.tail();
        Some(item)
    }
}

/// A back-edge standing in for a structure that was already parsed.
///
/// Recorded when a `Sub` would parse the same token at the same location
/// of the same source a second time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseReference {
    location: u64,
    source: Source,
    definition: Token,
}

impl ParseReference {
    pub fn new(location: u64, source: Source, definition: Token) -> Self {
        ParseReference {
            location,
            source,
            definition,
        }
    }

    pub fn location(&self) -> u64 {
        self.location
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn definition(&self) -> &Token {
        &self.definition
    }

    /// The graph this reference stands for, looked up in `root`.
    pub fn resolve(&self, root: &ParseGraph) -> Option<ParseGraph> {
        selection::find_graph_at(root, &self.definition, self.location, &self.source)
    }
}

impl fmt::Display for ParseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pref(@{})", self.location)
    }
}
