//! The immutable snapshot threaded through parsing.

use std::fmt;
use std::sync::Arc;

use lode_list::ImmutableList;

use crate::config::CacheMode;
use crate::data::{
    ByteStream, ParseGraph, ParseReference, ParseValue, ParseValueCache, Slice, Source,
};
use crate::token::Token;
use crate::{EngineError, EngineResult};

/// Counter of an open iterable token: the zero-based index of the
/// iteration in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Iteration {
    pub token: Token,
    pub index: u64,
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.token.name(), self.index)
    }
}

/// Everything a token needs to continue parsing.
///
/// Every operation returns a new state and leaves `self` usable, which is
/// what makes backtracking free: a caller whose attempt failed still holds
/// the state it started from.
#[derive(Clone, Debug)]
pub struct ParseState {
    order: ParseGraph,
    offset: u64,
    source: Source,
    /// Innermost open iterable first.
    iterations: ImmutableList<Iteration>,
    references: ImmutableList<ParseReference>,
    /// Where each open branch began, innermost first.
    branch_starts: ImmutableList<ParseReference>,
    scope_depth: usize,
    cache: ParseValueCache,
}

impl ParseState {
    pub fn new(source: Source, offset: u64, cache: CacheMode) -> Self {
        ParseState {
            order: ParseGraph::empty(),
            offset,
            source,
            iterations: ImmutableList::new(),
            references: ImmutableList::new(),
            branch_starts: ImmutableList::new(),
            scope_depth: 0,
            cache: ParseValueCache::new(cache),
        }
    }

    pub fn from_byte_stream(input: Arc<dyn ByteStream>, offset: u64, cache: CacheMode) -> Self {
        ParseState::new(Source::Stream(input), offset, cache)
    }

    pub fn order(&self) -> &ParseGraph {
        &self.order
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn iterations(&self) -> &ImmutableList<Iteration> {
        &self.iterations
    }

    pub fn references(&self) -> &ImmutableList<ParseReference> {
        &self.references
    }

    /// Returns `true` if a branch for `token` is open that began at the
    /// current offset of the current source, so parsing `token` again here
    /// would not make progress.
    pub fn is_reentering(&self, token: &Token) -> bool {
        self.branch_starts.iter().any(|start| {
            start.location() == self.offset && start.source() == &self.source && start.definition() == token
        })
    }

    pub fn scope_depth(&self) -> usize {
        self.scope_depth
    }

    pub fn cache(&self) -> &ParseValueCache {
        &self.cache
    }

    /// Open a branch for `token`, starting its iteration counter and scope
    /// when the token is iterable or delimits a scope.
    #[must_use]
    pub fn add_branch(&self, token: &Token) -> Self {
        let iterations = if token.is_iterable() {
            self.iterations.prepend(Iteration {
                token: token.clone(),
                index: 0,
            })
        } else {
            self.iterations.clone()
        };
        ParseState {
            order: self.order.add_branch(token.clone()),
            iterations,
            branch_starts: self.branch_starts.prepend(ParseReference::new(
                self.offset,
                self.source.clone(),
                token.clone(),
            )),
            scope_depth: self.scope_depth + usize::from(token.is_scope_delimiter()),
            ..self.clone()
        }
    }

    /// Close the innermost branch, which must have been opened for `token`.
    pub fn close_branch(&self, token: &Token) -> EngineResult<Self> {
        let iterations = if token.is_iterable() {
            let open = self.iterations.head().ok();
            if open.map(|iteration| &iteration.token) != Some(token) {
                return Err(EngineError::IterationMismatch {
                    expected: token.to_string(),
                    found: open.map_or_else(|| "<none>".to_owned(), |it| it.token.to_string()),
                });
            }
            self.iterations.tail()?
        } else {
            self.iterations.clone()
        };
        let scope_depth = if token.is_scope_delimiter() {
            self.scope_depth
                .checked_sub(1)
                .ok_or(EngineError::NoOpenBranch)?
        } else {
            self.scope_depth
        };
        Ok(ParseState {
            order: self.order.close_branch()?,
            iterations,
            branch_starts: self.branch_starts.tail()?,
            scope_depth,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn add(&self, value: ParseValue) -> Self {
        ParseState {
            cache: self.cache.add(&value),
            order: self.order.add_value(value),
            ..self.clone()
        }
    }

    /// Remember that `reference`'s structure is being parsed.
    #[must_use]
    pub fn add_reference(&self, reference: ParseReference) -> Self {
        ParseState {
            references: self.references.prepend(reference),
            ..self.clone()
        }
    }

    /// Record a cycle: `reference` goes into the graph instead of a reparse.
    #[must_use]
    pub fn create_cycle(&self, reference: ParseReference) -> Self {
        ParseState {
            order: self.order.add_reference(reference),
            ..self.clone()
        }
    }

    /// Advance the counter of the innermost open iterable.
    pub fn iterate(&self) -> EngineResult<Self> {
        let current = self.iterations.head()?;
        let iterations = self.iterations.tail()?.prepend(Iteration {
            token: current.token.clone(),
            index: current.index + 1,
        });
        Ok(ParseState {
            iterations,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn seek(&self, offset: u64) -> Self {
        ParseState {
            offset,
            ..self.clone()
        }
    }

    /// Continue on `source`, from its start.
    #[must_use]
    pub fn with_source(&self, source: Source) -> Self {
        ParseState {
            source,
            offset: 0,
            ..self.clone()
        }
    }

    /// This state viewed through `order`.
    ///
    /// The cache describes the full graph, so it is not carried over.
    #[must_use]
    pub fn with_order(&self, order: ParseGraph) -> Self {
        ParseState {
            order,
            cache: ParseValueCache::disabled(),
            ..self.clone()
        }
    }

    /// Keep this state's graph and cache, and everything else from `context`.
    #[must_use]
    pub(crate) fn restore(&self, context: &ParseState) -> Self {
        ParseState {
            order: self.order.clone(),
            cache: self.cache.clone(),
            ..context.clone()
        }
    }

    /// `length` bytes at the current offset.
    pub fn slice(&self, length: u64) -> Option<Slice> {
        self.source.slice(self.offset, length)
    }
}

impl PartialEq for ParseState {
    /// The cache is derived from the graph and takes no part in equality.
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
            && self.scope_depth == other.scope_depth
            && self.source == other.source
            && self.iterations == other.iterations
            && self.references == other.references
            && self.branch_starts == other.branch_starts
            && self.order == other.order
    }
}

impl Eq for ParseState {}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParseState(source:{};offset:{};order:{}", self.source, self.offset, self.order)?;
        if !self.iterations.is_empty() {
            write!(f, ";iterations:{}", self.iterations)?;
        }
        if !self.references.is_empty() {
            write!(f, ";references:{}", self.references)?;
        }
        write!(f, ";scopeDepth:{})", self.scope_depth)
    }
}
