//! Lode Core - declarative binary-format parsing.
//!
//! A grammar is a tree of [`Token`]s built with the functions in
//! [`shorthand`]. Parsing a token against a byte [`Source`] yields either a
//! [`ParseState`] whose [`ParseGraph`] holds every parsed value, or nothing
//! when the input does not match.
//!
//! # Architecture
//!
//! - `data`: byte sources, values, the persistent parse graph, the parse
//!   state and value selection
//! - `expression`: value expressions and predicates evaluated against a
//!   parse state
//! - `token`: the combinators and their parsing algorithm
//! - `environment`: parse state plus callbacks and the encoding in effect
//!
//! Every structure is immutable; an operation that "changes" one returns a
//! new one sharing everything it did not touch. Backtracking is dropping a
//! state.
//!
//! # Failure channels
//!
//! A non-matching input is `Ok(None)`. An [`EngineError`] means the grammar
//! or the caller broke a contract (an empty value name, a `Ref` limit that
//! is not a number, a fold reducer yielding several values, ...).

mod config;
pub mod data;
mod environment;
mod errors;
pub mod expression;
pub mod shorthand;
mod token;

pub use config::{CacheMode, Limit, ParseConfig};
pub use data::{
    selection, ByteOrder, ByteStream, Charset, Encoding, InMemoryByteStream, Iteration, ParseGraph,
    ParseItem, ParseReference, ParseState, ParseValue, ParseValueCache, Sign, Slice, Source, Value,
};
pub use environment::{Callback, Callbacks, Environment};
pub use errors::{EngineError, EngineResult};
pub use expression::{ComparisonKind, Expression, ValueExpression, Values};
pub use token::{Token, TokenKind};

/// Parse `token` from the start of `source`.
#[tracing::instrument(level = "debug", skip_all, fields(token = %token))]
pub fn parse(token: &Token, source: Source, config: &ParseConfig) -> EngineResult<Option<ParseState>> {
    let env = Environment::from_config(source, 0, config);
    let result = token.parse(&env)?;
    tracing::debug!(
        matched = result.is_some(),
        offset = result.as_ref().map(ParseState::offset),
        "parse finished"
    );
    Ok(result)
}
