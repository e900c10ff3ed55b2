//! Tokens: the grammar algebra and its parsing algorithm.
//!
//! A [`Token`] is an immutable, shareable grammar node. Parsing is a pure
//! function of the token and an [`Environment`]:
//!
//! - `Ok(Some(state))`: the token matched; `state` is the successor state
//! - `Ok(None)`: the token did not match; the caller keeps its own state
//!   and may try something else
//! - `Err(_)`: the grammar broke a contract; parsing stops
//!
//! Composite tokens open a branch in the parse graph before parsing their
//! children and close it on success, so every construct shows up as its own
//! nested graph. Failure is never partial: a failed child discards whatever
//! the composite built.
//!
//! Tokens are compared by identity. Two separately built tokens with the
//! same structure are different tokens, which is what `Ref` by definition
//! and cycle detection rely on.

mod field;
mod redirect;
mod repetition;
mod structure;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use lode_stack::ensure_sufficient_stack;
use num_traits::ToPrimitive;

use crate::data::{Encoding, ParseState};
use crate::environment::Environment;
use crate::expression::{Expression, ValueExpression};
use crate::EngineResult;

/// The combinator a token applies.
#[derive(Clone, Debug)]
pub enum TokenKind {
    /// A value of `size` bytes, optionally checked by `predicate`.
    Def {
        size: ValueExpression,
        predicate: Option<Expression>,
    },
    /// Skip `size` bytes without producing a value.
    Nod { size: ValueExpression },
    /// A value of growing size, ended by the first size at which
    /// `terminator` parses.
    Until {
        initial_size: ValueExpression,
        step_size: ValueExpression,
        max_size: Option<ValueExpression>,
        terminator: Token,
    },
    Seq(Vec<Token>),
    /// As many repetitions as parse.
    Rep(Token),
    /// Exactly `count` repetitions.
    RepN { body: Token, count: ValueExpression },
    /// Repetitions for as long as `predicate` holds.
    While { body: Token, predicate: Expression },
    Opt(Token),
    /// The first alternative that parses.
    Cho(Vec<Token>),
    /// Parse `body` only if `predicate` holds beforehand.
    Pre { body: Token, predicate: Expression },
    /// Parse `body`, then require `predicate`.
    Post { body: Token, predicate: Expression },
    /// Parse `body` over the bytes of each value of `data`.
    Tie { body: Token, data: ValueExpression },
    /// Parse `body` at each address, then return to the current offset.
    Sub { body: Token, address: ValueExpression },
    /// The token of that name found in the parse graph.
    TokenRef(Arc<str>),
}

struct TokenInner {
    name: Arc<str>,
    encoding: Option<Encoding>,
    kind: TokenKind,
}

/// A named grammar element.
#[derive(Clone)]
pub struct Token(Arc<TokenInner>);

impl Token {
    /// A token named `name`; pass `""` for an anonymous token.
    pub fn new(name: impl Into<Arc<str>>, kind: TokenKind) -> Self {
        Token(Arc::new(TokenInner {
            name: name.into(),
            encoding: None,
            kind,
        }))
    }

    /// A token that parses its subtree with `encoding` instead of the
    /// inherited one.
    pub fn with_encoding(name: impl Into<Arc<str>>, kind: TokenKind, encoding: Encoding) -> Self {
        Token(Arc::new(TokenInner {
            name: name.into(),
            encoding: Some(encoding),
            kind,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> &TokenKind {
        &self.0.kind
    }

    pub fn encoding(&self) -> Option<&Encoding> {
        self.0.encoding.as_ref()
    }

    /// Opens an iteration counter while parsing.
    pub fn is_iterable(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Rep(_) | TokenKind::RepN { .. } | TokenKind::While { .. }
        )
    }

    /// Counts towards the scope depth while parsing.
    pub fn is_scope_delimiter(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Seq(_)
                | TokenKind::Rep(_)
                | TokenKind::RepN { .. }
                | TokenKind::While { .. }
                | TokenKind::Tie { .. }
                | TokenKind::Sub { .. }
        )
    }

    /// Returns `true` if graphs built by `self` are what `reference` parses:
    /// `reference` is `self`, or a `TokenRef` naming it.
    pub fn stands_for(&self, reference: &Token) -> bool {
        match reference.kind() {
            TokenKind::TokenRef(name) => self == reference || *self.0.name == **name,
            _ => self == reference,
        }
    }

    /// Parse this token in `env`.
    pub fn parse(&self, env: &Environment) -> EngineResult<Option<ParseState>> {
        ensure_sufficient_stack(|| {
            let scoped;
            let env = match self.0.encoding {
                Some(encoding) => {
                    scoped = env.with_encoding(encoding);
                    &scoped
                }
                None => env,
            };
            let result = self.parse_kind(env)?;
            tracing::trace!(
                token = %self,
                offset = env.parse_state().offset(),
                matched = result.is_some(),
            );
            env.callbacks().handle(self, env.parse_state(), result.as_ref());
            Ok(result)
        })
    }

    fn parse_kind(&self, env: &Environment) -> EngineResult<Option<ParseState>> {
        match self.kind() {
            TokenKind::Def { size, predicate } => field::parse_def(self, size, predicate.as_ref(), env),
            TokenKind::Nod { size } => field::parse_nod(size, env),
            TokenKind::Until {
                initial_size,
                step_size,
                max_size,
                terminator,
            } => field::parse_until(
                self,
                field::UntilSizes {
                    initial: initial_size,
                    step: step_size,
                    max: max_size.as_ref(),
                },
                terminator,
                env,
            ),
            TokenKind::Seq(tokens) => structure::parse_seq(self, tokens, env),
            TokenKind::Cho(tokens) => structure::parse_cho(self, tokens, env),
            TokenKind::Opt(body) => structure::parse_opt(self, body, env),
            TokenKind::Pre { body, predicate } => structure::parse_pre(self, body, predicate, env),
            TokenKind::Post { body, predicate } => structure::parse_post(self, body, predicate, env),
            TokenKind::Rep(body) => repetition::parse_rep(self, body, env),
            TokenKind::RepN { body, count } => repetition::parse_repn(self, body, count, env),
            TokenKind::While { body, predicate } => {
                repetition::parse_while(self, body, predicate, env)
            }
            TokenKind::Tie { body, data } => redirect::parse_tie(self, body, data, env),
            TokenKind::Sub { body, address } => redirect::parse_sub(self, body, address, env),
            TokenKind::TokenRef(name) => redirect::parse_token_ref(name, env),
        }
    }

    fn label(&self) -> &'static str {
        match self.kind() {
            TokenKind::Def { .. } => "Def",
            TokenKind::Nod { .. } => "Nod",
            TokenKind::Until { .. } => "Until",
            TokenKind::Seq(_) => "Seq",
            TokenKind::Rep(_) => "Rep",
            TokenKind::RepN { .. } => "RepN",
            TokenKind::While { .. } => "While",
            TokenKind::Opt(_) => "Opt",
            TokenKind::Cho(_) => "Cho",
            TokenKind::Pre { .. } => "Pre",
            TokenKind::Post { .. } => "Post",
            TokenKind::Tie { .. } => "Tie",
            TokenKind::Sub { .. } => "Sub",
            TokenKind::TokenRef(_) => "TokenRef",
        }
    }
}

/// Evaluate a size expression to a byte count. Absent, negative and
/// ambiguous sizes are `None`.
fn eval_size(size: &ValueExpression, env: &Environment) -> EngineResult<Option<u64>> {
    Ok(size
        .eval_single(env.parse_state(), env.encoding())?
        .and_then(|value| value.as_numeric().to_u64()))
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Display for Token {
    /// `Kind(name)`; the referenced name for `TokenRef`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self.kind() {
            TokenKind::TokenRef(target) => target,
            _ => self.name(),
        };
        if name.is_empty() {
            f.write_str(self.label())
        } else {
            write!(f, "{}({name})", self.label())
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests;
