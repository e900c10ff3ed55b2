//! Tokens that parse somewhere other than the current position:
//! `Tie`, `Sub` and `TokenRef`.

use std::sync::Arc;

use num_traits::ToPrimitive;

use super::Token;
use crate::data::selection::find_token_by_name;
use crate::data::{ParseReference, ParseState, Source};
use crate::environment::Environment;
use crate::expression::{chronological, ValueExpression};
use crate::EngineResult;

/// Parse `body` over the bytes of every value of `data`, oldest first.
///
/// The values found this way join the graph, but the source, offset,
/// iteration counters, recorded references and scope depth are those of
/// the state the tie started from.
pub(super) fn parse_tie(
    token: &Token,
    body: &Token,
    data: &ValueExpression,
    env: &Environment,
) -> EngineResult<Option<ParseState>> {
    let values = data.eval(env.parse_state(), env.encoding())?;
    if values.is_empty() {
        return Ok(None);
    }
    let mut state = env.parse_state().add_branch(token);
    for value in chronological(&values) {
        let Some(value) = value else {
            return Ok(None);
        };
        let window = Source::window(value.slice());
        match body.parse(&env.with_state(state.with_source(window)))? {
            Some(parsed) => state = parsed,
            None => return Ok(None),
        }
    }
    let closed = state.close_branch(token)?;
    Ok(Some(closed.restore(env.parse_state())))
}

/// Parse `body` at every address, oldest first, then return to the
/// offset the sub started at.
///
/// Parsing the same body at the same address of the same source a second
/// time records a [`ParseReference`] instead, which is how cyclic
/// structures terminate.
pub(super) fn parse_sub(
    token: &Token,
    body: &Token,
    address: &ValueExpression,
    env: &Environment,
) -> EngineResult<Option<ParseState>> {
    let addresses = address.eval(env.parse_state(), env.encoding())?;
    if addresses.is_empty() {
        return Ok(None);
    }
    let mut state = env.parse_state().add_branch(token);
    for address in chronological(&addresses) {
        let Some(address) = address.and_then(|value| value.as_numeric().to_u64()) else {
            return Ok(None);
        };
        let reference = ParseReference::new(address, state.source().clone(), body.clone());
        if state.references().contains(&reference) {
            tracing::trace!(token = %body, address, "cycle detected");
            state = state.create_cycle(reference);
            continue;
        }
        let positioned = state.add_reference(reference).seek(address);
        match body.parse(&env.with_state(positioned))? {
            Some(parsed) => state = parsed,
            None => return Ok(None),
        }
    }
    let closed = state.close_branch(token)?;
    Ok(Some(closed.seek(env.parse_state().offset())))
}

/// Parse with the token named `name` found in the graph so far.
///
/// A token that would re-enter itself where its own open branch began
/// (left recursion) records a [`ParseReference`] instead.
pub(super) fn parse_token_ref(name: &Arc<str>, env: &Environment) -> EngineResult<Option<ParseState>> {
    let state = env.parse_state();
    let Some(token) = find_token_by_name(state.order(), name) else {
        tracing::trace!(name = %name, "no token to refer to");
        return Ok(None);
    };
    if state.is_reentering(&token) {
        tracing::trace!(token = %token, offset = state.offset(), "left recursion detected");
        let reference = ParseReference::new(state.offset(), state.source().clone(), token);
        return Ok(Some(state.create_cycle(reference)));
    }
    token.parse(env)
}
