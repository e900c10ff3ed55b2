//! Iterable tokens: `Rep`, `RepN` and `While`.
//!
//! Each opens a branch with an iteration counter, parses its body into it
//! once per iteration and advances the counter after every success.
//! Repetition counts follow the input, so the iterations run in a loop.

use super::Token;
use crate::data::ParseState;
use crate::environment::Environment;
use crate::expression::{Expression, ValueExpression};
use crate::EngineResult;

/// As many iterations as succeed. An iteration that moves neither the
/// offset nor adds a value is discarded and ends the repetition, since
/// every further one would do the same.
pub(super) fn parse_rep(token: &Token, body: &Token, env: &Environment) -> EngineResult<Option<ParseState>> {
    let mut state = env.parse_state().add_branch(token);
    while let Some(parsed) = body.parse(&env.with_state(state.clone()))? {
        if !made_progress(&state, &parsed) {
            break;
        }
        state = parsed.iterate()?;
    }
    state.close_branch(token).map(Some)
}

/// Exactly `count` iterations; fails if the count is not a single
/// non-negative number or any iteration fails.
pub(super) fn parse_repn(
    token: &Token,
    body: &Token,
    count: &ValueExpression,
    env: &Environment,
) -> EngineResult<Option<ParseState>> {
    let Some(count) = super::eval_size(count, env)? else {
        return Ok(None);
    };
    let mut state = env.parse_state().add_branch(token);
    for _ in 0..count {
        match body.parse(&env.with_state(state))? {
            Some(parsed) => state = parsed.iterate()?,
            None => return Ok(None),
        }
    }
    state.close_branch(token).map(Some)
}

/// Iterations while `predicate` holds before each one; a failing
/// iteration fails the whole token.
pub(super) fn parse_while(
    token: &Token,
    body: &Token,
    predicate: &Expression,
    env: &Environment,
) -> EngineResult<Option<ParseState>> {
    let mut state = env.parse_state().add_branch(token);
    while predicate.eval(&state, env.encoding())? {
        match body.parse(&env.with_state(state))? {
            Some(parsed) => state = parsed.iterate()?,
            None => return Ok(None),
        }
    }
    state.close_branch(token).map(Some)
}

fn made_progress(before: &ParseState, after: &ParseState) -> bool {
    after.offset() != before.offset() || after.order().value_count() != before.order().value_count()
}
