//! Tokens that read bytes into values: `Def`, `Nod` and `Until`.

use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use super::{eval_size, Token};
use crate::data::{ParseState, ParseValue, Value};
use crate::environment::Environment;
use crate::expression::{Expression, ValueExpression};
use crate::EngineResult;

pub(super) fn parse_def(
    token: &Token,
    size: &ValueExpression,
    predicate: Option<&Expression>,
    env: &Environment,
) -> EngineResult<Option<ParseState>> {
    let Some(size) = eval_size(size, env)? else {
        return Ok(None);
    };
    let Some(state) = read_value(token, size, env)? else {
        return Ok(None);
    };
    match predicate {
        Some(predicate) if !predicate.eval(&state, env.encoding())? => Ok(None),
        _ => Ok(Some(state)),
    }
}

pub(super) fn parse_nod(size: &ValueExpression, env: &Environment) -> EngineResult<Option<ParseState>> {
    let Some(size) = eval_size(size, env)? else {
        return Ok(None);
    };
    let state = env.parse_state();
    if !state.source().is_available(state.offset(), size) {
        return Ok(None);
    }
    Ok(state.offset().checked_add(size).map(|end| state.seek(end)))
}

/// Size parameters of an `Until`.
pub(super) struct UntilSizes<'a> {
    pub initial: &'a ValueExpression,
    pub step: &'a ValueExpression,
    /// `None` grows until the source runs out.
    pub max: Option<&'a ValueExpression>,
}

/// Try value sizes `initial`, `initial + step`, ... and stop at the first
/// one after which `terminator` parses. A zero size adds no value.
pub(super) fn parse_until(
    token: &Token,
    sizes: UntilSizes<'_>,
    terminator: &Token,
    env: &Environment,
) -> EngineResult<Option<ParseState>> {
    let state = env.parse_state();
    let encoding = env.encoding();
    let (Some(initial), Some(step)) = (
        sizes.initial.eval_single(state, encoding)?,
        sizes.step.eval_single(state, encoding)?,
    ) else {
        return Ok(None);
    };
    let max = match sizes.max {
        Some(max) => match max.eval_single(state, encoding)? {
            Some(max) => Some(max.as_numeric()),
            None => return Ok(None),
        },
        None => None,
    };
    let step = step.as_numeric();
    let mut size = initial.as_numeric();
    loop {
        if size.is_negative() || max.as_ref().is_some_and(|max| &size > max) {
            return Ok(None);
        }
        let Some(candidate) = candidate(token, &size, env)? else {
            return Ok(None);
        };
        if let Some(terminated) = terminator.parse(&env.with_state(candidate))? {
            return Ok(Some(terminated));
        }
        // A step that does not grow the size would retry the same candidate forever.
        if !step.is_positive() {
            return Ok(None);
        }
        size += &step;
    }
}

fn candidate(token: &Token, size: &BigInt, env: &Environment) -> EngineResult<Option<ParseState>> {
    if size.is_zero() {
        return Ok(Some(env.parse_state().clone()));
    }
    match size.to_u64() {
        Some(size) => read_value(token, size, env),
        None => Ok(None),
    }
}

/// Read `size` bytes at the current offset as a value of `token` and move past them.
fn read_value(token: &Token, size: u64, env: &Environment) -> EngineResult<Option<ParseState>> {
    let state = env.parse_state();
    let (Some(slice), Some(end)) = (state.slice(size), state.offset().checked_add(size)) else {
        return Ok(None);
    };
    let value = ParseValue::new(
        Arc::clone(&token.0.name),
        token.clone(),
        Value::new(slice, *env.encoding()),
    )?;
    Ok(Some(state.add(value).seek(end)))
}
