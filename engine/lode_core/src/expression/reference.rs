//! Expressions that look values up in the parse state.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use super::{chronological, numeric, single, single_number, RefTarget, ValueExpression, Values};
use crate::config::Limit;
use crate::data::selection::get_all_values;
use crate::data::{Encoding, ParseGraph, ParseState};
use crate::token::Token;
use crate::{EngineError, EngineResult};

pub(super) fn eval_ref(
    target: &RefTarget,
    limit: Option<&ValueExpression>,
    state: &ParseState,
    encoding: &Encoding,
) -> EngineResult<Values> {
    let limit = match limit {
        Some(expr) => eval_limit(expr, state, encoding)?,
        None => Limit::Unbounded,
    };
    if limit == Limit::AtMost(0) {
        return Ok(Values::new());
    }
    let found = match target {
        RefTarget::Names(names) => match names.as_slice() {
            [name] => match state.cache().find(name, limit) {
                Some(cached) => {
                    tracing::trace!(name = %name, count = cached.len(), "value cache hit");
                    cached
                }
                None => get_all_values(state.order(), |value| value.matches_name(name), limit),
            },
            _ => get_all_values(
                state.order(),
                |value| names.iter().any(|name| value.matches_name(name)),
                limit,
            ),
        },
        RefTarget::Definitions(definitions) => get_all_values(
            state.order(),
            |value| definitions.iter().any(|definition| value.matches_definition(definition)),
            limit,
        ),
    };
    Ok(found.iter().map(|value| Some(value.value().clone())).collect())
}

fn eval_limit(expr: &ValueExpression, state: &ParseState, encoding: &Encoding) -> EngineResult<Limit> {
    let values = expr.eval(state, encoding)?;
    if values.len() != 1 {
        return Err(EngineError::InvalidLimit {
            reason: "limit must evaluate to a single value",
        });
    }
    let Some(value) = values.head()? else {
        return Err(EngineError::InvalidLimit {
            reason: "limit must evaluate to a non-empty value",
        });
    };
    let number = value.as_numeric();
    if number.is_negative() {
        return Err(EngineError::InvalidLimit {
            reason: "limit may not be negative",
        });
    }
    // Larger than any graph can hold.
    Ok(number.to_usize().map_or(Limit::Unbounded, Limit::AtMost))
}

/// Zero-based index of the iteration in progress of the `level`-th open
/// iterable, counting outward from the innermost.
pub(super) fn current_iteration(
    level: &ValueExpression,
    state: &ParseState,
    encoding: &Encoding,
) -> EngineResult<Values> {
    let level = single_number(level, state, encoding, "Level")?;
    Ok(match state.iterations().get(level) {
        Ok(iteration) => single(Some(numeric(&BigInt::from(iteration.index), Encoding::default()))),
        Err(_) => single(None),
    })
}

pub(super) fn eval_scoped(
    expr: &ValueExpression,
    level: &ValueExpression,
    state: &ParseState,
    encoding: &Encoding,
) -> EngineResult<Values> {
    let level = single_number(level, state, encoding, "Scope level")?;
    let scope = scope_graph(state, level)?;
    expr.eval(&state.with_order(scope), encoding)
}

/// Graph of the `level`-th enclosing scope, innermost being 0. At
/// `scope_depth` this is the whole graph.
fn scope_graph(state: &ParseState, level: usize) -> EngineResult<ParseGraph> {
    if level > state.scope_depth() {
        return Err(EngineError::invalid_argument(format!(
            "Scope level {level} exceeds the current scope depth {}.",
            state.scope_depth()
        )));
    }
    let spine = state.order().open_spine();
    let scope = spine
        .into_iter()
        .rev()
        .filter(|graph| graph.definition().is_some_and(Token::is_scope_delimiter))
        .nth(level)
        .unwrap_or(state.order());
    Ok(scope.clone())
}

pub(super) fn nth(values: &Values, indices: &Values) -> Values {
    let oldest_first = chronological(values);
    indices
        .iter()
        .map(|index| {
            let index = index.as_ref()?.as_numeric().to_usize()?;
            oldest_first.get(index).cloned().flatten()
        })
        .collect()
}
