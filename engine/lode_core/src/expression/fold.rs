//! Folds over value lists.
//!
//! Value lists can be as long as the input, so the reduction runs as a
//! [`Trampoline`].

use lode_stack::Trampoline;

use super::{single, Reducer, ValueExpression, Values};
use crate::data::{Encoding, ParseState, Value};
use crate::{EngineError, EngineResult};

#[derive(Copy, Clone)]
enum Direction {
    /// From the most recent value towards the oldest; `reduce(next, acc)`.
    Right,
    /// From the oldest value towards the most recent; `reduce(acc, next)`.
    Left,
}

pub(super) fn fold_right(
    values: &ValueExpression,
    reducer: &Reducer,
    init: Option<&ValueExpression>,
    state: &ParseState,
    encoding: &Encoding,
) -> EngineResult<Values> {
    fold(values, reducer, init, state, encoding, Direction::Right)
}

pub(super) fn fold_left(
    values: &ValueExpression,
    reducer: &Reducer,
    init: Option<&ValueExpression>,
    state: &ParseState,
    encoding: &Encoding,
) -> EngineResult<Values> {
    fold(values, reducer, init, state, encoding, Direction::Left)
}

fn fold(
    values: &ValueExpression,
    reducer: &Reducer,
    init: Option<&ValueExpression>,
    state: &ParseState,
    encoding: &Encoding,
    direction: Direction,
) -> EngineResult<Values> {
    let init = match init {
        Some(init) => init.eval(state, encoding)?,
        None => Values::new(),
    };
    if init.len() > 1 {
        return Err(EngineError::invalid_argument(
            "Init may not evaluate to more than a single value.",
        ));
    }
    let values = values.eval(state, encoding)?;
    if values.is_empty() || values.iter().any(Option::is_none) {
        return Ok(init);
    }
    let mut ordered: Vec<Value> = values.iter().flatten().cloned().collect();
    if matches!(direction, Direction::Left) {
        ordered.reverse();
    }
    let mut remaining = ordered.into_iter();
    let seed = match init.head() {
        Ok(seed) => seed.clone(),
        Err(_) => remaining.next(),
    };
    let folded = step(seed, remaining, reducer, state, encoding, direction).compute()?;
    Ok(single(folded))
}

fn step<'a>(
    accumulator: Option<Value>,
    mut remaining: std::vec::IntoIter<Value>,
    reducer: &'a Reducer,
    state: &'a ParseState,
    encoding: &'a Encoding,
    direction: Direction,
) -> Trampoline<'a, EngineResult<Option<Value>>> {
    let Some(accumulator) = accumulator else {
        return Trampoline::complete(Ok(None));
    };
    let Some(next) = remaining.next() else {
        return Trampoline::complete(Ok(Some(accumulator)));
    };
    let (left, right) = match direction {
        Direction::Right => (next, accumulator),
        Direction::Left => (accumulator, next),
    };
    let reduced = reducer
        .reduce(ValueExpression::Const(left), ValueExpression::Const(right))
        .eval(state, encoding);
    match reduced {
        Ok(reduced) if reduced.len() == 1 => {
            let accumulator = reduced.head().ok().cloned().flatten();
            Trampoline::intermediate(move || {
                step(accumulator, remaining, reducer, state, encoding, direction)
            })
        }
        Ok(_) => Trampoline::complete(Err(EngineError::invalid_argument(
            "Reducer must evaluate to a single value.",
        ))),
        Err(error) => Trampoline::complete(Err(error)),
    }
}
