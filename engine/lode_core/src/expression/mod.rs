//! Value expressions and boolean expressions.
//!
//! A [`ValueExpression`] evaluates against a parse state to an ordered list
//! of optional values ([`Values`]). The list is most recent first, like the
//! graph it is computed from; `None` marks a value that is not available
//! (a division by zero, a missing operand), which is different from an
//! empty list.
//!
//! An [`Expression`] evaluates to a boolean and is used as a predicate by
//! tokens.
//!
//! Evaluation never changes the parse state. It fails with an
//! [`EngineError`](crate::EngineError) only when an argument breaks its
//! contract, such as a `Ref` limit that is not a single number.

mod arithmetic;
mod comparison;
mod fold;
mod reference;

use std::fmt;
use std::sync::Arc;

use lode_list::ImmutableList;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::data::{Encoding, ParseState, Value};
use crate::token::Token;
use crate::{EngineError, EngineResult};

/// Most values an `Expand` may produce.
const MAX_EXPANDED: usize = 1 << 20;

pub use comparison::ComparisonKind;

/// Result of evaluating a [`ValueExpression`], most recent first.
pub type Values = ImmutableList<Option<Value>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Bitwise complement of every byte.
    Not,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Truncating division; division by zero is absent.
    Div,
    /// Non-negative remainder; a modulus below one is absent.
    Mod,
    /// Bytewise, operands aligned at their last byte.
    And,
    Or,
    ShiftLeft,
    ShiftRight,
    /// Byte concatenation.
    Cat,
}

/// What a `Ref` looks up.
#[derive(Clone, Debug)]
pub enum RefTarget {
    Names(Vec<Arc<str>>),
    Definitions(Vec<Token>),
}

/// Builds the expression that combines two values during a fold.
#[derive(Clone)]
pub struct Reducer(Arc<dyn Fn(ValueExpression, ValueExpression) -> ValueExpression + Send + Sync>);

impl Reducer {
    pub fn new(
        reduce: impl Fn(ValueExpression, ValueExpression) -> ValueExpression + Send + Sync + 'static,
    ) -> Self {
        Reducer(Arc::new(reduce))
    }

    pub fn reduce(&self, left: ValueExpression, right: ValueExpression) -> ValueExpression {
        (self.0)(left, right)
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reducer")
    }
}

/// A named transformation of a single value, such as a checksum.
#[derive(Clone)]
pub struct UserOperation {
    name: Arc<str>,
    apply: Arc<dyn Fn(&Value, &Encoding) -> Option<Value> + Send + Sync>,
}

impl UserOperation {
    pub fn new(
        name: impl Into<Arc<str>>,
        apply: impl Fn(&Value, &Encoding) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        UserOperation {
            name: name.into(),
            apply: Arc::new(apply),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, value: &Value, encoding: &Encoding) -> Option<Value> {
        (self.apply)(value, encoding)
    }
}

impl fmt::Debug for UserOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserOperation({})", self.name)
    }
}

/// An expression producing a list of optional values.
#[derive(Clone, Debug)]
pub enum ValueExpression {
    Const(Value),
    /// Values matching any of the targets, at most `limit` of them.
    Ref {
        target: RefTarget,
        limit: Option<Box<ValueExpression>>,
    },
    /// The most recently added value, or nothing.
    SelfValue,
    CurrentOffset,
    /// Index of the iteration in progress of the `level`-th enclosing
    /// iterable, innermost being 0.
    CurrentIteration(Box<ValueExpression>),
    /// `expr` evaluated against the graph of the `level`-th enclosing scope.
    Scope {
        expr: Box<ValueExpression>,
        level: Box<ValueExpression>,
    },
    /// The most recent value only.
    Last(Box<ValueExpression>),
    /// The oldest value only.
    First(Box<ValueExpression>),
    /// The values at `indices`, counted from the oldest.
    Nth {
        values: Box<ValueExpression>,
        indices: Box<ValueExpression>,
    },
    Count(Box<ValueExpression>),
    Offset(Box<ValueExpression>),
    Len(Box<ValueExpression>),
    Reverse(Box<ValueExpression>),
    /// Every byte of every value as a value of its own.
    Bytes(Box<ValueExpression>),
    /// `base` repeated `count` times.
    Expand {
        base: Box<ValueExpression>,
        count: Box<ValueExpression>,
    },
    /// Left where present, right otherwise.
    Elvis(Box<ValueExpression>, Box<ValueExpression>),
    Unary(UnaryOp, Box<ValueExpression>),
    Binary(BinaryOp, Box<ValueExpression>, Box<ValueExpression>),
    FoldRight {
        values: Box<ValueExpression>,
        reducer: Reducer,
        init: Option<Box<ValueExpression>>,
    },
    FoldLeft {
        values: Box<ValueExpression>,
        reducer: Reducer,
        init: Option<Box<ValueExpression>>,
    },
    Map {
        operand: Box<ValueExpression>,
        operation: UserOperation,
    },
}

impl ValueExpression {
    pub fn eval(&self, state: &ParseState, encoding: &Encoding) -> EngineResult<Values> {
        match self {
            ValueExpression::Const(value) => Ok(single(Some(value.clone()))),
            ValueExpression::Ref { target, limit } => {
                reference::eval_ref(target, limit.as_deref(), state, encoding)
            }
            ValueExpression::SelfValue => Ok(state
                .order()
                .current()
                .map(|value| single(Some(value.value().clone())))
                .unwrap_or_default()),
            ValueExpression::CurrentOffset => Ok(single(Some(numeric(
                &BigInt::from(state.offset()),
                Encoding::default(),
            )))),
            ValueExpression::CurrentIteration(level) => {
                reference::current_iteration(level, state, encoding)
            }
            ValueExpression::Scope { expr, level } => {
                reference::eval_scoped(expr, level, state, encoding)
            }
            ValueExpression::Last(operand) => {
                let values = operand.eval(state, encoding)?;
                Ok(values.head().map(|head| single(head.clone())).unwrap_or_default())
            }
            ValueExpression::First(operand) => {
                let values = operand.eval(state, encoding)?;
                Ok(values
                    .iter()
                    .last()
                    .map(|oldest| single(oldest.clone()))
                    .unwrap_or_default())
            }
            ValueExpression::Nth { values, indices } => {
                Ok(reference::nth(
                    &values.eval(state, encoding)?,
                    &indices.eval(state, encoding)?,
                ))
            }
            ValueExpression::Count(operand) => {
                let count = operand.eval(state, encoding)?.len();
                Ok(single(Some(numeric(&BigInt::from(count), Encoding::default()))))
            }
            ValueExpression::Offset(operand) => Ok(map_present(&operand.eval(state, encoding)?, |value| {
                Some(numeric(&BigInt::from(value.slice().offset()), Encoding::default()))
            })),
            ValueExpression::Len(operand) => Ok(map_present(&operand.eval(state, encoding)?, |value| {
                Some(numeric(&BigInt::from(value.len()), Encoding::default()))
            })),
            ValueExpression::Reverse(operand) => Ok(operand.eval(state, encoding)?.reverse()),
            ValueExpression::Bytes(operand) => Ok(arithmetic::bytes(&operand.eval(state, encoding)?)),
            ValueExpression::Expand { base, count } => {
                let base = base.eval(state, encoding)?;
                let count = single_number(count, state, encoding, "Count")?;
                let once = chronological(&base);
                let total = match once.len().checked_mul(count) {
                    Some(total) if total <= MAX_EXPANDED => total,
                    _ => {
                        return Err(EngineError::invalid_argument(format!(
                            "Expand of {} values {count} times exceeds {MAX_EXPANDED} values.",
                            once.len()
                        )))
                    }
                };
                let expanded = once.iter().cycle().take(total).cloned().collect();
                Ok(from_chronological(expanded))
            }
            ValueExpression::Elvis(left, right) => Ok(arithmetic::elvis(
                &left.eval(state, encoding)?,
                &right.eval(state, encoding)?,
            )),
            ValueExpression::Unary(op, operand) => {
                Ok(arithmetic::unary(*op, &operand.eval(state, encoding)?, encoding))
            }
            ValueExpression::Binary(op, left, right) => Ok(arithmetic::binary(
                *op,
                &left.eval(state, encoding)?,
                &right.eval(state, encoding)?,
                encoding,
            )),
            ValueExpression::FoldRight {
                values,
                reducer,
                init,
            } => fold::fold_right(values, reducer, init.as_deref(), state, encoding),
            ValueExpression::FoldLeft {
                values,
                reducer,
                init,
            } => fold::fold_left(values, reducer, init.as_deref(), state, encoding),
            ValueExpression::Map { operand, operation } => {
                Ok(map_present(&operand.eval(state, encoding)?, |value| {
                    operation.apply(value, encoding)
                }))
            }
        }
    }

    /// Evaluate and require exactly one present value.
    ///
    /// Anything else is a failed lookup rather than an error: sizes and
    /// counts that are not yet available make the token fail.
    pub(crate) fn eval_single(&self, state: &ParseState, encoding: &Encoding) -> EngineResult<Option<Value>> {
        let values = self.eval(state, encoding)?;
        if values.len() != 1 {
            return Ok(None);
        }
        Ok(values.head()?.clone())
    }
}

impl From<Value> for ValueExpression {
    fn from(value: Value) -> Self {
        ValueExpression::Const(value)
    }
}

impl From<i64> for ValueExpression {
    fn from(number: i64) -> Self {
        ValueExpression::Const(numeric(&BigInt::from(number), Encoding::default()))
    }
}

impl From<i32> for ValueExpression {
    fn from(number: i32) -> Self {
        ValueExpression::from(i64::from(number))
    }
}

impl From<u64> for ValueExpression {
    fn from(number: u64) -> Self {
        ValueExpression::Const(numeric(&BigInt::from(number), Encoding::default()))
    }
}

/// A boolean predicate.
#[derive(Clone, Debug)]
pub enum Expression {
    True,
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    /// Compares `value` (the most recent value when `None`) with `predicate`.
    Compare {
        kind: ComparisonKind,
        value: Option<Box<ValueExpression>>,
        predicate: Box<ValueExpression>,
    },
}

impl Expression {
    pub fn eval(&self, state: &ParseState, encoding: &Encoding) -> EngineResult<bool> {
        match self {
            Expression::True => Ok(true),
            Expression::Not(operand) => Ok(!operand.eval(state, encoding)?),
            Expression::And(left, right) => {
                Ok(left.eval(state, encoding)? && right.eval(state, encoding)?)
            }
            Expression::Or(left, right) => {
                Ok(left.eval(state, encoding)? || right.eval(state, encoding)?)
            }
            Expression::Compare {
                kind,
                value,
                predicate,
            } => comparison::compare(*kind, value.as_deref(), predicate, state, encoding),
        }
    }
}

pub(crate) fn single(value: Option<Value>) -> Values {
    ImmutableList::create(value)
}

pub(crate) fn numeric(number: &BigInt, encoding: Encoding) -> Value {
    Value::from_numeric(number, encoding)
}

/// Oldest first.
pub(crate) fn chronological(values: &Values) -> Vec<Option<Value>> {
    let mut items = values.to_vec();
    items.reverse();
    items
}

/// Inverse of [`chronological`]: the last item becomes the head.
pub(crate) fn from_chronological(items: Vec<Option<Value>>) -> Values {
    items.into_iter().rev().collect()
}

fn map_present(values: &Values, f: impl Fn(&Value) -> Option<Value>) -> Values {
    values.iter().map(|value| value.as_ref().and_then(&f)).collect()
}

/// Evaluate `expr` to a single present non-negative number.
pub(crate) fn single_number(
    expr: &ValueExpression,
    state: &ParseState,
    encoding: &Encoding,
    what: &str,
) -> EngineResult<usize> {
    let values = expr.eval(state, encoding)?;
    match values.head() {
        Ok(Some(value)) if values.len() == 1 => value.as_numeric().to_usize().ok_or_else(|| {
            EngineError::invalid_argument(format!("{what} must be a non-negative number."))
        }),
        _ => Err(EngineError::invalid_argument(format!(
            "{what} must evaluate to a single non-empty value."
        ))),
    }
}
