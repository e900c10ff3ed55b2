//! Comparisons between value lists.

use super::{ValueExpression, Values};
use crate::data::{Encoding, ParseState, Value};
use crate::EngineResult;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComparisonKind {
    /// Identical bytes.
    Eq,
    EqNum,
    EqStr,
    GtNum,
    LtNum,
    GtEqNum,
    LtEqNum,
}

impl ComparisonKind {
    fn holds(self, value: &Value, predicate: &Value) -> bool {
        match self {
            ComparisonKind::Eq => value.as_bytes() == predicate.as_bytes(),
            ComparisonKind::EqStr => value.as_string() == predicate.as_string(),
            ComparisonKind::EqNum => value.as_numeric() == predicate.as_numeric(),
            ComparisonKind::GtNum => value.as_numeric() > predicate.as_numeric(),
            ComparisonKind::LtNum => value.as_numeric() < predicate.as_numeric(),
            ComparisonKind::GtEqNum => value.as_numeric() >= predicate.as_numeric(),
            ComparisonKind::LtEqNum => value.as_numeric() <= predicate.as_numeric(),
        }
    }
}

/// True iff both lists are non-empty, equally long, free of absent values,
/// and `kind` holds for every pair.
pub(super) fn compare(
    kind: ComparisonKind,
    value: Option<&ValueExpression>,
    predicate: &ValueExpression,
    state: &ParseState,
    encoding: &Encoding,
) -> EngineResult<bool> {
    let values = match value {
        Some(value) => value.eval(state, encoding)?,
        None => state
            .order()
            .current()
            .map(|current| Values::create(Some(current.value().clone())))
            .unwrap_or_default(),
    };
    if values.is_empty() {
        return Ok(false);
    }
    let predicates = predicate.eval(state, encoding)?;
    if values.len() != predicates.len() {
        return Ok(false);
    }
    Ok(values
        .iter()
        .zip(predicates.iter())
        .all(|pair| match pair {
            (Some(value), Some(predicate)) => kind.holds(value, predicate),
            _ => false,
        }))
}
