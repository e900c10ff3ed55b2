//! Element-wise operations on value lists.
//!
//! Two lists are paired from their oldest values. When one list is longer,
//! its extra (most recent) values have no partner and produce `None`.

use num_traits::{Signed, ToPrimitive, Zero};

use super::{chronological, from_chronological, numeric, BinaryOp, UnaryOp, Values};
use crate::data::{Encoding, Value};

pub(super) fn unary(op: UnaryOp, values: &Values, encoding: &Encoding) -> Values {
    values
        .iter()
        .map(|value| {
            value.as_ref().map(|value| match op {
                UnaryOp::Neg => numeric(&-value.as_numeric(), *encoding),
                UnaryOp::Not => {
                    let bytes: Vec<u8> = value.as_bytes().iter().map(|byte| !byte).collect();
                    Value::from_bytes(bytes, *value.encoding())
                }
            })
        })
        .collect()
}

pub(super) fn binary(op: BinaryOp, left: &Values, right: &Values, encoding: &Encoding) -> Values {
    pairwise(left, right, |left, right| match (left, right) {
        (Some(left), Some(right)) => apply(op, left, right, *encoding),
        _ => None,
    })
}

/// Left where present, right otherwise.
pub(super) fn elvis(left: &Values, right: &Values) -> Values {
    pairwise(left, right, |left, right| left.or(right).cloned())
}

/// Every byte of every value, oldest value first, as single-byte values.
pub(super) fn bytes(values: &Values) -> Values {
    let mut split = Vec::new();
    for value in chronological(values) {
        match value {
            Some(value) => split.extend(
                value
                    .as_bytes()
                    .iter()
                    .map(|&byte| Some(Value::from_bytes(vec![byte], *value.encoding()))),
            ),
            None => split.push(None),
        }
    }
    from_chronological(split)
}

fn pairwise(
    left: &Values,
    right: &Values,
    combine: impl Fn(Option<&Value>, Option<&Value>) -> Option<Value>,
) -> Values {
    let left = chronological(left);
    let right = chronological(right);
    let paired = (0..left.len().max(right.len()))
        .map(|index| {
            combine(
                left.get(index).and_then(Option::as_ref),
                right.get(index).and_then(Option::as_ref),
            )
        })
        .collect();
    from_chronological(paired)
}

fn apply(op: BinaryOp, left: &Value, right: &Value, encoding: Encoding) -> Option<Value> {
    let result = match op {
        BinaryOp::Add => left.as_numeric() + right.as_numeric(),
        BinaryOp::Sub => left.as_numeric() - right.as_numeric(),
        BinaryOp::Mul => left.as_numeric() * right.as_numeric(),
        BinaryOp::Div => {
            let divisor = right.as_numeric();
            if divisor.is_zero() {
                return None;
            }
            left.as_numeric() / divisor
        }
        BinaryOp::Mod => {
            let modulus = right.as_numeric();
            if !modulus.is_positive() {
                return None;
            }
            ((left.as_numeric() % &modulus) + &modulus) % &modulus
        }
        BinaryOp::ShiftLeft => {
            let amount = shift_amount(right).filter(|&amount| amount <= MAX_LEFT_SHIFT)?;
            left.as_numeric() << amount
        }
        BinaryOp::ShiftRight => left.as_numeric() >> shift_amount(right)?,
        BinaryOp::And => return Some(bitwise(left, right, encoding, |a, b| a & b)),
        BinaryOp::Or => return Some(bitwise(left, right, encoding, |a, b| a | b)),
        BinaryOp::Cat => {
            let mut bytes = left.as_bytes().to_vec();
            bytes.extend_from_slice(right.as_bytes());
            return Some(Value::from_bytes(bytes, *left.encoding()));
        }
    };
    Some(numeric(&result, encoding))
}

/// Widest left shift, in bits. Larger amounts read from the input would
/// materialize arbitrarily large numbers and yield absent values instead.
const MAX_LEFT_SHIFT: usize = 1 << 16;

fn shift_amount(value: &Value) -> Option<usize> {
    value.as_numeric().to_usize()
}

/// Combine the bytes of both values aligned at their last byte; the shorter
/// one is padded with zeros in front.
fn bitwise(left: &Value, right: &Value, encoding: Encoding, op: impl Fn(u8, u8) -> u8) -> Value {
    let width = left.len().max(right.len());
    let padded = |bytes: &[u8]| -> Vec<u8> {
        let mut out = vec![0; width - bytes.len()];
        out.extend_from_slice(bytes);
        out
    };
    let left = padded(left.as_bytes());
    let right = padded(right.as_bytes());
    let bytes: Vec<u8> = left.iter().zip(&right).map(|(&a, &b)| op(a, b)).collect();
    Value::from_bytes(bytes, encoding)
}
