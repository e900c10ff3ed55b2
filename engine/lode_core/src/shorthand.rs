//! Builder functions for grammars and expressions.
//!
//! ```text
//! use lode_core::shorthand::*;
//!
//! let field = seq("field", [def("len", 1), def("data", last(ref_name("len")))]);
//! let fields = repn("fields", field, 3);
//! ```
//!
//! Composite tokens take a name first; pass `""` for an anonymous token.
//! Size, count and operand arguments accept anything that converts into a
//! [`ValueExpression`], including plain integers.

use std::sync::Arc;

use crate::data::{Encoding, Value};
use crate::expression::{
    BinaryOp, ComparisonKind, Expression, Reducer, RefTarget, UnaryOp, UserOperation,
    ValueExpression,
};
use crate::token::{Token, TokenKind};

fn boxed(expr: impl Into<ValueExpression>) -> Box<ValueExpression> {
    Box::new(expr.into())
}

// Tokens

pub fn def(name: &str, size: impl Into<ValueExpression>) -> Token {
    Token::new(
        name,
        TokenKind::Def {
            size: size.into(),
            predicate: None,
        },
    )
}

pub fn def_with(name: &str, size: impl Into<ValueExpression>, predicate: Expression) -> Token {
    Token::new(
        name,
        TokenKind::Def {
            size: size.into(),
            predicate: Some(predicate),
        },
    )
}

pub fn def_encoded(name: &str, size: impl Into<ValueExpression>, encoding: Encoding) -> Token {
    Token::with_encoding(
        name,
        TokenKind::Def {
            size: size.into(),
            predicate: None,
        },
        encoding,
    )
}

pub fn nod(size: impl Into<ValueExpression>) -> Token {
    Token::new("", TokenKind::Nod { size: size.into() })
}

/// Grow a value byte by byte from zero until `terminator` parses.
pub fn until(name: &str, terminator: Token) -> Token {
    until_with(name, 0, 1, None, terminator)
}

pub fn until_with(
    name: &str,
    initial_size: impl Into<ValueExpression>,
    step_size: impl Into<ValueExpression>,
    max_size: Option<ValueExpression>,
    terminator: Token,
) -> Token {
    Token::new(
        name,
        TokenKind::Until {
            initial_size: initial_size.into(),
            step_size: step_size.into(),
            max_size,
            terminator,
        },
    )
}

pub fn seq(name: &str, tokens: impl IntoIterator<Item = Token>) -> Token {
    Token::new(name, TokenKind::Seq(tokens.into_iter().collect()))
}

pub fn rep(name: &str, body: Token) -> Token {
    Token::new(name, TokenKind::Rep(body))
}

pub fn repn(name: &str, body: Token, count: impl Into<ValueExpression>) -> Token {
    Token::new(
        name,
        TokenKind::RepN {
            body,
            count: count.into(),
        },
    )
}

pub fn whl(name: &str, body: Token, predicate: Expression) -> Token {
    Token::new(name, TokenKind::While { body, predicate })
}

pub fn opt(name: &str, body: Token) -> Token {
    Token::new(name, TokenKind::Opt(body))
}

pub fn cho(name: &str, tokens: impl IntoIterator<Item = Token>) -> Token {
    Token::new(name, TokenKind::Cho(tokens.into_iter().collect()))
}

pub fn pre(name: &str, body: Token, predicate: Expression) -> Token {
    Token::new(name, TokenKind::Pre { body, predicate })
}

pub fn post(name: &str, body: Token, predicate: Expression) -> Token {
    Token::new(name, TokenKind::Post { body, predicate })
}

pub fn tie(name: &str, body: Token, data: impl Into<ValueExpression>) -> Token {
    Token::new(
        name,
        TokenKind::Tie {
            body,
            data: data.into(),
        },
    )
}

pub fn sub_token(name: &str, body: Token, address: impl Into<ValueExpression>) -> Token {
    Token::new(
        name,
        TokenKind::Sub {
            body,
            address: address.into(),
        },
    )
}

/// Refer to the token named `name` by looking it up in the graph at parse time.
pub fn token(name: &str) -> Token {
    Token::new("", TokenKind::TokenRef(Arc::from(name)))
}

// Values

pub fn con(number: i64) -> ValueExpression {
    ValueExpression::from(number)
}

pub fn con_bytes(bytes: &[u8]) -> ValueExpression {
    ValueExpression::Const(Value::from_bytes(bytes, Encoding::default()))
}

pub fn con_str(text: &str, encoding: Encoding) -> ValueExpression {
    ValueExpression::Const(Value::from_string(text, encoding))
}

pub fn ref_name(name: &str) -> ValueExpression {
    ref_names([name])
}

pub fn ref_names<'a>(names: impl IntoIterator<Item = &'a str>) -> ValueExpression {
    ValueExpression::Ref {
        target: RefTarget::Names(names.into_iter().map(Arc::from).collect()),
        limit: None,
    }
}

pub fn ref_name_limited(name: &str, limit: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Ref {
        target: RefTarget::Names(vec![Arc::from(name)]),
        limit: Some(boxed(limit)),
    }
}

pub fn ref_def(definition: &Token) -> ValueExpression {
    ValueExpression::Ref {
        target: RefTarget::Definitions(vec![definition.clone()]),
        limit: None,
    }
}

pub fn ref_def_limited(definition: &Token, limit: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Ref {
        target: RefTarget::Definitions(vec![definition.clone()]),
        limit: Some(boxed(limit)),
    }
}

pub fn self_value() -> ValueExpression {
    ValueExpression::SelfValue
}

pub fn current_offset() -> ValueExpression {
    ValueExpression::CurrentOffset
}

pub fn current_iteration(level: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::CurrentIteration(boxed(level))
}

pub fn scope(expr: impl Into<ValueExpression>, level: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Scope {
        expr: boxed(expr),
        level: boxed(level),
    }
}

pub fn last(operand: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Last(boxed(operand))
}

pub fn first(operand: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::First(boxed(operand))
}

pub fn nth(values: impl Into<ValueExpression>, indices: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Nth {
        values: boxed(values),
        indices: boxed(indices),
    }
}

pub fn count(operand: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Count(boxed(operand))
}

pub fn offset(operand: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Offset(boxed(operand))
}

pub fn len(operand: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Len(boxed(operand))
}

pub fn reverse(operand: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Reverse(boxed(operand))
}

pub fn bytes(operand: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Bytes(boxed(operand))
}

pub fn expand(base: impl Into<ValueExpression>, count: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Expand {
        base: boxed(base),
        count: boxed(count),
    }
}

pub fn elvis(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Elvis(boxed(left), boxed(right))
}

fn binary(op: BinaryOp, left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Binary(op, boxed(left), boxed(right))
}

pub fn add(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::Add, left, right)
}

pub fn sub(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::Sub, left, right)
}

pub fn mul(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::Mul, left, right)
}

pub fn div(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::Div, left, right)
}

pub fn modulo(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::Mod, left, right)
}

pub fn bit_and(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::And, left, right)
}

pub fn bit_or(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::Or, left, right)
}

pub fn shl(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::ShiftLeft, left, right)
}

pub fn shr(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::ShiftRight, left, right)
}

pub fn cat(left: impl Into<ValueExpression>, right: impl Into<ValueExpression>) -> ValueExpression {
    binary(BinaryOp::Cat, left, right)
}

pub fn neg(operand: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Unary(UnaryOp::Neg, boxed(operand))
}

pub fn bit_not(operand: impl Into<ValueExpression>) -> ValueExpression {
    ValueExpression::Unary(UnaryOp::Not, boxed(operand))
}

pub fn fold_right(
    values: impl Into<ValueExpression>,
    reducer: impl Fn(ValueExpression, ValueExpression) -> ValueExpression + Send + Sync + 'static,
    init: Option<ValueExpression>,
) -> ValueExpression {
    ValueExpression::FoldRight {
        values: boxed(values),
        reducer: Reducer::new(reducer),
        init: init.map(Box::new),
    }
}

pub fn fold_left(
    values: impl Into<ValueExpression>,
    reducer: impl Fn(ValueExpression, ValueExpression) -> ValueExpression + Send + Sync + 'static,
    init: Option<ValueExpression>,
) -> ValueExpression {
    ValueExpression::FoldLeft {
        values: boxed(values),
        reducer: Reducer::new(reducer),
        init: init.map(Box::new),
    }
}

pub fn map(
    name: &str,
    operand: impl Into<ValueExpression>,
    apply: impl Fn(&Value, &Encoding) -> Option<Value> + Send + Sync + 'static,
) -> ValueExpression {
    ValueExpression::Map {
        operand: boxed(operand),
        operation: UserOperation::new(name, apply),
    }
}

// Predicates

pub fn always() -> Expression {
    Expression::True
}

pub fn not(operand: Expression) -> Expression {
    Expression::Not(Box::new(operand))
}

pub fn and(left: Expression, right: Expression) -> Expression {
    Expression::And(Box::new(left), Box::new(right))
}

pub fn or(left: Expression, right: Expression) -> Expression {
    Expression::Or(Box::new(left), Box::new(right))
}

/// Compare `value` with `predicate`.
pub fn compare(
    kind: ComparisonKind,
    value: impl Into<ValueExpression>,
    predicate: impl Into<ValueExpression>,
) -> Expression {
    Expression::Compare {
        kind,
        value: Some(boxed(value)),
        predicate: boxed(predicate),
    }
}

fn compare_self(kind: ComparisonKind, predicate: impl Into<ValueExpression>) -> Expression {
    Expression::Compare {
        kind,
        value: None,
        predicate: boxed(predicate),
    }
}

/// The most recent value has the same bytes as `predicate`.
pub fn eq(predicate: impl Into<ValueExpression>) -> Expression {
    compare_self(ComparisonKind::Eq, predicate)
}

pub fn eq_num(predicate: impl Into<ValueExpression>) -> Expression {
    compare_self(ComparisonKind::EqNum, predicate)
}

pub fn eq_str(predicate: impl Into<ValueExpression>) -> Expression {
    compare_self(ComparisonKind::EqStr, predicate)
}

pub fn gt_num(predicate: impl Into<ValueExpression>) -> Expression {
    compare_self(ComparisonKind::GtNum, predicate)
}

pub fn lt_num(predicate: impl Into<ValueExpression>) -> Expression {
    compare_self(ComparisonKind::LtNum, predicate)
}

pub fn gt_eq_num(predicate: impl Into<ValueExpression>) -> Expression {
    compare_self(ComparisonKind::GtEqNum, predicate)
}

pub fn lt_eq_num(predicate: impl Into<ValueExpression>) -> Expression {
    compare_self(ComparisonKind::LtEqNum, predicate)
}
