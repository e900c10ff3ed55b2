//! Sequencing, choice and conditional tokens.

use super::Token;
use crate::data::ParseState;
use crate::environment::Environment;
use crate::expression::Expression;
use crate::EngineResult;

pub(super) fn parse_seq(token: &Token, tokens: &[Token], env: &Environment) -> EngineResult<Option<ParseState>> {
    let mut state = env.parse_state().add_branch(token);
    for next in tokens {
        match next.parse(&env.with_state(state))? {
            Some(parsed) => state = parsed,
            None => return Ok(None),
        }
    }
    state.close_branch(token).map(Some)
}

pub(super) fn parse_cho(token: &Token, tokens: &[Token], env: &Environment) -> EngineResult<Option<ParseState>> {
    let branched = env.with_state(env.parse_state().add_branch(token));
    for alternative in tokens {
        if let Some(parsed) = alternative.parse(&branched)? {
            return parsed.close_branch(token).map(Some);
        }
    }
    Ok(None)
}

/// Never fails: without a match the original state comes back unchanged.
pub(super) fn parse_opt(token: &Token, body: &Token, env: &Environment) -> EngineResult<Option<ParseState>> {
    let branched = env.with_state(env.parse_state().add_branch(token));
    match body.parse(&branched)? {
        Some(parsed) => parsed.close_branch(token).map(Some),
        None => Ok(Some(env.parse_state().clone())),
    }
}

/// When `predicate` does not hold, succeeds without parsing anything.
pub(super) fn parse_pre(
    token: &Token,
    body: &Token,
    predicate: &Expression,
    env: &Environment,
) -> EngineResult<Option<ParseState>> {
    if !predicate.eval(env.parse_state(), env.encoding())? {
        return Ok(Some(env.parse_state().clone()));
    }
    let branched = env.with_state(env.parse_state().add_branch(token));
    match body.parse(&branched)? {
        Some(parsed) => parsed.close_branch(token).map(Some),
        None => Ok(None),
    }
}

/// `predicate` sees the branch still open, so the most recent value is
/// the last one `body` produced.
pub(super) fn parse_post(
    token: &Token,
    body: &Token,
    predicate: &Expression,
    env: &Environment,
) -> EngineResult<Option<ParseState>> {
    let branched = env.with_state(env.parse_state().add_branch(token));
    let Some(parsed) = body.parse(&branched)? else {
        return Ok(None);
    };
    if !predicate.eval(&parsed, env.encoding())? {
        return Ok(None);
    }
    parsed.close_branch(token).map(Some)
}
