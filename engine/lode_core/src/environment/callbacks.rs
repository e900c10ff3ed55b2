//! Parse observers.

use std::fmt;
use std::sync::Arc;

use lode_list::ImmutableList;

use crate::data::ParseState;
use crate::token::Token;

/// Notified after a token has been parsed.
///
/// Both methods do nothing by default; implement the ones you need.
pub trait Callback: Send + Sync {
    fn handle_success(&self, _token: &Token, _before: &ParseState, _after: &ParseState) {}

    fn handle_failure(&self, _token: &Token, _before: &ParseState) {}
}

/// A generic callback for every token plus callbacks bound to specific tokens.
#[derive(Clone, Default)]
pub struct Callbacks {
    generic: Option<Arc<dyn Callback>>,
    by_token: ImmutableList<(Token, Arc<dyn Callback>)>,
}

impl Callbacks {
    pub fn none() -> Self {
        Callbacks::default()
    }

    /// Called for every token.
    #[must_use]
    pub fn with_generic(&self, callback: Arc<dyn Callback>) -> Self {
        Callbacks {
            generic: Some(callback),
            by_token: self.by_token.clone(),
        }
    }

    /// Called for `token` only (matched by identity).
    #[must_use]
    pub fn add(&self, token: Token, callback: Arc<dyn Callback>) -> Self {
        Callbacks {
            generic: self.generic.clone(),
            by_token: self.by_token.prepend((token, callback)),
        }
    }

    pub(crate) fn handle(&self, token: &Token, before: &ParseState, result: Option<&ParseState>) {
        let notify = |callback: &dyn Callback| match result {
            Some(after) => callback.handle_success(token, before, after),
            None => callback.handle_failure(token, before),
        };
        if let Some(generic) = &self.generic {
            notify(generic.as_ref());
        }
        for (bound, callback) in &self.by_token {
            if bound == token {
                notify(callback.as_ref());
            }
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("generic", &self.generic.is_some())
            .field("by_token", &self.by_token.len())
            .finish()
    }
}
