//! Everything a token parse reads besides the grammar itself.

mod callbacks;

pub use callbacks::{Callback, Callbacks};

use crate::config::ParseConfig;
use crate::data::{Encoding, ParseState, Source};

/// The parse state, the observers to notify, and the encoding in effect.
#[derive(Clone, Debug)]
pub struct Environment {
    parse_state: ParseState,
    callbacks: Callbacks,
    encoding: Encoding,
}

impl Environment {
    pub fn new(parse_state: ParseState, callbacks: Callbacks, encoding: Encoding) -> Self {
        Environment {
            parse_state,
            callbacks,
            encoding,
        }
    }

    /// A fresh state at `offset` of `source`, set up per `config`.
    pub fn from_config(source: Source, offset: u64, config: &ParseConfig) -> Self {
        Environment::new(
            ParseState::new(source, offset, config.value_cache),
            Callbacks::none(),
            config.encoding,
        )
    }

    pub fn parse_state(&self) -> &ParseState {
        &self.parse_state
    }

    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    #[must_use]
    pub fn with_state(&self, parse_state: ParseState) -> Self {
        Environment {
            parse_state,
            callbacks: self.callbacks.clone(),
            encoding: self.encoding,
        }
    }

    #[must_use]
    pub fn with_callbacks(&self, callbacks: Callbacks) -> Self {
        Environment {
            callbacks,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_encoding(&self, encoding: Encoding) -> Self {
        Environment {
            encoding,
            ..self.clone()
        }
    }
}
