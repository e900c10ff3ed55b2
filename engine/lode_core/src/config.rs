//! Parse configuration threaded explicitly through every parse.

use crate::data::Encoding;

/// Whether name lookups consult the per-state value cache.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CacheMode {
    #[default]
    Enabled,
    Disabled,
}

/// Maximum number of values a selection returns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Limit {
    #[default]
    Unbounded,
    AtMost(usize),
}

impl Limit {
    /// Returns `true` once `count` results satisfy this limit.
    #[inline]
    pub fn is_reached(self, count: usize) -> bool {
        match self {
            Limit::Unbounded => false,
            Limit::AtMost(max) => count >= max,
        }
    }
}

/// Settings for a top-level parse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseConfig {
    /// Encoding for tokens that do not carry their own.
    pub encoding: Encoding,
    pub value_cache: CacheMode,
}

impl ParseConfig {
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.value_cache = CacheMode::Disabled;
        self
    }
}
