//! Name-keyed cache of parsed values.
//!
//! The cache travels inside the parse state and is extended whenever a
//! value is added to the graph, so a state's cache always describes exactly
//! that state's graph. Backtracking discards both together.
//!
//! The map is an `im::HashMap`: extending it shares every entry but the one
//! that changed, and each entry is a persistent list sharing its tail.

use std::sync::Arc;

use lode_list::ImmutableList;
use rustc_hash::FxBuildHasher;

use crate::config::{CacheMode, Limit};
use crate::data::ParseValue;

type ValuesByName = im::HashMap<Arc<str>, ImmutableList<ParseValue>, FxBuildHasher>;

#[derive(Clone, Debug, Default)]
pub struct ParseValueCache {
    /// `None` when caching is disabled.
    entries: Option<ValuesByName>,
}

impl ParseValueCache {
    pub fn new(mode: CacheMode) -> Self {
        match mode {
            CacheMode::Enabled => ParseValueCache {
                entries: Some(ValuesByName::default()),
            },
            CacheMode::Disabled => ParseValueCache::disabled(),
        }
    }

    pub fn disabled() -> Self {
        ParseValueCache { entries: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Values named `name`, most recent first, or `None` if caching is disabled.
    pub fn find(&self, name: &str, limit: Limit) -> Option<ImmutableList<ParseValue>> {
        let entries = self.entries.as_ref()?;
        let Some(values) = entries.get(name) else {
            return Some(ImmutableList::new());
        };
        match limit {
            Limit::AtMost(max) if max < values.len() => {
                Some(values.iter().take(max).cloned().collect())
            }
            _ => Some(values.clone()),
        }
    }

    /// A cache that also holds `value`.
    #[must_use]
    pub fn add(&self, value: &ParseValue) -> Self {
        let Some(entries) = &self.entries else {
            return ParseValueCache::disabled();
        };
        let name = value.shared_name();
        let values = entries
            .get(name.as_ref())
            .cloned()
            .unwrap_or_default()
            .prepend(value.clone());
        ParseValueCache {
            entries: Some(entries.update(Arc::clone(name), values)),
        }
    }
}
