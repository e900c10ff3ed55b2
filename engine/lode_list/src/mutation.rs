//! Mutable-sequence operations, all refused.
//!
//! `ImmutableList` implements the shape of a mutable sequence so that every
//! attempted mutation is reported as [`ListError::UnsupportedOperation`].
//! New lists are built with `prepend`, `concat` and `reverse` instead.

use crate::{ImmutableList, ListError};

/// In-place mutation of a sequence.
pub trait ListMutation<T> {
    fn insert(&mut self, index: usize, item: T) -> Result<(), ListError>;
    fn push(&mut self, item: T) -> Result<(), ListError>;
    fn set(&mut self, index: usize, item: T) -> Result<T, ListError>;
    fn remove(&mut self, index: usize) -> Result<T, ListError>;
    fn remove_item(&mut self, item: &T) -> Result<bool, ListError>;
    fn extend_from(&mut self, items: Vec<T>) -> Result<(), ListError>;
    fn retain_only(&mut self, items: &[T]) -> Result<bool, ListError>;
    fn clear(&mut self) -> Result<(), ListError>;
}

fn unsupported<R>(operation: &'static str) -> Result<R, ListError> {
    Err(ListError::UnsupportedOperation { operation })
}

impl<T> ListMutation<T> for ImmutableList<T> {
    fn insert(&mut self, _index: usize, _item: T) -> Result<(), ListError> {
        unsupported("insert")
    }

    fn push(&mut self, _item: T) -> Result<(), ListError> {
        unsupported("push")
    }

    fn set(&mut self, _index: usize, _item: T) -> Result<T, ListError> {
        unsupported("set")
    }

    fn remove(&mut self, _index: usize) -> Result<T, ListError> {
        unsupported("remove")
    }

    fn remove_item(&mut self, _item: &T) -> Result<bool, ListError> {
        unsupported("remove_item")
    }

    fn extend_from(&mut self, _items: Vec<T>) -> Result<(), ListError> {
        unsupported("extend_from")
    }

    fn retain_only(&mut self, _items: &[T]) -> Result<bool, ListError> {
        unsupported("retain_only")
    }

    fn clear(&mut self) -> Result<(), ListError> {
        unsupported("clear")
    }
}
