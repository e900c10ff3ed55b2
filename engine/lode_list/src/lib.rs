//! Lode List - persistent immutable list.
//!
//! `ImmutableList<T>` is a singly-linked list whose nodes are shared between
//! every list built from them:
//!
//! - `prepend` is O(1) and leaves the original list untouched
//! - `reverse` is O(1) and returns a lazy view that materializes on first use
//! - equality and hashing follow the element sequence, not node identity
//!
//! There is no in-place mutation. The [`ListMutation`] operations exist so
//! code written against a mutable-sequence shape gets a typed
//! [`ListError::UnsupportedOperation`] instead of a silent copy.

mod errors;
mod list;
mod mutation;

pub use errors::ListError;
pub use list::{ImmutableList, Iter};
pub use mutation::ListMutation;
