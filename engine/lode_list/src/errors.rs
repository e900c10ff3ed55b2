//! Errors raised by list accessors.

/// Contract violations on an [`ImmutableList`](crate::ImmutableList).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// `head` or `tail` of an empty list.
    #[error("cannot take the {operation} of an empty list")]
    EmptyCollection { operation: &'static str },
    /// `get` outside `[0, size)`.
    #[error("index {index} out of range for list of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    /// Any attempt to mutate the list in place.
    #[error("{operation} is not supported on an immutable list")]
    UnsupportedOperation { operation: &'static str },
}
