//! Contract-violation errors.
//!
//! A parse that simply does not match its input is not an error: token
//! parsing reports it as `Ok(None)`. The variants below are raised when a
//! grammar or a caller breaks the engine's contract, and they propagate to
//! the top-level call unchanged.

use lode_list::ListError;

/// Result of an engine operation that may violate a contract.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A `ParseItem` was converted to a variant it does not hold.
    #[error("Cannot convert to {conversion}")]
    TypeMismatch { conversion: &'static str },

    #[error("Argument name may not be empty.")]
    EmptyName,

    /// A `Ref` limit did not evaluate to a single usable number.
    #[error("invalid limit: {reason}")]
    InvalidLimit { reason: &'static str },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An iterable branch was closed by a token other than the one that opened it.
    #[error(
        "Cannot close branch for iterable token {expected}. Current iteration state is for token {found}."
    )]
    IterationMismatch { expected: String, found: String },

    #[error("Cannot close branch that is not open.")]
    NoOpenBranch,

    #[error(transparent)]
    List(#[from] ListError),
}

impl EngineError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            message: message.into(),
        }
    }
}
