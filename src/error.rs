use thiserror::Error;

/// Errors produced while configuring or enumerating a recurrence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A positional or ordinal value outside of its domain.
    #[error("Out of range: {0}")]
    Range(String),

    /// An enum value that is not a member, or a request that cannot be answered.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
