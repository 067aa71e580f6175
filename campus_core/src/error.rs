use crate::storage;
use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Things that can go wrong while handling a user's intent. None of these are
/// fatal; the front end shows them and carries on.
#[derive(Debug, Error)]
pub enum Error {
    /// Someone typed the wrong access code.
    #[error("Error: Invalid access code.")]
    InvalidCode,

    /// The event form was missing something.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The storage backend failed, for example a permissions problem in the
    /// data directory.
    #[error("Storage error: {0}")]
    Storage(#[from] storage::Error),
}

/// Why a new event was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more fields were blank after trimming.
    #[error("Please fill in all event details.")]
    MissingField,

    /// The date was filled in but we couldn't read it.
    #[error("Please enter the date as YYYY-MM-DDTHH:MM.")]
    InvalidDate,
}
