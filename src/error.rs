//! Error taxonomy shared across the crate.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes surfaced by the value model, codec, index layer and
/// query executor.
#[derive(Debug, Error)]
pub enum Error {
    /// A query had neither `id` nor any filter entry.
    #[error("query must set `id` or at least one filter")]
    AtLeastOneFilter,

    /// A link query had `level == 0` and an empty path.
    #[error("link query path must not be empty when level is 0")]
    PathEmpty,

    /// A filter operator was not one of `eq, gt, ge, lt, le, contains`.
    #[error("unknown comparator: {0}")]
    UnknownComparator(String),

    /// Decoding a stored triple failed; the record is corrupt.
    #[error("corrupt triple record: {0}")]
    CorruptTriple(&'static str),

    /// The underlying key-value store reported a failure.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

#[cfg(not(target_arch = "wasm32"))]
impl From<redb::Error> for Error {
    fn from(err: redb::Error) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<redb::TransactionError> for Error {
    fn from(err: redb::TransactionError) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<redb::TableError> for Error {
    fn from(err: redb::TableError) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<redb::StorageError> for Error {
    fn from(err: redb::StorageError) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<redb::CommitError> for Error {
    fn from(err: redb::CommitError) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<redb::DatabaseError> for Error {
    fn from(err: redb::DatabaseError) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}
