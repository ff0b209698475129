//! Error types for Budgetline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation required an identifier and none was supplied
    #[error("No {0} id was supplied")]
    NullId(&'static str),

    /// A supplied identifier does not resolve to an existing record
    #[error("{entity} {id} not found")]
    IdNotFound { entity: &'static str, id: i64 },

    /// The path identifier disagrees with the payload's identifier
    #[error("{entity} id mismatch: path id {path_id}, payload id {payload_id}")]
    IdMismatch {
        entity: &'static str,
        path_id: i64,
        payload_id: i64,
    },

    /// An effective date violates a business constraint
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The store detected a conflicting concurrent modification
    #[error("{entity} {id} was modified by someone else")]
    Concurrency { entity: &'static str, id: i64 },

    /// A field-level constraint was violated before persistence
    #[error("Validation failed: {0}")]
    ModelValidation(String),

    /// A uniqueness constraint was violated before persistence
    #[error("{entity} named '{name}' already exists")]
    UniqueConstraintViolation { entity: &'static str, name: String },

    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),
}

impl Error {
    /// True for a SQLite foreign-key or check constraint failure
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
