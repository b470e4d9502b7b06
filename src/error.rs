//! Error taxonomy of the storage layer.
//!
//! Every database failure is mapped to the kind closest to the operation that
//! failed; the underlying `sqlx::Error` is kept as the source where one exists.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Validation failed before anything was sent to the database.
    #[error("required field '{field}' is missing or invalid")]
    RequiredField { field: &'static str },

    #[error("{entity} could not be inserted")]
    NotInserted {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{entity} could not be updated")]
    NotUpdated {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{entity} could not be deleted")]
    NotDeleted {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{entity} not found")]
    NotFound {
        entity: &'static str,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Connection or schema bootstrap failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {reason}")]
    Config { reason: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn required(field: &'static str) -> Self {
        Self::RequiredField { field }
    }

    pub fn not_inserted(entity: &'static str, source: sqlx::Error) -> Self {
        tracing::error!(entity, error = %source, "insert failed");
        Self::NotInserted { entity, source }
    }

    pub fn not_updated(entity: &'static str, source: sqlx::Error) -> Self {
        tracing::error!(entity, error = %source, "update failed");
        Self::NotUpdated { entity, source }
    }

    pub fn not_deleted(entity: &'static str, source: sqlx::Error) -> Self {
        tracing::error!(entity, error = %source, "delete failed");
        Self::NotDeleted { entity, source }
    }

    /// A lookup that failed because the query itself errored.
    pub fn lookup_failed(entity: &'static str, source: sqlx::Error) -> Self {
        tracing::error!(entity, error = %source, "lookup failed");
        Self::NotFound {
            entity,
            source: Some(source),
        }
    }

    /// A lookup that ran fine but matched nothing.
    pub fn missing(entity: &'static str) -> Self {
        Self::NotFound {
            entity,
            source: None,
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
