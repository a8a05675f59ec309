//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when input is rejected before any persistence.
//! - [`Continuity`] thrown when a reading batch disagrees with the stored
//!   nozzle state (stale opening, stale version, superseded date).
//! - [`InsufficientStock`] thrown only when the stock policy is `Block`.
//! - [`KeyNotFound`] thrown when an item are not found.
//! - [`Database`] thrown on storage failures; the surrounding transaction is
//!   rolled back and the operation can be retried.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Continuity`]: EngineError::Continuity
//!  [`InsufficientStock`]: EngineError::InsufficientStock
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Continuity violated: {0}")]
    Continuity(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Continuity(a), Self::Continuity(b)) => a == b,
            (Self::InsufficientStock(a), Self::InsufficientStock(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
