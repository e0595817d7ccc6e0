//! Error types for the transfer-extraction domain layer.
//!
//! Two layers of errors are defined here:
//!
//! - [`DomainError`] - Extraction and business logic errors
//! - [`StorageError`] - Database/repository errors
//!
//! Error conversion is automatic via `From` implementations, allowing `?`
//! to work across the storage boundary. Chain connectivity and block
//! scheduling errors belong to the host framework, not this crate.

use thiserror::Error;

// =============================================================================
// Domain Errors
// =============================================================================

/// Extraction and domain rule violations.
///
/// A `DomainError` aborts processing of the current item (one event or one
/// extrinsic); the host framework decides whether to retry or skip the block.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Event or extrinsic payload had a malformed/unexpected shape.
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// A currency descriptor named a token the registry does not know.
    ///
    /// Fatal for the item: without a registry entry there is no decimal
    /// scale, and a guessed scale would silently corrupt the record.
    #[error("Unknown token symbol: {0}")]
    UnknownToken(String),

    /// Account ID failed validation.
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(String),

    /// Generic validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Database and repository errors.
///
/// These originate from the external persistence collaborator: queries,
/// transactions, and row serialization.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to establish database connection.
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// Query execution failed.
    #[error("Query execution error: {0}")]
    QueryError(String),

    /// Requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Database constraint was violated (unique, foreign key, etc.).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Transaction commit/rollback failed.
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// Row serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Schema migration failed.
    #[error("Migration error: {0}")]
    MigrationError(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
