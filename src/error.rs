//! Error types for the storage manager
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// The main error type for the storage manager
#[derive(Error, Debug)]
pub enum Error {
    // ========== Catalog Errors ==========
    #[error("Catalog error: database '{0}' not found")]
    DatabaseNotFound(String),

    #[error("Catalog error: database '{0}' already exists")]
    DatabaseAlreadyExists(String),

    #[error("Catalog error: table '{0}' not found in database '{1}'")]
    TableNotFound(String, String),

    #[error("Catalog error: table '{0}' already exists in database '{1}'")]
    TableAlreadyExists(String, String),

    #[error("Catalog error: invalid name '{0}'")]
    InvalidName(String),

    #[error("Catalog error: table '{0}' has no columns")]
    EmptyColumnList(String),

    #[error("Catalog error: unknown data type '{0}'")]
    UnknownDataType(String),

    // ========== Page Errors ==========
    #[error("Page error: page {0} does not exist in the file")]
    PageOutOfBounds(u32),

    #[error("Page error: page {0} is full")]
    PageFull(u32),

    #[error("Page error: corrupted page header (lower={0}, upper={1})")]
    CorruptedPage(u32, u32),

    #[error("Page error: slot {0} is out of range")]
    SlotOutOfRange(u16),

    // ========== Tuple Errors ==========
    #[error("Tuple error: expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("Tuple error: value '{value}' is not valid for type {ty}")]
    InvalidValue { value: String, ty: String },

    #[error("Tuple error: buffer too short for schema (need {need} bytes, have {have})")]
    TupleTooShort { need: usize, have: usize },

    // ========== Load Errors ==========
    #[error("Load error: {0}")]
    LoadError(String),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ========== Serialization Errors ==========
    #[error("Catalog file error: {0}")]
    CatalogFile(#[from] serde_json::Error),
}

/// Result type alias for storage manager operations
pub type Result<T> = std::result::Result<T, Error>;
