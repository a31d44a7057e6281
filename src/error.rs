//! Error types for the PhishGuard library.
//!
//! All errors are represented by the [`PhishGuardError`] enum, which provides
//! detailed information about what went wrong.
//!
//! # Examples
//!
//! ```
//! use phishguard::error::{PhishGuardError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PhishGuardError::invalid_input("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for PhishGuard operations.
///
/// This enum represents all possible errors that can occur in the library.
/// It uses the `thiserror` crate for automatic `Error` trait implementation
/// and provides convenient constructor methods for the string-carrying
/// variants.
#[derive(Error, Debug)]
pub enum PhishGuardError {
    /// I/O errors (artifact reads and writes).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid input to training or inference.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model training or prediction errors.
    #[error("Model error: {0}")]
    Model(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Failure while persisting a trained model artifact.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with PhishGuardError.
pub type Result<T> = std::result::Result<T, PhishGuardError>;

impl PhishGuardError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::Analysis(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::InvalidInput(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::Model(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::InvalidOperation(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::Serialization(msg.into())
    }

    /// Create a generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::Other(msg.into())
    }
}
