//! Error types for the sheet facade

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing or persisting a sheet
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid address
    #[error(transparent)]
    Address(#[from] tabula_core::Error),

    /// Formula parse or build error
    #[error(transparent)]
    Formula(#[from] tabula_formula::FormulaError),

    /// IO error during save or load
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed persistence stream
    #[error("Malformed sheet stream: {0}")]
    Format(String),
}
