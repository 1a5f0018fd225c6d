//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while parsing or building an expression
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Source text does not match the expression grammar
    #[error("Parse error: {0}")]
    Parse(String),

    /// Syntax the engine recognizes but does not evaluate
    #[error("Unsupported construct: {0}")]
    Unsupported(&'static str),

    /// An operator callback fired without enough operands on the stack
    #[error("Operator is missing an operand")]
    MissingOperand,

    /// The callback sequence left more than one tree on the stack
    #[error("Expression did not reduce to a single tree")]
    DanglingOperand,

    /// Invalid address inside a reference
    #[error(transparent)]
    Address(#[from] tabula_core::Error),
}
