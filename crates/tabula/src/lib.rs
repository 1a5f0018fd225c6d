//! # tabula
//!
//! An in-memory spreadsheet engine.
//!
//! Cells hold literal values or formulas referencing other cells through
//! relative and absolute references. Tabula provides:
//!
//! - On-demand formula evaluation with mixed numeric/string semantics
//! - Cycle detection (a cell on a reference cycle reads as undefined)
//! - Rectangle copies that translate relative references by the displacement
//! - A compact stream persistence format
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell("A1".parse().unwrap(), "=10").unwrap();
//! sheet.set_cell("A2".parse().unwrap(), "=20").unwrap();
//! sheet.set_cell("A3".parse().unwrap(), "=A1+A2").unwrap();
//!
//! assert_eq!(sheet.get_value("A3".parse().unwrap()), Value::Number(30.0));
//!
//! // Copy A3 one column right: relative references move with it
//! sheet.copy_rect("B3".parse().unwrap(), "A3".parse().unwrap(), 1, 1);
//! ```

pub mod error;
pub mod persist;
pub mod prelude;
pub mod sheet;

pub use error::{Error, Result};
pub use sheet::{Sheet, CAP_CYCLIC_DEPS};

// Re-export core types
pub use tabula_core::{Address, Value};

// Re-export formula types
pub use tabula_formula::{
    evaluate, has_cycle, parse_expression, BinaryOperator, BuiltExpr, Cell, CellRef, CellTable,
    Expr, ExprBuilder, FormulaError, FormulaResult, UnaryOperator,
};
