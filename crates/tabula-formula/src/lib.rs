//! # tabula-formula
//!
//! Expression trees and formula machinery for the tabula spreadsheet engine.
//!
//! This crate provides:
//! - [`Expr`] - the expression tree stored under each cell
//! - [`evaluate`] / [`has_cycle`] - tree walking against a [`CellTable`]
//! - [`ExprBuilder`] - the parser-callback surface for tree construction
//! - [`parse_expression`] - cell source text → builder callbacks
//! - [`CellTable`] - ordered sparse storage of cells
//!
//! ## Example
//!
//! ```rust
//! use tabula_formula::{evaluate, parse_expression, CellTable, ExprBuilder};
//!
//! let mut builder = ExprBuilder::new(true);
//! parse_expression("=1+2*3", &mut builder).unwrap();
//! let built = builder.finish().unwrap();
//!
//! let cells = CellTable::new();
//! assert_eq!(evaluate(&built.expr, &cells).as_number(), Some(7.0));
//! ```

pub mod ast;
pub mod builder;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod table;

pub use ast::{BinaryOperator, CellRef, Expr, UnaryOperator};
pub use builder::{BuiltExpr, ExprBuilder};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, has_cycle};
pub use parser::parse_expression;
pub use table::{Cell, CellTable};
