//! # tabula-core
//!
//! Core data types for the tabula spreadsheet engine.
//!
//! This crate provides the two fundamental types used throughout tabula:
//! - [`Address`] - Column/row cell locators with A1-style parsing
//! - [`Value`] - The result of evaluating a cell (number, text, or undefined)
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{Address, Value};
//!
//! let addr = Address::parse("AZ42").unwrap();
//! assert_eq!(addr.column, 52);
//! assert_eq!(addr.row, 42);
//! assert_eq!(addr.to_string(), "AZ42");
//!
//! let v = Value::from(3.5);
//! assert_eq!(v.as_number(), Some(3.5));
//! ```

pub mod address;
pub mod error;
pub mod value;

pub use address::Address;
pub use error::{Error, Result};
pub use value::Value;
