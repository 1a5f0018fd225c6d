//! Cell storage
//!
//! Sparse mapping from [`Address`] to [`Cell`]. A `BTreeMap` keeps lookups
//! logarithmic and iteration in address order (column-major, then by row),
//! which the save format relies on.

use crate::ast::Expr;
use crate::evaluator;
use std::collections::BTreeMap;
use std::fmt;
use tabula_core::{Address, Value};

/// A stored cell: its expression tree plus the formula flag
///
/// A cell with no expression is an empty placeholder; it evaluates to
/// undefined. Placeholders appear when a formula references an address
/// nothing has been written to yet.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    /// Root of the expression tree, if the cell has contents
    pub expr: Option<Expr>,
    /// True when the source text began with `=`; governs serialization only
    pub is_formula: bool,
}

impl Cell {
    /// Evaluate the cell's tree against `cells`
    pub fn evaluate(&self, cells: &CellTable) -> Value {
        match &self.expr {
            Some(expr) => evaluator::evaluate(expr, cells),
            None => Value::Undefined,
        }
    }

    /// Check the cell's tree for reference cycles
    pub fn has_cycle(&self, cells: &CellTable, visited: &mut BTreeMap<Address, bool>) -> bool {
        match &self.expr {
            Some(expr) => evaluator::has_cycle(expr, cells, visited),
            None => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_formula {
            write!(f, "=")?;
        }
        if let Some(expr) = &self.expr {
            write!(f, "{}", expr)?;
        }
        Ok(())
    }
}

/// Ordered sparse table of cells
#[derive(Debug, Clone, Default)]
pub struct CellTable {
    cells: BTreeMap<Address, Cell>,
}

impl CellTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cell
    pub fn get(&self, addr: Address) -> Option<&Cell> {
        self.cells.get(&addr)
    }

    /// Look up a cell for mutation
    pub fn get_mut(&mut self, addr: Address) -> Option<&mut Cell> {
        self.cells.get_mut(&addr)
    }

    /// Get the cell at `addr`, creating an empty one if absent
    pub fn ensure(&mut self, addr: Address) -> &mut Cell {
        self.cells.entry(addr).or_default()
    }

    /// Remove the cell at `addr`, if any
    pub fn remove(&mut self, addr: Address) -> Option<Cell> {
        self.cells.remove(&addr)
    }

    /// Iterate cells in address order
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Cell)> {
        self.cells.iter()
    }

    /// Number of stored cells (placeholders included)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether the table stores no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
