//! The sheet: set, get, copy and clone cells

use crate::error::Result;
use std::collections::BTreeMap;
use std::fmt;
use tabula_core::{Address, Value};
use tabula_formula::{parse_expression, Cell, CellTable, ExprBuilder};

/// Capability bit: cyclic dependencies are detected and reported as
/// undefined values rather than resolved
pub const CAP_CYCLIC_DEPS: u32 = 0x01;

/// An in-memory spreadsheet
///
/// Cells hold either literal values or formulas over other cells. Reads
/// evaluate on demand; there is no cached recomputation. All operations are
/// single-threaded.
///
/// ## Example
///
/// ```rust
/// use tabula::{Sheet, Value};
///
/// let mut sheet = Sheet::new();
/// sheet.set_cell("A1".parse().unwrap(), "=10").unwrap();
/// sheet.set_cell("A2".parse().unwrap(), "=A1*4").unwrap();
/// assert_eq!(sheet.get_value("A2".parse().unwrap()), Value::Number(40.0));
/// ```
#[derive(Debug, Default)]
pub struct Sheet {
    cells: CellTable,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Feature bits advertised by this implementation
    pub fn capabilities() -> u32 {
        CAP_CYCLIC_DEPS
    }

    pub(crate) fn cells(&self) -> &CellTable {
        &self.cells
    }

    /// Set a cell from source text
    ///
    /// Text starting with `=` is a formula; anything else is a literal. On a
    /// parse failure the table is left unchanged. On success every address
    /// the new formula references gets an empty placeholder cell, so later
    /// lookups resolve without surprise.
    pub fn set_cell(&mut self, pos: Address, contents: &str) -> Result<()> {
        let formula = contents.starts_with('=');
        let mut builder = ExprBuilder::new(formula);
        parse_expression(contents, &mut builder)?;
        let built = builder.finish()?;

        for addr in &built.referenced {
            self.cells.ensure(*addr);
        }
        let cell = self.cells.ensure(pos);
        cell.expr = Some(built.expr);
        cell.is_formula = formula;
        Ok(())
    }

    /// Evaluate a cell
    ///
    /// Absent cells, cells on a reference cycle, and every local evaluation
    /// failure (type mismatch, division by zero, reference to an empty cell)
    /// read as [`Value::Undefined`]. The cycle check is seeded with `pos`, so
    /// a self-reference is caught immediately and the call returns in
    /// bounded time.
    pub fn get_value(&self, pos: Address) -> Value {
        let Some(cell) = self.cells.get(pos) else {
            return Value::Undefined;
        };

        let mut visited = BTreeMap::new();
        visited.insert(pos, true);
        if cell.has_cycle(&self.cells, &mut visited) {
            return Value::Undefined;
        }
        cell.evaluate(&self.cells)
    }

    /// Copy a `width` x `height` rectangle of cells from `src` to `dst`
    ///
    /// Relative reference axes in the copied formulas are translated by the
    /// displacement `dst - src`; absolute axes are preserved. A destination
    /// whose source cell is absent is erased.
    ///
    /// The copy is two-phase: all sources are snapshotted before the first
    /// destination write, so overlapping rectangles behave as if copied
    /// all at once.
    pub fn copy_rect(&mut self, dst: Address, src: Address, width: i64, height: i64) {
        let mut snapshot: BTreeMap<Address, Cell> = BTreeMap::new();
        for y in 0..height {
            for x in 0..width {
                let from = src.shift((x, y));
                if let Some(cell) = self.cells.get(from) {
                    snapshot.insert(from, cell.clone());
                }
            }
        }

        for y in 0..height {
            for x in 0..width {
                let from = src.shift((x, y));
                let to = dst.shift((x, y));

                let Some(source) = snapshot.get(&from) else {
                    self.cells.remove(to);
                    continue;
                };

                let displacement = (to.column - from.column, to.row - from.row);
                let expr = source.expr.as_ref().map(|e| {
                    let mut copy = e.clone_into(&mut self.cells);
                    copy.shift(displacement);
                    copy
                });

                let target = self.cells.ensure(to);
                target.expr = expr;
                target.is_formula = source.is_formula;
            }
        }
    }
}

impl Clone for Sheet {
    /// Cloning rebuilds every cell in the new sheet's table, so references in
    /// the copy resolve against the copy
    fn clone(&self) -> Self {
        let mut cells = CellTable::new();
        for (addr, cell) in self.cells.iter() {
            let expr = cell.expr.as_ref().map(|e| e.clone_into(&mut cells));
            let target = cells.ensure(*addr);
            target.expr = expr;
            target.is_formula = cell.is_formula;
        }
        Self { cells }
    }
}

impl fmt::Display for Sheet {
    /// One `ADDRESS:CONTENTS` line per non-empty cell, in address order
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (addr, cell) in self.cells.iter() {
            if cell.expr.is_some() {
                writeln!(f, "{}:{}", addr, cell)?;
            }
        }
        Ok(())
    }
}
