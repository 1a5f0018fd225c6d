//! Shift-reduce construction of expression trees
//!
//! The parser reports what it recognizes through the callback methods here;
//! the builder keeps a stack of partially built subtrees. Value callbacks
//! push a leaf, operator callbacks pop their operands and push the combined
//! node, and [`ExprBuilder::finish`] hands back the finished tree.

use crate::ast::{BinaryOperator, CellRef, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use tabula_core::Address;

/// A finished expression plus the addresses it references
///
/// The caller installs the tree into its table and creates an empty cell for
/// every referenced address, so a build that fails partway leaves the table
/// untouched.
#[derive(Debug)]
pub struct BuiltExpr {
    /// Root of the built tree
    pub expr: Expr,
    /// Every address referenced by the tree, in callback order
    pub referenced: Vec<Address>,
}

/// Stack-based expression builder driven by parser callbacks
#[derive(Debug)]
pub struct ExprBuilder {
    stack: Vec<Expr>,
    referenced: Vec<Address>,
    formula: bool,
}

impl ExprBuilder {
    /// Create a builder; `formula` marks text literals for quoted serialization
    pub fn new(formula: bool) -> Self {
        Self {
            stack: Vec::new(),
            referenced: Vec::new(),
            formula,
        }
    }

    fn pop(&mut self) -> FormulaResult<Expr> {
        self.stack.pop().ok_or(FormulaError::MissingOperand)
    }

    fn push_binary(&mut self, op: BinaryOperator) -> FormulaResult<()> {
        let right = self.pop()?;
        let left = self.pop()?;
        self.stack.push(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        });
        Ok(())
    }

    pub fn op_add(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::Add)
    }

    pub fn op_sub(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::Subtract)
    }

    /// Multiplication takes its operands off the stack in the opposite order
    /// from the other binary operators; the product is the same either way.
    pub fn op_mul(&mut self) -> FormulaResult<()> {
        let left = self.pop()?;
        let right = self.pop()?;
        self.stack.push(Expr::Binary {
            op: BinaryOperator::Multiply,
            left: Box::new(left),
            right: Box::new(right),
        });
        Ok(())
    }

    pub fn op_div(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::Divide)
    }

    pub fn op_pow(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::Power)
    }

    pub fn op_neg(&mut self) -> FormulaResult<()> {
        let operand = self.pop()?;
        self.stack.push(Expr::Unary {
            op: UnaryOperator::Negate,
            operand: Box::new(operand),
        });
        Ok(())
    }

    pub fn op_eq(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::Equal)
    }

    pub fn op_ne(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::NotEqual)
    }

    pub fn op_lt(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::LessThan)
    }

    pub fn op_le(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::LessEqual)
    }

    pub fn op_gt(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::GreaterThan)
    }

    pub fn op_ge(&mut self) -> FormulaResult<()> {
        self.push_binary(BinaryOperator::GreaterEqual)
    }

    /// Push a numeric literal
    pub fn val_number(&mut self, value: f64) {
        self.stack.push(Expr::Number(value));
    }

    /// Push a text literal
    pub fn val_string(&mut self, value: &str) {
        self.stack.push(Expr::Text {
            value: value.to_string(),
            quoted: self.formula,
        });
    }

    /// Push a cell reference given its source form, e.g. `A1`, `$A1`, `A$1`
    ///
    /// A `$` before the letters pins the column; a `$` before the digits pins
    /// the row. The referenced address is recorded for placeholder creation
    /// at install time.
    pub fn val_reference(&mut self, text: &str) -> FormulaResult<()> {
        let mut rest = text;

        let column_absolute = if let Some(stripped) = rest.strip_prefix('$') {
            rest = stripped;
            true
        } else {
            false
        };

        let letters_len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        let (letters, mut digits) = rest.split_at(letters_len);

        let row_absolute = if let Some(stripped) = digits.strip_prefix('$') {
            digits = stripped;
            true
        } else {
            false
        };

        let target = Address::parse(&format!("{}{}", letters, digits))?;
        self.referenced.push(target);
        self.stack.push(Expr::Reference(CellRef::with_absolute(
            target,
            column_absolute,
            row_absolute,
        )));
        Ok(())
    }

    /// Range references are recognized but not materialized
    pub fn val_range(&mut self, _text: &str) {}

    /// Function calls are recognized but not materialized
    pub fn func_call(&mut self, _name: &str, _arity: usize) {}

    /// Take the finished tree off the stack
    ///
    /// Fails when no tree was built or when operands are left over.
    pub fn finish(mut self) -> FormulaResult<BuiltExpr> {
        let expr = self.pop()?;
        if !self.stack.is_empty() {
            return Err(FormulaError::DanglingOperand);
        }
        Ok(BuiltExpr {
            expr,
            referenced: self.referenced,
        })
    }
}
