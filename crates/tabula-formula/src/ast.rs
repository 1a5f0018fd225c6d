//! Expression tree types
//!
//! Every occupied cell owns one tree of [`Expr`] nodes. Trees never point at
//! other trees: a [`CellRef`] stores only the target address and is resolved
//! against the owning [`CellTable`](crate::table::CellTable) at evaluation
//! time, which is what keeps cyclic dependency graphs free of ownership
//! cycles.

use crate::table::CellTable;
use std::fmt;
use tabula_core::Address;

/// Binary operators
///
/// Arithmetic and relational operators form one closed set; evaluation
/// dispatches on the operator, so a single node variant covers both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Relational
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl BinaryOperator {
    /// The operator's textual token
    pub fn token(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterEqual => ">=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}

/// A single-cell reference with per-axis absolute markers
///
/// An absolute axis keeps its coordinate across [`Expr::shift`] and renders
/// with a `$` prefix; a relative axis is translated by the displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    /// Address the reference resolves against
    pub target: Address,
    /// Column survives shifts ($A1 stays in column A)
    pub column_absolute: bool,
    /// Row survives shifts (A$1 stays in row 1)
    pub row_absolute: bool,
}

impl CellRef {
    /// Create a reference; both axes relative
    pub fn new(target: Address) -> Self {
        Self {
            target,
            column_absolute: false,
            row_absolute: false,
        }
    }

    /// Create a reference with explicit absolute markers
    pub fn with_absolute(target: Address, column_absolute: bool, row_absolute: bool) -> Self {
        Self {
            target,
            column_absolute,
            row_absolute,
        }
    }

    fn shift(&mut self, offset: (i64, i64)) {
        let (mut dc, mut dr) = offset;
        if self.column_absolute {
            dc = 0;
        }
        if self.row_absolute {
            dr = 0;
        }
        self.target = self.target.shift((dc, dr));
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.column_absolute {
            write!(f, "$")?;
        }
        write!(f, "{}", self.target.column_label())?;
        if self.row_absolute {
            write!(f, "$")?;
        }
        write!(f, "{}", self.target.row)
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),

    /// Text literal
    ///
    /// `quoted` marks literals that came from formula source; they serialize
    /// double-quoted with embedded quotes doubled, while plain cell text
    /// serializes verbatim.
    Text { value: String, quoted: bool },

    /// Single-cell reference
    Reference(CellRef),

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    /// Binary operation
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Translate every relative reference axis by a (columns, rows) displacement
    ///
    /// Literals are untouched; operators forward to their children.
    pub fn shift(&mut self, offset: (i64, i64)) {
        match self {
            Expr::Reference(r) => r.shift(offset),
            Expr::Unary { operand, .. } => operand.shift(offset),
            Expr::Binary { left, right, .. } => {
                left.shift(offset);
                right.shift(offset);
            }
            Expr::Number(_) | Expr::Text { .. } => {}
        }
    }

    /// Deep-copy this tree for installation into `dest`
    ///
    /// The copy is structurally independent. Every reference in the copy
    /// resolves against `dest`, and `dest` gets an empty cell at each
    /// referenced address so later lookups find an entry.
    pub fn clone_into(&self, dest: &mut CellTable) -> Expr {
        match self {
            Expr::Reference(r) => {
                dest.ensure(r.target);
                Expr::Reference(*r)
            }
            Expr::Unary { op, operand } => Expr::Unary {
                op: *op,
                operand: Box::new(Expr::clone_into(operand, dest)),
            },
            Expr::Binary { op, left, right } => Expr::Binary {
                op: *op,
                left: Box::new(Expr::clone_into(left, dest)),
                right: Box::new(Expr::clone_into(right, dest)),
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Text { value, quoted } => {
                if *quoted {
                    write!(f, "\"")?;
                    for c in value.chars() {
                        if c == '"' {
                            write!(f, "\"")?;
                        }
                        write!(f, "{}", c)?;
                    }
                    write!(f, "\"")
                } else {
                    write!(f, "{}", value)
                }
            }
            Expr::Reference(r) => write!(f, "{}", r),
            Expr::Unary {
                op: UnaryOperator::Negate,
                operand,
            } => write!(f, "(-{})", operand),
            Expr::Binary { op, left, right } => {
                write!(f, "({}{}{})", left, op.token(), right)
            }
        }
    }
}
