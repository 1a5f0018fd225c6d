//! Expression evaluation and cycle detection
//!
//! Evaluation walks the tree and resolves references by table lookup. It
//! never guards against cycles itself; callers run [`has_cycle`] first
//! (seeded with the address being queried) and skip evaluation when it
//! reports one.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::table::CellTable;
use std::collections::BTreeMap;
use tabula_core::{Address, Value};

/// Evaluate an expression against a cell table
///
/// Mixed-type semantics:
/// - `+` adds numbers and concatenates as soon as either side is text
///   (numbers render with the general `{}` formatting)
/// - `-`, `*`, `/`, `^` require two numbers; `/` by exactly `0.0` is
///   undefined
/// - relational operators compare two numbers or two texts and yield `1.0`
///   or `0.0`; mismatched or undefined operands yield undefined
pub fn evaluate(expr: &Expr, cells: &CellTable) -> Value {
    match expr {
        Expr::Number(n) => Value::Number(*n),
        Expr::Text { value, .. } => Value::Text(value.clone()),
        Expr::Reference(r) => match cells.get(r.target) {
            Some(cell) => cell.evaluate(cells),
            None => Value::Undefined,
        },
        Expr::Unary {
            op: UnaryOperator::Negate,
            operand,
        } => match evaluate(operand, cells) {
            Value::Number(n) => Value::Number(-n),
            _ => Value::Undefined,
        },
        Expr::Binary { op, left, right } => {
            let left = evaluate(left, cells);
            let right = evaluate(right, cells);
            evaluate_binary(*op, left, right)
        }
    }
}

fn evaluate_binary(op: BinaryOperator, left: Value, right: Value) -> Value {
    use BinaryOperator::*;

    match op {
        Add => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Value::Number(l + r),
            (Value::Text(l), Value::Text(r)) => Value::Text(l + &r),
            (Value::Number(l), Value::Text(r)) => Value::Text(format!("{}{}", l, r)),
            (Value::Text(l), Value::Number(r)) => Value::Text(format!("{}{}", l, r)),
            _ => Value::Undefined,
        },
        Subtract | Multiply | Divide | Power => match (left, right) {
            (Value::Number(l), Value::Number(r)) => match op {
                Subtract => Value::Number(l - r),
                Multiply => Value::Number(l * r),
                Divide => {
                    if r == 0.0 {
                        Value::Undefined
                    } else {
                        Value::Number(l / r)
                    }
                }
                Power => Value::Number(l.powf(r)),
                _ => unreachable!(),
            },
            _ => Value::Undefined,
        },
        Equal | NotEqual | LessThan | LessEqual | GreaterThan | GreaterEqual => {
            match (left, right) {
                (Value::Number(l), Value::Number(r)) => relational(op, l, r),
                (Value::Text(l), Value::Text(r)) => relational(op, l.as_str(), r.as_str()),
                _ => Value::Undefined,
            }
        }
    }
}

fn relational<T: PartialOrd>(op: BinaryOperator, left: T, right: T) -> Value {
    let holds = match op {
        BinaryOperator::Equal => left == right,
        BinaryOperator::NotEqual => left != right,
        BinaryOperator::LessThan => left < right,
        BinaryOperator::LessEqual => left <= right,
        BinaryOperator::GreaterThan => left > right,
        BinaryOperator::GreaterEqual => left >= right,
        _ => unreachable!(),
    };
    Value::Number(if holds { 1.0 } else { 0.0 })
}

/// Check an expression tree for reference cycles
///
/// DFS coloring keyed by address: entering a reference whose target is
/// already marked reports a cycle; a clean return unmarks the target, so the
/// same cell may appear again along a sibling branch. Callers seed `visited`
/// with the address under query so self-references are caught.
pub fn has_cycle(expr: &Expr, cells: &CellTable, visited: &mut BTreeMap<Address, bool>) -> bool {
    match expr {
        Expr::Reference(r) => {
            if visited.get(&r.target).copied().unwrap_or(false) {
                return true;
            }
            visited.insert(r.target, true);

            let detected = match cells.get(r.target) {
                Some(cell) => cell.has_cycle(cells, visited),
                None => false,
            };

            if !detected {
                visited.insert(r.target, false);
            }
            detected
        }
        Expr::Unary { operand, .. } => has_cycle(operand, cells, visited),
        Expr::Binary { left, right, .. } => {
            has_cycle(left, cells, visited) || has_cycle(right, cells, visited)
        }
        Expr::Number(_) | Expr::Text { .. } => false,
    }
}
