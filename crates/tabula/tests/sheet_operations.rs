//! Tests for sheet editing and evaluation

use tabula::prelude::*;

fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

#[test]
fn test_sum_of_references() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "=10").unwrap();
    sheet.set_cell(addr("A2"), "=20").unwrap();
    sheet.set_cell(addr("A3"), "=A1+A2").unwrap();

    assert_eq!(sheet.get_value(addr("A3")), Value::Number(30.0));
}

#[test]
fn test_text_concatenation() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("B1"), "hello ").unwrap();
    sheet.set_cell(addr("B2"), "=B1+\"world\"").unwrap();

    assert_eq!(
        sheet.get_value(addr("B2")),
        Value::Text("hello world".into())
    );
}

#[test]
fn test_number_text_concatenation() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "=10").unwrap();
    sheet.set_cell(addr("B1"), "=\"n = \"+A1").unwrap();
    sheet.set_cell(addr("B2"), "=A1+\" items\"").unwrap();

    assert_eq!(sheet.get_value(addr("B1")), Value::Text("n = 10".into()));
    assert_eq!(sheet.get_value(addr("B2")), Value::Text("10 items".into()));
}

#[test]
fn test_division_by_zero() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("C1"), "=1/0").unwrap();
    sheet.set_cell(addr("C2"), "=0").unwrap();
    sheet.set_cell(addr("C3"), "=5/C2").unwrap();

    assert_eq!(sheet.get_value(addr("C1")), Value::Undefined);
    assert_eq!(sheet.get_value(addr("C3")), Value::Undefined);
}

#[test]
fn test_arithmetic_on_text_is_undefined() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "word").unwrap();
    sheet.set_cell(addr("A2"), "=A1*2").unwrap();
    sheet.set_cell(addr("A3"), "=A1-A1").unwrap();
    sheet.set_cell(addr("A4"), "=-A1").unwrap();

    assert_eq!(sheet.get_value(addr("A2")), Value::Undefined);
    assert_eq!(sheet.get_value(addr("A3")), Value::Undefined);
    assert_eq!(sheet.get_value(addr("A4")), Value::Undefined);
}

#[test]
fn test_undefined_propagates() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "=Z99").unwrap();
    sheet.set_cell(addr("A2"), "=A1+1").unwrap();

    assert_eq!(sheet.get_value(addr("A1")), Value::Undefined);
    assert_eq!(sheet.get_value(addr("A2")), Value::Undefined);
}

#[test]
fn test_relational_operators() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "=3").unwrap();
    sheet.set_cell(addr("A2"), "=7").unwrap();
    sheet.set_cell(addr("B1"), "=A1<A2").unwrap();
    sheet.set_cell(addr("B2"), "=A1=A2").unwrap();
    sheet.set_cell(addr("B3"), "=\"abc\"<\"abd\"").unwrap();
    sheet.set_cell(addr("B4"), "=A1<\"abc\"").unwrap();

    assert_eq!(sheet.get_value(addr("B1")), Value::Number(1.0));
    assert_eq!(sheet.get_value(addr("B2")), Value::Number(0.0));
    assert_eq!(sheet.get_value(addr("B3")), Value::Number(1.0));
    assert_eq!(sheet.get_value(addr("B4")), Value::Undefined);
}

#[test]
fn test_self_reference_cycle() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "=A1").unwrap();

    assert_eq!(sheet.get_value(addr("A1")), Value::Undefined);
}

#[test]
fn test_mutual_cycle() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("D1"), "=D2").unwrap();
    sheet.set_cell(addr("D2"), "=D1").unwrap();

    assert_eq!(sheet.get_value(addr("D1")), Value::Undefined);
    assert_eq!(sheet.get_value(addr("D2")), Value::Undefined);
}

#[test]
fn test_longer_cycle() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "=B1+1").unwrap();
    sheet.set_cell(addr("B1"), "=C1*2").unwrap();
    sheet.set_cell(addr("C1"), "=A1").unwrap();

    for cell in ["A1", "B1", "C1"] {
        assert_eq!(sheet.get_value(addr(cell)), Value::Undefined);
    }
}

#[test]
fn test_cycle_definition_stays_queryable() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "=A1").unwrap();
    assert_eq!(sheet.get_value(addr("A1")), Value::Undefined);

    // Breaking the cycle makes the cell readable again
    sheet.set_cell(addr("A1"), "=1+1").unwrap();
    assert_eq!(sheet.get_value(addr("A1")), Value::Number(2.0));
}

#[test]
fn test_diamond_dependency_is_fine() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "=1").unwrap();
    sheet.set_cell(addr("B1"), "=A1+A1").unwrap();
    sheet.set_cell(addr("C1"), "=B1+A1").unwrap();

    assert_eq!(sheet.get_value(addr("C1")), Value::Number(3.0));
}

#[test]
fn test_deep_reference_chain() {
    let mut sheet = Sheet::new();
    sheet.set_cell(addr("A1"), "=1").unwrap();
    for row in 2..=60 {
        let pos = format!("A{}", row);
        let formula = format!("=A{}+1", row - 1);
        sheet.set_cell(addr(&pos), &formula).unwrap();
    }

    assert_eq!(sheet.get_value(addr("A60")), Value::Number(60.0));
}

#[test]
fn test_formula_parse_errors_are_reported() {
    let mut sheet = Sheet::new();
    for bad in ["=", "=1+", "=(1", "=A1:B2", "=SUM(A1,A2)", "=@"] {
        assert!(sheet.set_cell(addr("A1"), bad).is_err(), "{:?}", bad);
    }

    // Nothing was installed
    assert_eq!(sheet.get_value(addr("A1")), Value::Undefined);
}

#[test]
fn test_capabilities_bit() {
    assert_ne!(Sheet::capabilities() & CAP_CYCLIC_DEPS, 0);
}
