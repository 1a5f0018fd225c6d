//! Basic usage: literals, formulas, copies and persistence

use tabula::prelude::*;

fn main() -> Result<()> {
    let mut sheet = Sheet::new();

    // A small price table
    sheet.set_cell("A1".parse()?, "apples")?;
    sheet.set_cell("B1".parse()?, "3")?;
    sheet.set_cell("C1".parse()?, "=B1*$E$1")?;
    sheet.set_cell("A2".parse()?, "pears")?;
    sheet.set_cell("B2".parse()?, "5")?;
    sheet.set_cell("E1".parse()?, "1.25")?;

    // Fill the price formula down: B1 becomes B2, $E$1 stays put
    sheet.copy_rect("C2".parse()?, "C1".parse()?, 1, 1);

    println!("{}", sheet);
    println!("apples cost {}", sheet.get_value("C1".parse()?));
    println!("pears cost {}", sheet.get_value("C2".parse()?));

    // Round-trip through the stream format
    let mut bytes = Vec::new();
    sheet.save(&mut bytes)?;
    let mut restored = Sheet::new();
    restored.load(&mut bytes.as_slice())?;
    assert_eq!(
        restored.get_value("C2".parse()?),
        sheet.get_value("C2".parse()?)
    );

    Ok(())
}
