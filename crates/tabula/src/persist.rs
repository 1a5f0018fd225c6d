//! Stream persistence
//!
//! A sheet serializes to an ASCII stream framed by control characters:
//!
//! ```text
//! stream ::= '{' US (entry US)* '}'
//! entry  ::= ADDRESS RS ':' RS CONTENTS
//! ```
//!
//! with `US = 0x1F` (unit separator) between records and `RS = 0x1E` (record
//! separator) between the fields of an entry. `ADDRESS` is the bare
//! `LETTERS DIGITS` form and `CONTENTS` is the cell's serialized source
//! (see [`Cell`](tabula_formula::Cell)'s `Display`). Cells holding no
//! expression are skipped; they are indistinguishable from absent cells.

use crate::error::{Error, Result};
use crate::sheet::Sheet;
use std::io::{Read, Write};
use tabula_core::Address;

/// Separator between entries
const UNIT_SEP: u8 = 0x1f;
/// Separator between the fields of an entry
const RECORD_SEP: u8 = 0x1e;

impl Sheet {
    /// Serialize the sheet to a writer
    pub fn save<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(&[b'{', UNIT_SEP])?;

        for (addr, cell) in self.cells().iter() {
            if cell.expr.is_none() {
                continue;
            }
            write!(out, "{}", addr)?;
            out.write_all(&[RECORD_SEP, b':', RECORD_SEP])?;
            write!(out, "{}", cell)?;
            out.write_all(&[UNIT_SEP])?;
        }

        out.write_all(b"}")?;
        Ok(())
    }

    /// Read entries from a reader into this sheet
    ///
    /// Every entry is applied through [`Sheet::set_cell`]. A malformed entry
    /// or missing delimiter fails the load and may leave the sheet partially
    /// populated; callers should load into a fresh sheet and discard it on
    /// error.
    pub fn load<R: Read>(&mut self, input: &mut R) -> Result<()> {
        let mut buf = Vec::new();
        input.read_to_end(&mut buf)?;
        let mut stream = StreamReader::new(&buf);

        stream.expect(b'{')?;
        stream.expect(UNIT_SEP)?;

        while stream.peek() != Some(b'}') {
            let addr = stream.take_until(RECORD_SEP)?;
            stream.expect(b':')?;
            stream.expect(RECORD_SEP)?;
            let contents = stream.take_until(UNIT_SEP)?;

            let addr: Address = std::str::from_utf8(addr)
                .map_err(|_| Error::Format("address is not valid UTF-8".into()))?
                .parse()
                .map_err(Error::Address)?;
            let contents = std::str::from_utf8(contents)
                .map_err(|_| Error::Format("cell contents are not valid UTF-8".into()))?;
            self.set_cell(addr, contents)?;
        }

        Ok(())
    }
}

struct StreamReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> StreamReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(Error::Format(format!(
                "expected byte {:#04x}, found {:#04x}",
                byte, b
            ))),
            None => Err(Error::Format("unexpected end of stream".into())),
        }
    }

    fn take_until(&mut self, delim: u8) -> Result<&'a [u8]> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == delim {
                let field = &self.bytes[start..self.pos];
                self.pos += 1;
                return Ok(field);
            }
            self.pos += 1;
        }
        Err(Error::Format("unexpected end of stream".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::Value;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_save_framing() {
        let mut sheet = Sheet::new();
        sheet.set_cell(addr("A1"), "10").unwrap();
        sheet.set_cell(addr("B2"), "=A1+1").unwrap();

        let mut out = Vec::new();
        sheet.save(&mut out).unwrap();

        let expected = [
            b"{\x1f".as_slice(),
            b"A1\x1e:\x1e10\x1f",
            b"B2\x1e:\x1e=(A1+1)\x1f",
            b"}",
        ]
        .concat();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_empty_sheet_round_trips() {
        let sheet = Sheet::new();
        let mut out = Vec::new();
        sheet.save(&mut out).unwrap();
        assert_eq!(out, b"{\x1f}");

        let mut loaded = Sheet::new();
        loaded.load(&mut out.as_slice()).unwrap();
        assert!(loaded.cells().is_empty());
    }

    #[test]
    fn test_placeholder_cells_are_not_saved() {
        let mut sheet = Sheet::new();
        // References create empty placeholders at B1 and C1
        sheet.set_cell(addr("A1"), "=B1+C1").unwrap();

        let mut out = Vec::new();
        sheet.save(&mut out).unwrap();

        let mut loaded = Sheet::new();
        loaded.load(&mut out.as_slice()).unwrap();
        assert_eq!(loaded.get_value(addr("A1")), Value::Undefined);
        assert_eq!(loaded.get_value(addr("B1")), Value::Undefined);
    }

    #[test]
    fn test_load_rejects_malformed_streams() {
        let cases: &[&[u8]] = &[
            b"",
            b"{",
            b"[\x1f}",
            b"{\x1fA1\x1e:\x1e10\x1f", // missing closing brace
            b"{\x1fA1\x1e;\x1e10\x1f}", // wrong field separator
            b"{\x1fA1:10\x1f}",
            b"{\x1f!!\x1e:\x1e10\x1f}", // bad address
            b"{\x1fA1\x1e:\x1e=1+\x1f}", // bad formula
        ];

        for case in cases {
            let mut sheet = Sheet::new();
            assert!(sheet.load(&mut &case[..]).is_err(), "{:?}", case);
        }
    }

    #[test]
    fn test_load_applies_entries() {
        let stream = b"{\x1fA1\x1e:\x1e5\x1fA2\x1e:\x1e=A1*3\x1f}";
        let mut sheet = Sheet::new();
        sheet.load(&mut &stream[..]).unwrap();

        assert_eq!(sheet.get_value(addr("A1")), Value::Number(5.0));
        assert_eq!(sheet.get_value(addr("A2")), Value::Number(15.0));
    }
}
