//! # Debug Serialization
//!
//! Human-auditable renderings of a row: the parenthesized debug form
//! (`Display`, e.g. `(42, "bob", NULL)`) and the CSV form
//! (`to_csv_row`, e.g. `42,"bob",`). Both delegate per-cell formatting to
//! the column definition and run under a redaction-disabled scope: a
//! caller stringifying a row explicitly wants real values, and the prior
//! ambient policy is restored on every exit path.
//!
//! ## Stable conventions
//!
//! - NULL renders as `NULL` in the debug form and as an empty field in
//!   CSV.
//! - Strings and binary are double-quoted with C-style escaping (`\n`,
//!   `\r`, `\t`, `\\`, `\"`, `\xNN` for other non-printables); CSV
//!   additionally doubles embedded double quotes instead of
//!   backslash-escaping them.
//! - Booleans render `true`/`false`; timestamps and dates render their
//!   raw integer representation; decimals render scaled (unscaled 12345
//!   at scale 2 → `123.45`).
//! - A cell whose bytes cannot be decoded renders as `<corrupt>` rather
//!   than failing the whole row.

use std::fmt;

use crate::cell::{self, CellType};
use crate::error::Result;
use crate::redact::{REDACTED_TOKEN, ScopedDisableRedaction, redaction_enabled};
use crate::types::{ColumnDef, DataType};
use crate::view::{RowCell, RowView};

/// Token rendered for NULL cells in the debug form.
pub const NULL_TOKEN: &str = "NULL";

/// Marker rendered for cells whose bytes cannot be decoded.
pub const CORRUPT_TOKEN: &str = "<corrupt>";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Form {
    Debug,
    Csv,
}

impl fmt::Display for RowView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let _no_redaction = ScopedDisableRedaction::new();

        let mut out = String::new();
        out.push('(');
        for (idx, col) in self.schema().columns().iter().enumerate() {
            if idx > 0 {
                out.push_str(", ");
            }
            col.debug_cell_append(&self.cell(idx), &mut out);
        }
        out.push(')');
        f.write_str(&out)
    }
}

impl RowView<'_> {
    /// Appends the row as a CSV record (fields joined by `,`, no
    /// enclosing parentheses).
    pub fn append_csv_row(&self, out: &mut String) {
        let _no_redaction = ScopedDisableRedaction::new();

        for (idx, col) in self.schema().columns().iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }
            col.csv_cell_append(&self.cell(idx), out);
        }
    }

    pub fn to_csv_row(&self) -> String {
        let mut out = String::new();
        self.append_csv_row(&mut out);
        out
    }
}

impl ColumnDef {
    /// Appends this column's debug rendering of one cell.
    ///
    /// Honors the ambient redaction policy and never fails; undecodable
    /// cells render as [`CORRUPT_TOKEN`].
    pub fn debug_cell_append(&self, cell: &RowCell<'_>, out: &mut String) {
        if cell.is_null() {
            out.push_str(NULL_TOKEN);
            return;
        }
        if redaction_enabled() {
            out.push_str(REDACTED_TOKEN);
            return;
        }
        if self.append_value(cell, out, Form::Debug).is_err() {
            out.push_str(CORRUPT_TOKEN);
        }
    }

    /// Appends this column's CSV rendering of one cell (NULL is an empty
    /// field).
    pub fn csv_cell_append(&self, cell: &RowCell<'_>, out: &mut String) {
        if cell.is_null() {
            return;
        }
        if redaction_enabled() {
            out.push_str(REDACTED_TOKEN);
            return;
        }
        if self.append_value(cell, out, Form::Csv).is_err() {
            out.push_str(CORRUPT_TOKEN);
        }
    }

    /// Decodes and appends one cell value. Decoding happens before any
    /// output, so a failed cell appends nothing.
    fn append_value(&self, cell: &RowCell<'_>, out: &mut String, form: Form) -> Result<()> {
        let raw = cell.raw();
        let indirect = cell.indirect();
        let name = self.name();

        match self.data_type() {
            DataType::Bool => {
                let v = cell::Bool::decode(raw, indirect, name)?;
                out.push_str(if v { "true" } else { "false" });
            }
            DataType::IsDeleted => {
                let v = cell::IsDeleted::decode(raw, indirect, name)?;
                out.push_str(if v { "true" } else { "false" });
            }
            DataType::Int8 => {
                let v = cell::Int8::decode(raw, indirect, name)?;
                out.push_str(&v.to_string());
            }
            DataType::Int16 => {
                let v = cell::Int16::decode(raw, indirect, name)?;
                out.push_str(&v.to_string());
            }
            DataType::Int32 => {
                let v = cell::Int32::decode(raw, indirect, name)?;
                out.push_str(&v.to_string());
            }
            DataType::Int64 => {
                let v = cell::Int64::decode(raw, indirect, name)?;
                out.push_str(&v.to_string());
            }
            DataType::Float32 => {
                let v = cell::Float::decode(raw, indirect, name)?;
                out.push_str(&v.to_string());
            }
            DataType::Float64 => {
                let v = cell::Double::decode(raw, indirect, name)?;
                out.push_str(&v.to_string());
            }
            DataType::TimestampMicros => {
                let v = cell::TimestampMicros::decode(raw, indirect, name)?;
                out.push_str(&v.to_string());
            }
            DataType::Date => {
                let v = cell::Date::decode(raw, indirect, name)?;
                out.push_str(&v.to_string());
            }
            DataType::Decimal32 => {
                let v = cell::Decimal32::decode(raw, indirect, name)?;
                append_decimal(i128::from(v), self.scale(), out);
            }
            DataType::Decimal64 => {
                let v = cell::Decimal64::decode(raw, indirect, name)?;
                append_decimal(i128::from(v), self.scale(), out);
            }
            DataType::Decimal128 => {
                let v = cell::Decimal128::decode(raw, indirect, name)?;
                append_decimal(v, self.scale(), out);
            }
            DataType::Text => {
                let v = cell::Text::decode(raw, indirect, name)?;
                append_quoted_str(v, out, form);
            }
            DataType::Varchar => {
                let v = cell::Varchar::decode(raw, indirect, name)?;
                append_quoted_str(v, out, form);
            }
            DataType::Binary => {
                let v = cell::Binary::decode(raw, indirect, name)?;
                append_quoted_bytes(v, out, form);
            }
        }
        Ok(())
    }
}

/// Renders an unscaled decimal with its declared scale applied.
fn append_decimal(unscaled: i128, scale: u8, out: &mut String) {
    if scale == 0 {
        out.push_str(&unscaled.to_string());
        return;
    }

    if unscaled < 0 {
        out.push('-');
    }
    let digits = unscaled.unsigned_abs().to_string();
    let scale = scale as usize;
    if digits.len() <= scale {
        out.push_str("0.");
        for _ in 0..scale - digits.len() {
            out.push('0');
        }
        out.push_str(&digits);
    } else {
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    }
}

fn append_quoted_str(value: &str, out: &mut String, form: Form) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' if form == Form::Csv => out.push_str("\"\""),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn append_quoted_bytes(value: &[u8], out: &mut String, form: Form) {
    out.push('"');
    for &b in value {
        match b {
            b'"' if form == Form::Csv => out.push_str("\"\""),
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_rendering_applies_scale() {
        let mut out = String::new();
        append_decimal(12345, 2, &mut out);
        assert_eq!(out, "123.45");

        out.clear();
        append_decimal(-12345, 2, &mut out);
        assert_eq!(out, "-123.45");

        out.clear();
        append_decimal(5, 3, &mut out);
        assert_eq!(out, "0.005");

        out.clear();
        append_decimal(-5, 3, &mut out);
        assert_eq!(out, "-0.005");

        out.clear();
        append_decimal(42, 0, &mut out);
        assert_eq!(out, "42");
    }

    #[test]
    fn string_escaping_debug_vs_csv() {
        let mut out = String::new();
        append_quoted_str("a\"b\\c\nd", &mut out, Form::Debug);
        assert_eq!(out, "\"a\\\"b\\\\c\\nd\"");

        out.clear();
        append_quoted_str("a\"b", &mut out, Form::Csv);
        assert_eq!(out, "\"a\"\"b\"");
    }

    #[test]
    fn binary_escaping_hexes_non_printables() {
        let mut out = String::new();
        append_quoted_bytes(&[0x41, 0x00, 0xff], &mut out, Form::Debug);
        assert_eq!(out, "\"A\\x00\\xff\"");
    }
}
