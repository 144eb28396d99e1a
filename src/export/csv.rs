//! Line-item table as CSV.
//!
//! One header line (column labels plus `Total`), one line per row, and a final
//! grand-total line. Every field is quoted; lines end in CRLF.

use super::{RenderError, Renderer};
use crate::core::InvoiceSnapshot;

/// Renders the table part of a snapshot as delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvRenderer {
    delimiter: char,
}

impl Default for CsvRenderer {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvRenderer {
    /// Use `delimiter` instead of a comma (e.g. `;` for German spreadsheets).
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn to_csv_string(&self, snapshot: &InvoiceSnapshot) -> Result<String, RenderError> {
        if self.delimiter == '"' || self.delimiter == '\r' || self.delimiter == '\n' {
            return Err(RenderError::Unsupported(format!(
                "{:?} cannot be used as a delimiter",
                self.delimiter
            )));
        }

        let mut out = String::new();
        let labels = snapshot.columns().iter().map(|c| c.label.as_str());
        self.write_line(&mut out, labels.chain(["Total"]));

        for row in snapshot.rows() {
            let cells = row.cells().iter().map(String::as_str);
            self.write_line(&mut out, cells.chain([row.total()]));
        }

        // grand total sits under the Total column
        let padding = std::iter::repeat_n("", snapshot.columns().len().saturating_sub(1));
        self.write_line(
            &mut out,
            padding.chain(["Grand Total", snapshot.grand_total()]),
        );
        Ok(out)
    }

    fn write_line<'a>(&self, out: &mut String, fields: impl Iterator<Item = &'a str>) {
        for (i, field) in fields.enumerate() {
            if i > 0 {
                out.push(self.delimiter);
            }
            csv_field_str(out, field);
        }
        out.push_str("\r\n");
    }
}

impl Renderer for CsvRenderer {
    fn extension(&self) -> &str {
        "csv"
    }

    fn render(&self, snapshot: &InvoiceSnapshot) -> Result<Vec<u8>, RenderError> {
        self.to_csv_string(snapshot).map(String::into_bytes)
    }
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}
