//! Immutable, fully resolved view of an invoice handed to renderers.

use serde::Serialize;

use super::currencies::Currency;
use super::header::InvoiceHeader;
use super::logo::Logo;
use super::schema::ColumnDef;
use super::table::LineTable;
use super::totals::TotalCalculator;

/// Default extension of the suggested document file name.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// `invoice_<number>.<extension>`, with `unnamed` standing in for a blank
/// number and path-hostile characters replaced by `_`.
pub fn document_file_name(invoice_number: &str, extension: &str) -> String {
    let number = invoice_number.trim();
    let stem = if number.is_empty() { "unnamed" } else { number };
    let stem: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("invoice_{stem}.{extension}")
}

/// One table row in display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRow {
    cells: Vec<String>,
    total: String,
}

impl SnapshotRow {
    /// Cell values in column order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Currency-prefixed row total.
    pub fn total(&self) -> &str {
        &self.total
    }
}

/// Everything a renderer needs, already formatted.
///
/// The snapshot owns copies of all data; later edits to the session never
/// change a snapshot that has already been built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceSnapshot {
    supplier: String,
    client: String,
    invoice_number: String,
    issue_date: String,
    currency: Currency,
    logo: Option<Logo>,
    columns: Vec<ColumnDef>,
    rows: Vec<SnapshotRow>,
    grand_total: String,
}

/// Assemble a snapshot from header and table.
///
/// Pure: reads its inputs and returns a new value.
pub fn build_snapshot(
    header: &InvoiceHeader,
    table: &LineTable,
    calculator: &TotalCalculator,
) -> InvoiceSnapshot {
    let currency = header.currency;
    let columns = table.columns().to_vec();
    let totals = calculator.totals(table.rows());

    let rows = table
        .rows()
        .iter()
        .zip(&totals.row_totals)
        .map(|(row, amount)| SnapshotRow {
            cells: columns
                .iter()
                .map(|c| row.value_or_empty(&c.key).to_string())
                .collect(),
            total: currency.label_checked(*amount),
        })
        .collect();

    InvoiceSnapshot {
        supplier: header.supplier.clone(),
        client: header.client.clone(),
        invoice_number: header.invoice_number.clone(),
        issue_date: header.issue_date_display(),
        currency,
        logo: header.logo.current().cloned(),
        columns,
        rows,
        grand_total: currency.label_checked(totals.grand_total),
    }
}

impl InvoiceSnapshot {
    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    /// Issue date as `YYYY-MM-DD`, or `""`.
    pub fn issue_date(&self) -> &str {
        &self.issue_date
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn logo(&self) -> Option<&Logo> {
        self.logo.as_ref()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    /// Currency-prefixed grand total.
    pub fn grand_total(&self) -> &str {
        &self.grand_total
    }

    /// Suggested file name: `invoice_<number>.pdf`, or `invoice_unnamed.pdf`
    /// when the number is blank.
    pub fn file_name(&self) -> String {
        self.file_name_with_extension(DEFAULT_EXTENSION)
    }

    pub fn file_name_with_extension(&self, extension: &str) -> String {
        document_file_name(&self.invoice_number, extension)
    }

    /// Serialise to pretty-printed JSON.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnSchema, InvoiceHeaderBuilder};

    fn table() -> LineTable {
        let mut t = LineTable::new(
            ColumnSchema::new(vec![
                ColumnDef::new("description", "Item"),
                ColumnDef::new("quantity", "Quantity"),
                ColumnDef::new("price", "Unit Price"),
            ])
            .unwrap(),
        );
        t.set_field(0, "description", "Widget");
        t.set_field(0, "quantity", "3");
        t.set_field(0, "price", "2.5");
        t
    }

    #[test]
    fn cells_follow_column_order() {
        let header = InvoiceHeaderBuilder::new("INV-7").currency(Currency::Eur).build();
        let snap = build_snapshot(&header, &table(), &TotalCalculator::default());
        assert_eq!(snap.rows()[0].cells(), ["Widget", "3", "2.5"]);
        assert_eq!(snap.rows()[0].total(), "€7.50");
        assert_eq!(snap.grand_total(), "€7.50");
    }

    #[test]
    fn file_name_falls_back_to_unnamed() {
        let header = InvoiceHeaderBuilder::new("  ").build();
        let snap = build_snapshot(&header, &table(), &TotalCalculator::default());
        assert_eq!(snap.file_name(), "invoice_unnamed.pdf");

        let header = InvoiceHeaderBuilder::new("INV/2024/1").build();
        let snap = build_snapshot(&header, &table(), &TotalCalculator::default());
        assert_eq!(snap.file_name(), "invoice_INV_2024_1.pdf");
        assert_eq!(snap.file_name_with_extension("csv"), "invoice_INV_2024_1.csv");
    }
}
