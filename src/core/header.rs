use chrono::NaiveDate;
use serde::Serialize;

use super::currencies::Currency;
use super::error::ValidationError;
use super::logo::{Logo, LogoSlot};

/// Date format produced by HTML date inputs and used on the document.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Invoice-level metadata shown above the line items.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceHeader {
    /// Supplier name, address and contact details (free text, may span lines).
    pub supplier: String,
    /// Client name, address and contact details (free text, may span lines).
    pub client: String,
    /// Invoice number as entered; may be blank.
    pub invoice_number: String,
    /// Issue date.
    pub issue_date: Option<NaiveDate>,
    /// Currency used to label amounts.
    pub currency: Currency,
    /// Company logo and pending uploads.
    #[serde(skip)]
    pub logo: LogoSlot,
}

impl InvoiceHeader {
    /// Issue date in display form, or `""` when unset.
    pub fn issue_date_display(&self) -> String {
        self.issue_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Set the issue date from user input. Blank input clears the date.
    pub fn set_issue_date_str(&mut self, input: &str) -> Result<(), ValidationError> {
        self.issue_date = parse_issue_date(input)?;
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date; blank input yields `None`.
pub fn parse_issue_date(input: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(Some)
        .map_err(|e| {
            ValidationError::new(
                "header.issue_date",
                format!("'{input}' is not a YYYY-MM-DD date: {e}"),
            )
        })
}

/// Builder for [`InvoiceHeader`].
///
/// ```
/// use tabfaktura::core::*;
/// use chrono::NaiveDate;
///
/// let header = InvoiceHeaderBuilder::new("INV-001")
///     .supplier("ACME Ltd\nNairobi")
///     .client("Kunde AG")
///     .issue_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .currency(Currency::Kes)
///     .build();
/// assert_eq!(header.issue_date_display(), "2024-06-15");
/// ```
pub struct InvoiceHeaderBuilder {
    invoice_number: String,
    supplier: String,
    client: String,
    issue_date: Option<NaiveDate>,
    currency: Currency,
    logo: Option<Logo>,
}

impl InvoiceHeaderBuilder {
    pub fn new(invoice_number: impl Into<String>) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            supplier: String::new(),
            client: String::new(),
            issue_date: None,
            currency: Currency::default(),
            logo: None,
        }
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }

    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    pub fn issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn logo(mut self, logo: Logo) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn build(self) -> InvoiceHeader {
        let mut slot = LogoSlot::default();
        if let Some(logo) = self.logo {
            slot.set(logo);
        }
        InvoiceHeader {
            supplier: self.supplier,
            client: self.client,
            invoice_number: self.invoice_number,
            issue_date: self.issue_date,
            currency: self.currency,
            logo: slot,
        }
    }
}
