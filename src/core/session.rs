//! One editing session: header, line table and the commands that change them.

use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use super::config::SessionConfig;
use super::currencies::Currency;
use super::error::{InvoiceError, ValidationError};
use super::header::{InvoiceHeader, parse_issue_date};
use super::logo::{Logo, UploadTicket};
use super::schema::ColumnSchema;
use super::snapshot::{InvoiceSnapshot, build_snapshot, document_file_name};
use super::table::{Confirm, LineTable};
use super::totals::{TotalCalculator, Totals};
use crate::export::{ExportNotice, RenderedDocument, Renderer, export_with};

/// A single user action against the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetSupplier(String),
    SetClient(String),
    SetInvoiceNumber(String),
    /// Issue date as `YYYY-MM-DD`; blank clears it.
    SetIssueDate(String),
    SetCurrency(Currency),
    AddColumn {
        key: String,
        label: String,
    },
    /// Destructive; needs confirmation.
    RemoveColumn {
        key: String,
    },
    RenameColumn {
        key: String,
        label: String,
    },
    AddRow,
    /// Destructive; needs confirmation.
    RemoveRow {
        index: usize,
    },
    SetField {
        index: usize,
        key: String,
        value: String,
    },
    SetLogo(Logo),
    ClearLogo,
}

/// What an accepted command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A cell write addressed a row or column that does not exist.
    Ignored,
}

/// Owns the whole editable model for one document.
#[derive(Debug, Clone)]
pub struct InvoiceSession {
    config: SessionConfig,
    calculator: TotalCalculator,
    header: InvoiceHeader,
    table: LineTable,
}

impl Default for InvoiceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceSession {
    /// A session in the default starter shape.
    pub fn new() -> Self {
        let config = SessionConfig::default();
        let calculator = config.calculator();
        let table = LineTable::with_limits(ColumnSchema::starter(), config.limits);
        Self {
            header: InvoiceHeader {
                currency: config.currency,
                ..InvoiceHeader::default()
            },
            config,
            calculator,
            table,
        }
    }

    pub fn with_config(config: SessionConfig) -> Result<Self, InvoiceError> {
        let table = config.starter_table()?;
        Ok(Self {
            calculator: config.calculator(),
            header: InvoiceHeader {
                currency: config.currency,
                ..InvoiceHeader::default()
            },
            config,
            table,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn header(&self) -> &InvoiceHeader {
        &self.header
    }

    pub fn table(&self) -> &LineTable {
        &self.table
    }

    pub fn calculator(&self) -> &TotalCalculator {
        &self.calculator
    }

    /// Discard everything and start a fresh document.
    pub fn reset(&mut self) -> Result<(), InvoiceError> {
        *self = Self::with_config(self.config.clone())?;
        debug!("session reset");
        Ok(())
    }

    /// Apply one command. Destructive commands consult `confirm`; others ignore it.
    ///
    /// On error the model is unchanged.
    pub fn apply(
        &mut self,
        command: Command,
        confirm: impl Confirm,
    ) -> Result<Outcome, InvoiceError> {
        match command {
            Command::SetSupplier(text) => self.header.supplier = text,
            Command::SetClient(text) => self.header.client = text,
            Command::SetInvoiceNumber(number) => self.header.invoice_number = number,
            Command::SetIssueDate(input) => {
                self.header.issue_date = parse_issue_date(&input)?;
            }
            Command::SetCurrency(currency) => self.header.currency = currency,
            Command::AddColumn { key, label } => self.table.add_column(&key, &label)?,
            Command::RemoveColumn { key } => {
                self.table.remove_column(&key, confirm)?;
            }
            Command::RenameColumn { key, label } => self.table.rename_column(&key, &label)?,
            Command::AddRow => {
                self.table.add_row()?;
            }
            Command::RemoveRow { index } => {
                self.table.remove_row(index, confirm)?;
            }
            Command::SetField { index, key, value } => {
                if !self.table.set_field(index, &key, value) {
                    return Ok(Outcome::Ignored);
                }
            }
            Command::SetLogo(logo) => self.header.logo.set(logo),
            Command::ClearLogo => self.header.logo.clear(),
        }
        Ok(Outcome::Applied)
    }

    pub fn add_column(&mut self, key: &str, label: &str) -> Result<(), InvoiceError> {
        self.table.add_column(key, label)
    }

    pub fn remove_column(&mut self, key: &str, confirm: impl Confirm) -> Result<(), InvoiceError> {
        self.table.remove_column(key, confirm).map(|_| ())
    }

    pub fn add_row(&mut self) -> Result<usize, InvoiceError> {
        self.table.add_row()
    }

    pub fn remove_row(&mut self, index: usize, confirm: impl Confirm) -> Result<(), InvoiceError> {
        self.table.remove_row(index, confirm).map(|_| ())
    }

    /// Overwrite one cell; invalid coordinates are ignored (returns false).
    pub fn set_field(&mut self, index: usize, key: &str, value: impl Into<String>) -> bool {
        self.table.set_field(index, key, value)
    }

    /// Start a logo upload. Deliver the result with
    /// [`finish_logo_upload`](Self::finish_logo_upload).
    pub fn begin_logo_upload(&mut self) -> UploadTicket {
        self.header.logo.begin()
    }

    /// Deliver an upload result. Returns whether the logo was stored; a
    /// result superseded by a newer completed upload is dropped.
    pub fn finish_logo_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<Logo, InvoiceError>,
    ) -> Result<bool, InvoiceError> {
        match result {
            Ok(logo) => Ok(self.header.logo.complete(ticket, logo)),
            Err(err) => {
                self.header.logo.fail(ticket);
                Err(err)
            }
        }
    }

    /// Current totals as raw magnitudes.
    pub fn totals(&self) -> Totals {
        self.calculator.totals(self.table.rows())
    }

    /// Currency-prefixed row total.
    pub fn row_total_display(&self, index: usize) -> Option<String> {
        let row = self.table.row(index)?;
        Some(self.header.currency.label_checked(self.calculator.row_amount(row)))
    }

    /// Currency-prefixed grand total.
    pub fn grand_total_display(&self) -> String {
        self.header.currency.label_checked(self.totals().grand_total)
    }

    /// Suggested output file name using the configured extension.
    pub fn suggested_file_name(&self) -> String {
        document_file_name(&self.header.invoice_number, &self.config.file_extension)
    }

    /// Check the model is ready for export.
    pub fn check_ready(&self) -> Result<(), InvoiceError> {
        if self.header.logo.is_pending() {
            return Err(InvoiceError::LogoPending);
        }
        let violations = self.table.check_parity();
        if !violations.is_empty() {
            let msg = violations
                .iter()
                .map(ValidationError::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(InvoiceError::Consistency(msg));
        }
        let totals = self.totals();
        if let Some(index) = totals.first_out_of_range() {
            let field = format!("rows[{index}]");
            return Err(ValidationError::new(field, "line total is out of range").into());
        }
        if totals.grand_total.is_none() {
            return Err(ValidationError::new("grand_total", "grand total is out of range").into());
        }
        Ok(())
    }

    /// Build an export snapshot of the current model.
    pub fn snapshot(&self) -> Result<InvoiceSnapshot, InvoiceError> {
        self.check_ready()?;
        Ok(build_snapshot(&self.header, &self.table, &self.calculator))
    }

    /// Snapshot and render, containing any failure in an [`ExportNotice`].
    pub fn export<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
    ) -> Result<RenderedDocument, ExportNotice> {
        let snapshot = self
            .snapshot()
            .map_err(|e| ExportNotice::NotReady(e.to_string()))?;
        export_with(renderer, &snapshot)
    }
}

/// A session shared between threads.
///
/// Snapshots are taken under one read lock so header, schema and rows always
/// come from the same state; rendering happens after the lock is released.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<InvoiceSession>>,
}

impl SharedSession {
    pub fn new(session: InvoiceSession) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub fn apply(&self, command: Command, confirm: impl Confirm) -> Result<Outcome, InvoiceError> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(command, confirm)
    }

    /// Run `f` with shared read access.
    pub fn read<T>(&self, f: impl FnOnce(&InvoiceSession) -> T) -> T {
        f(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn snapshot(&self) -> Result<InvoiceSnapshot, InvoiceError> {
        self.read(InvoiceSession::snapshot)
    }

    pub fn export<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
    ) -> Result<RenderedDocument, ExportNotice> {
        let snapshot = self
            .snapshot()
            .map_err(|e| ExportNotice::NotReady(e.to_string()))?;
        export_with(renderer, &snapshot)
    }

    pub fn begin_logo_upload(&self) -> UploadTicket {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .begin_logo_upload()
    }

    pub fn finish_logo_upload(
        &self,
        ticket: UploadTicket,
        result: Result<Logo, InvoiceError>,
    ) -> Result<bool, InvoiceError> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .finish_logo_upload(ticket, result)
    }

    /// Read an image file and store it as the logo.
    ///
    /// No lock is held while the file is read. Returns whether this upload's
    /// result was stored.
    #[cfg(feature = "async")]
    pub async fn upload_logo(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<bool, InvoiceError> {
        let ticket = self.begin_logo_upload();
        let result = super::logo::read_logo(path).await;
        self.finish_logo_upload(ticket, result)
    }
}
