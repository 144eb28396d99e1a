//! The line-item table: column schema and rows kept in lockstep.
//!
//! `LineTable` is the only owner of a schema/row pair and the only way to
//! mutate either. Every schema change re-conforms every row before the method
//! returns, so a row's key set always equals the schema's key set.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::error::{InvoiceError, ValidationError};
use super::rows::{Row, RowStore};
use super::schema::{ColumnDef, ColumnSchema};

/// A destructive table change awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Removing the column with this definition.
    Column(ColumnDef),
    /// Removing the row at this position.
    Row(usize),
}

impl std::fmt::Display for Removal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Column(col) => write!(f, "removing column '{}'", col.label),
            Self::Row(idx) => write!(f, "removing row {}", idx + 1),
        }
    }
}

/// Source of explicit user confirmation for destructive changes.
///
/// Implemented for `bool` (fixed answer) and for closures.
pub trait Confirm {
    fn confirm(&mut self, removal: &Removal) -> bool;
}

impl Confirm for bool {
    fn confirm(&mut self, _removal: &Removal) -> bool {
        *self
    }
}

impl<F> Confirm for F
where
    F: FnMut(&Removal) -> bool,
{
    fn confirm(&mut self, removal: &Removal) -> bool {
        self(removal)
    }
}

/// Input limits for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLimits {
    pub max_columns: usize,
    pub max_rows: usize,
    /// Maximum length in characters of a column key or label.
    pub max_text_len: usize,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            max_columns: 64,
            max_rows: 10_000,
            max_text_len: 200,
        }
    }
}

/// Column schema plus rows, mutated only as a consistent pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineTable {
    schema: ColumnSchema,
    rows: RowStore,
    #[serde(skip)]
    limits: TableLimits,
}

impl LineTable {
    /// A table with `schema` and a single blank row.
    pub fn new(schema: ColumnSchema) -> Self {
        Self::with_limits(schema, TableLimits::default())
    }

    pub fn with_limits(schema: ColumnSchema, limits: TableLimits) -> Self {
        let rows = RowStore::with_blank_row(&schema);
        Self {
            schema,
            rows,
            limits,
        }
    }

    /// Import existing rows. Each row is conformed to `schema`: stale keys are
    /// dropped and missing keys are added empty.
    pub fn from_rows(schema: ColumnSchema, rows: Vec<Row>) -> Result<Self, ValidationError> {
        if rows.is_empty() {
            return Err(ValidationError::new(
                "rows",
                "table must have at least one row",
            ));
        }
        let mut store = RowStore::default();
        for mut row in rows {
            row.conform_to(&schema);
            store.push(row);
        }
        Ok(Self {
            schema,
            rows: store,
            limits: TableLimits::default(),
        })
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Columns in display order.
    pub fn columns(&self) -> &[ColumnDef] {
        self.schema.columns()
    }

    pub fn rows(&self) -> &RowStore {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.row(index)
    }

    pub fn limits(&self) -> TableLimits {
        self.limits
    }

    /// Add a column at the front of the schema; every row gains the key with
    /// an empty value.
    pub fn add_column(&mut self, key: &str, label: &str) -> Result<(), InvoiceError> {
        if self.schema.len() >= self.limits.max_columns {
            return Err(reject(ValidationError::new(
                "columns",
                format!("table cannot have more than {} columns", self.limits.max_columns),
            )));
        }
        if key.trim().chars().count() > self.limits.max_text_len
            || label.trim().chars().count() > self.limits.max_text_len
        {
            return Err(reject(ValidationError::new(
                "columns",
                format!(
                    "column key and label cannot exceed {} characters",
                    self.limits.max_text_len
                ),
            )));
        }

        let key = self.schema.add_column(key, label).map_err(reject)?.key.clone();
        for row in self.rows.iter_mut() {
            row.ensure_key(&key);
        }
        debug!("added column '{key}' ({} columns)", self.schema.len());
        Ok(())
    }

    /// Remove a column after confirmation; every row loses the key.
    pub fn remove_column(
        &mut self,
        key: &str,
        mut confirm: impl Confirm,
    ) -> Result<ColumnDef, InvoiceError> {
        self.schema.check_removable(key).map_err(reject)?;
        let Some(column) = self.schema.get(key) else {
            return Err(reject(ValidationError::new(
                format!("columns.{key}"),
                "unknown column key",
            )));
        };
        let removal = Removal::Column(column.clone());
        if !confirm.confirm(&removal) {
            debug!("{removal} declined");
            return Err(InvoiceError::Declined(removal.to_string()));
        }

        let column = self.schema.remove_column(key).map_err(reject)?;
        for row in self.rows.iter_mut() {
            row.drop_key(&column.key);
        }
        debug!("removed column '{}' ({} columns)", column.key, self.schema.len());
        Ok(column)
    }

    /// Change a column's label. Rows are keyed by the unchanged key.
    pub fn rename_column(&mut self, key: &str, label: &str) -> Result<(), InvoiceError> {
        if label.trim().chars().count() > self.limits.max_text_len {
            return Err(reject(ValidationError::new(
                format!("columns.{key}.label"),
                format!("column label cannot exceed {} characters", self.limits.max_text_len),
            )));
        }
        self.schema.rename_column(key, label).map_err(reject)?;
        debug!("relabelled column '{key}'");
        Ok(())
    }

    /// Append a blank row. Returns its index.
    pub fn add_row(&mut self) -> Result<usize, InvoiceError> {
        if self.rows.len() >= self.limits.max_rows {
            return Err(reject(ValidationError::new(
                "rows",
                format!("table cannot have more than {} rows", self.limits.max_rows),
            )));
        }
        self.rows.push(Row::blank(&self.schema));
        debug!("added row ({} rows)", self.rows.len());
        Ok(self.rows.len() - 1)
    }

    /// Remove the row at `index` after confirmation. Later rows shift up.
    pub fn remove_row(
        &mut self,
        index: usize,
        mut confirm: impl Confirm,
    ) -> Result<Row, InvoiceError> {
        self.rows.check_removable(index).map_err(reject)?;
        let removal = Removal::Row(index);
        if !confirm.confirm(&removal) {
            debug!("{removal} declined");
            return Err(InvoiceError::Declined(removal.to_string()));
        }
        let row = self.rows.remove(index).map_err(reject)?;
        debug!("removed row {index} ({} rows)", self.rows.len());
        Ok(row)
    }

    /// Overwrite one cell with a raw value.
    ///
    /// Unknown rows or keys are ignored; the return value tells whether the
    /// write landed.
    pub fn set_field(&mut self, index: usize, key: &str, value: impl Into<String>) -> bool {
        let applied = self
            .rows
            .get_mut(index)
            .is_some_and(|row| row.overwrite(key, value.into()));
        if !applied {
            debug!("ignored write to rows[{index}].{key}");
        }
        applied
    }

    /// All places where a row's key set differs from the schema.
    pub fn check_parity(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            if row.matches(&self.schema) {
                continue;
            }
            for key in self.schema.keys().filter(|k| !row.contains_key(k)) {
                errors.push(ValidationError::new(
                    format!("rows[{i}].{key}"),
                    "row is missing a schema key",
                ));
            }
            for key in row.keys().filter(|k| !self.schema.contains(k)) {
                errors.push(ValidationError::new(
                    format!("rows[{i}].{key}"),
                    "row holds a key that is not in the schema",
                ));
            }
        }
        errors
    }
}

fn reject(err: ValidationError) -> InvoiceError {
    warn!("rejected: {err}");
    InvoiceError::Validation(err)
}
