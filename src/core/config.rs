use serde::{Deserialize, Serialize};

use super::currencies::Currency;
use super::error::ValidationError;
use super::schema::{ColumnDef, ColumnSchema};
use super::table::{LineTable, TableLimits};
use super::totals::{PRICE_KEY, QUANTITY_KEY, TotalCalculator};

/// Settings a session starts from.
///
/// Deserialisable so hosts can keep it next to their own settings; every
/// field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Columns of a fresh document, in display order.
    pub starter_columns: Vec<ColumnDef>,
    /// Key of the designated quantity column.
    pub quantity_key: String,
    /// Key of the designated unit-price column.
    pub price_key: String,
    /// Currency selected for a fresh document.
    pub currency: Currency,
    /// Extension of the suggested output file name, without the dot.
    pub file_extension: String,
    pub limits: TableLimits,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starter_columns: ColumnSchema::starter().columns().to_vec(),
            quantity_key: QUANTITY_KEY.to_string(),
            price_key: PRICE_KEY.to_string(),
            currency: Currency::default(),
            file_extension: "pdf".to_string(),
            limits: TableLimits::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_starter_columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.starter_columns = columns;
        self
    }

    /// Designate the quantity and unit-price columns used for totals.
    pub fn with_designated_keys(
        mut self,
        quantity_key: impl Into<String>,
        price_key: impl Into<String>,
    ) -> Self {
        self.quantity_key = quantity_key.into();
        self.price_key = price_key.into();
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub fn with_limits(mut self, limits: TableLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Check the configuration is usable before a session is started.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity_key.trim().is_empty() || self.price_key.trim().is_empty() {
            return Err(ValidationError::new(
                "config.designated_keys",
                "quantity and price keys must not be empty",
            ));
        }
        if self.quantity_key == self.price_key {
            return Err(ValidationError::new(
                "config.designated_keys",
                "quantity and price keys must differ",
            ));
        }
        let ext = self.file_extension.trim();
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(ValidationError::new(
                "config.file_extension",
                format!("'{}' is not a usable file extension", self.file_extension),
            ));
        }
        if self.limits.max_columns == 0 || self.limits.max_rows == 0 {
            return Err(ValidationError::new(
                "config.limits",
                "limits must allow at least one column and one row",
            ));
        }
        if self.starter_columns.len() > self.limits.max_columns {
            return Err(ValidationError::new(
                "config.starter_columns",
                "starter columns exceed the column limit",
            ));
        }
        ColumnSchema::new(self.starter_columns.clone()).map(|_| ())
    }

    /// A fresh table in the starter shape: starter columns and one blank row.
    pub fn starter_table(&self) -> Result<LineTable, ValidationError> {
        self.validate()?;
        let schema = ColumnSchema::new(self.starter_columns.clone())?;
        Ok(LineTable::with_limits(schema, self.limits))
    }

    pub fn calculator(&self) -> TotalCalculator {
        TotalCalculator::new(self.quantity_key.clone(), self.price_key.clone())
    }
}
