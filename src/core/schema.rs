use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::totals::{PRICE_KEY, QUANTITY_KEY};

/// A single line-item column: a stable key plus a display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Unique key addressing the column's value in every row.
    pub key: String,
    /// Header text shown for the column.
    pub label: String,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Ordered, uniquely-keyed list of columns.
///
/// Order is both the row field order and the display order. A schema always
/// holds at least one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    columns: Vec<ColumnDef>,
}

impl ColumnSchema {
    /// Build a schema from an initial column list.
    ///
    /// Fails if the list is empty, or if any key/label is blank or duplicated.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, ValidationError> {
        if columns.is_empty() {
            return Err(ValidationError::new(
                "columns",
                "schema must have at least one column",
            ));
        }
        let mut schema = Self {
            columns: Vec::with_capacity(columns.len()),
        };
        for column in columns {
            let column = normalize(&column.key, &column.label)?;
            if schema.contains(&column.key) {
                return Err(duplicate(&column.key));
            }
            schema.columns.push(column);
        }
        Ok(schema)
    }

    /// The starter shape of a fresh document: item, quantity, unit price.
    pub fn starter() -> Self {
        Self {
            columns: vec![
                ColumnDef::new("description", "Item"),
                ColumnDef::new(QUANTITY_KEY, "Quantity"),
                ColumnDef::new(PRICE_KEY, "Unit Price"),
            ],
        }
    }

    /// Columns in display order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Column keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Display index of `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Insert a new column at the front (newest columns appear leftmost).
    ///
    /// Key and label are trimmed. Returns the inserted column.
    pub fn add_column(&mut self, key: &str, label: &str) -> Result<&ColumnDef, ValidationError> {
        let column = normalize(key, label)?;
        if self.contains(&column.key) {
            return Err(duplicate(&column.key));
        }
        self.columns.insert(0, column);
        Ok(&self.columns[0])
    }

    /// Remove the column keyed `key`, returning it.
    pub fn remove_column(&mut self, key: &str) -> Result<ColumnDef, ValidationError> {
        let idx = self.removable_index(key)?;
        Ok(self.columns.remove(idx))
    }

    /// Check whether `remove_column(key)` would succeed, without mutating.
    pub fn check_removable(&self, key: &str) -> Result<(), ValidationError> {
        self.removable_index(key).map(|_| ())
    }

    fn removable_index(&self, key: &str) -> Result<usize, ValidationError> {
        let idx = self
            .position(key)
            .ok_or_else(|| ValidationError::new(format!("columns.{key}"), "unknown column key"))?;
        if self.columns.len() <= 1 {
            return Err(ValidationError::new(
                format!("columns.{key}"),
                "you must keep at least one column",
            ));
        }
        Ok(idx)
    }

    /// Change the display label of an existing column. The key is unchanged.
    pub fn rename_column(&mut self, key: &str, label: &str) -> Result<(), ValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::new(
                format!("columns.{key}.label"),
                "column label must not be empty",
            ));
        }
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.key == key)
            .ok_or_else(|| ValidationError::new(format!("columns.{key}"), "unknown column key"))?;
        column.label = label.to_string();
        Ok(())
    }
}

fn normalize(key: &str, label: &str) -> Result<ColumnDef, ValidationError> {
    let key = key.trim();
    let label = label.trim();
    if key.is_empty() {
        return Err(ValidationError::new(
            "columns.key",
            "column key must not be empty",
        ));
    }
    if label.is_empty() {
        return Err(ValidationError::new(
            format!("columns.{key}.label"),
            "column label must not be empty",
        ));
    }
    Ok(ColumnDef::new(key, label))
}

fn duplicate(key: &str) -> ValidationError {
    ValidationError::new(format!("columns.{key}"), "column key already exists")
}
