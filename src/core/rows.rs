use std::collections::BTreeMap;

use serde::Serialize;

use super::error::ValidationError;
use super::schema::ColumnSchema;

/// One line item: raw, untyped user input keyed by column key.
///
/// Rows are only mutated through [`LineTable`](super::LineTable), which keeps
/// their key set equal to the current schema's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: BTreeMap<String, String>,
}

impl Row {
    /// A row holding an empty string for every key in `schema`.
    pub(crate) fn blank(schema: &ColumnSchema) -> Self {
        Self {
            values: schema.keys().map(|k| (k.to_string(), String::new())).collect(),
        }
    }

    /// Raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value under `key`, or `""` if the key is absent.
    pub fn value_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys present in this row (sorted, not display order).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every value is blank.
    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }

    /// Insert `key` with an empty value, leaving an existing value untouched.
    pub(crate) fn ensure_key(&mut self, key: &str) {
        self.values.entry(key.to_string()).or_default();
    }

    pub(crate) fn drop_key(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Overwrite the value of an existing key. Returns false if absent.
    pub(crate) fn overwrite(&mut self, key: &str, value: String) -> bool {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Keep only keys present in `schema` and add any that are missing.
    pub(crate) fn conform_to(&mut self, schema: &ColumnSchema) {
        self.values.retain(|k, _| schema.contains(k));
        for key in schema.keys() {
            self.ensure_key(key);
        }
    }

    /// Whether the key set equals `schema`'s key set exactly.
    pub fn matches(&self, schema: &ColumnSchema) -> bool {
        self.values.len() == schema.len() && schema.keys().all(|k| self.values.contains_key(k))
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered line items; insertion order is display order.
///
/// Identity is positional: removing a row shifts every later row up by one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RowStore {
    rows: Vec<Row>,
}

impl RowStore {
    pub(crate) fn with_blank_row(schema: &ColumnSchema) -> Self {
        Self {
            rows: vec![Row::blank(schema)],
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub(crate) fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub(crate) fn check_removable(&self, index: usize) -> Result<(), ValidationError> {
        if index >= self.rows.len() {
            return Err(ValidationError::new(
                format!("rows[{index}]"),
                format!("row index out of bounds (have {})", self.rows.len()),
            ));
        }
        if self.rows.len() <= 1 {
            return Err(ValidationError::new(
                format!("rows[{index}]"),
                "you must keep at least one row",
            ));
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, index: usize) -> Result<Row, ValidationError> {
        self.check_removable(index)?;
        Ok(self.rows.remove(index))
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Row> {
        self.rows.iter_mut()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }
}

impl<'a> IntoIterator for &'a RowStore {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
