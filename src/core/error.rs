use thiserror::Error;

/// Errors returned by model commands and export.
///
/// Every variant is recoverable: a rejected command leaves the model exactly
/// as it was before the call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// The command was refused by a validation rule.
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    /// A destructive command was not confirmed.
    #[error("{0} was not confirmed")]
    Declined(String),

    /// A logo upload is still in flight; the model is not ready for export.
    #[error("logo upload still pending")]
    LogoPending,

    /// Logo payload could not be read or recognised.
    #[error("logo error: {0}")]
    Logo(String),

    /// The internal model failed a consistency check.
    #[error("consistency error: {0}")]
    Consistency(String),
}

impl From<ValidationError> for InvoiceError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the offending input (e.g. "columns.tax", "rows[2]").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
