//! Rendering collaborators and the boundary that contains their failures.
//!
//! A [`Renderer`] turns an [`InvoiceSnapshot`] into document bytes.
//! [`export_with`] is the only way the core calls a renderer: any error or
//! panic inside the renderer is converted into an [`ExportNotice`], so a
//! broken renderer can never take the editing session down with it.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::{debug, warn};
use thiserror::Error;

use crate::core::InvoiceSnapshot;

mod csv;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use csv::CsvRenderer;
#[cfg(feature = "pdf")]
pub use pdf::PdfRenderer;

/// Errors a renderer may report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The snapshot holds something this renderer cannot express.
    #[error("unsupported content: {0}")]
    Unsupported(String),

    /// The output document could not be produced.
    #[error("render failed: {0}")]
    Failed(String),
}

/// Turns a snapshot into a finished document.
pub trait Renderer {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &str;

    fn render(&self, snapshot: &InvoiceSnapshot) -> Result<Vec<u8>, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn render(&self, snapshot: &InvoiceSnapshot) -> Result<Vec<u8>, RenderError> {
        (**self).render(snapshot)
    }
}

/// A rendered document and its suggested file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Non-fatal, user-visible notice that an export did not produce a document.
///
/// The session is untouched; the export can simply be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportNotice {
    /// The model was not ready (e.g. a logo upload is still running).
    #[error("Document not ready: {0}")]
    NotReady(String),

    /// The renderer returned an error or panicked.
    #[error("Error generating document. Please try again. ({0})")]
    RenderFailed(String),
}

/// Run `renderer` on `snapshot`, containing any failure.
pub fn export_with<R: Renderer + ?Sized>(
    renderer: &R,
    snapshot: &InvoiceSnapshot,
) -> Result<RenderedDocument, ExportNotice> {
    let file_name = snapshot.file_name_with_extension(renderer.extension());
    match catch_unwind(AssertUnwindSafe(|| renderer.render(snapshot))) {
        Ok(Ok(bytes)) => {
            debug!("rendered {file_name} ({} bytes)", bytes.len());
            Ok(RenderedDocument { file_name, bytes })
        }
        Ok(Err(err)) => {
            warn!("rendering {file_name} failed: {err}");
            Err(ExportNotice::RenderFailed(err.to_string()))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!("renderer panicked while producing {file_name}: {message}");
            Err(ExportNotice::RenderFailed(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "renderer panicked".to_string()
    }
}
