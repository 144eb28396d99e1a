//! Invoice snapshot as a paginated A4 PDF.
//!
//! Uses the standard Helvetica fonts with `WinAnsiEncoding`, so no font data
//! is embedded. A logo is drawn when it is a JPEG or a plain 8-bit PNG.

mod image;
mod layout;
mod text;

use std::io::Write;

use lopdf::{Document, Object, StringFormat, dictionary};

use self::image::image_xobject;
use self::layout::{Op, PAGE_HEIGHT, PAGE_WIDTH, Page, layout};
use self::text::encode_win_ansi;
use super::{RenderError, Renderer};
use crate::core::InvoiceSnapshot;

const LOGO_NAME: &str = "Im1";

/// Renders the whole snapshot (header, parties, table, grand total).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfRenderer {
    compress: bool,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self { compress: true }
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether page content streams are Flate-compressed (default: yes).
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn to_pdf(&self, snapshot: &InvoiceSnapshot) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        let image = snapshot.logo().and_then(image_xobject);
        let logo_size = image.as_ref().map(|i| (i.width, i.height));
        let mut resources = dictionary! {
            "Font" => dictionary! {
                "F1" => Object::Reference(font_id),
                "F2" => Object::Reference(bold_id),
            },
        };
        if let Some(image) = image {
            let image_id = doc.add_object(image.stream);
            resources.set(
                "XObject",
                dictionary! { LOGO_NAME => Object::Reference(image_id) },
            );
        }
        let resources_id = doc.add_object(resources);

        let mut kids = Vec::new();
        for page in layout(snapshot, logo_size) {
            let content = encode_page(&page)
                .map_err(|e| RenderError::Failed(format!("failed to encode page: {e}")))?;
            let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(PAGE_WIDTH.into()),
                    Object::Real(PAGE_HEIGHT.into()),
                ],
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(
                encode_win_ansi(&format!("Invoice #{}", snapshot.invoice_number())),
                StringFormat::Literal,
            ),
            "Producer" => Object::string_literal(concat!("tabfaktura ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Info", Object::Reference(info_id));

        if self.compress {
            doc.compress();
        }

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| RenderError::Failed(format!("failed to save PDF: {e}")))?;
        Ok(output)
    }
}

impl Renderer for PdfRenderer {
    fn extension(&self) -> &str {
        "pdf"
    }

    fn render(&self, snapshot: &InvoiceSnapshot) -> Result<Vec<u8>, RenderError> {
        self.to_pdf(snapshot)
    }
}

/// Serialise drawing operations as a content stream.
fn encode_page(page: &Page) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    for op in &page.ops {
        match op {
            Op::Text {
                x,
                y,
                size,
                bold,
                text,
            } => {
                let font = if *bold { "F2" } else { "F1" };
                write!(out, "BT /{font} {size:.1} Tf {x:.2} {y:.2} Td (")?;
                out.extend(escape_literal(&encode_win_ansi(text)));
                out.extend_from_slice(b") Tj ET\n");
            }
            Op::Fill {
                x,
                y,
                width,
                height,
                gray,
            } => {
                writeln!(
                    out,
                    "q {gray:.2} g {x:.2} {y:.2} {width:.2} {height:.2} re f Q"
                )?;
            }
            Op::Rule { x1, x2, y } => {
                writeln!(out, "q 0.5 w 0.8 G {x1:.2} {y:.2} m {x2:.2} {y:.2} l S Q")?;
            }
            Op::Logo {
                x,
                y,
                width,
                height,
            } => {
                writeln!(
                    out,
                    "q {width:.2} 0 0 {height:.2} {x:.2} {y:.2} cm /{LOGO_NAME} Do Q"
                )?;
            }
        }
    }
    Ok(out)
}

fn escape_literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if matches!(b, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}
