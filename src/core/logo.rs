//! Logo payloads and the upload slot that stores them.
//!
//! Uploads complete asynchronously. [`LogoSlot`] hands out increasing
//! [`UploadTicket`]s and only applies a completed upload if no newer upload
//! has already been applied, so the last upload to start that completes wins
//! and a slow, stale read never overwrites a newer logo.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::{debug, warn};
use serde::{Serialize, Serializer};

use super::error::InvoiceError;

/// Recognised image container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
}

impl ImageFormat {
    /// Sniff the format from the leading magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else if bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }
}

/// An uploaded image. Cloning shares the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    bytes: Arc<[u8]>,
    format: ImageFormat,
}

impl Logo {
    /// Upper bound on accepted payload size.
    pub const MAX_BYTES: usize = 5 * 1024 * 1024;

    /// Wrap raw image bytes, rejecting anything that is not a known image.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, InvoiceError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(InvoiceError::Logo("image payload is empty".into()));
        }
        if bytes.len() > Self::MAX_BYTES {
            return Err(InvoiceError::Logo(format!(
                "image payload is {} bytes, limit is {}",
                bytes.len(),
                Self::MAX_BYTES
            )));
        }
        let format = ImageFormat::detect(&bytes)
            .ok_or_else(|| InvoiceError::Logo("unrecognised image format".into()))?;
        Ok(Self {
            bytes: bytes.into(),
            format,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// `data:` URL embedding the image as base64.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }

    /// Pixel dimensions, when they can be read from the header (PNG, JPEG, GIF).
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self.format {
            ImageFormat::Png => png_dimensions(&self.bytes),
            ImageFormat::Jpeg => jpeg_frame(&self.bytes).map(|f| (f.width, f.height)),
            ImageFormat::Gif => {
                let b = self.bytes.get(6..10)?;
                Some((
                    u32::from(u16::from_le_bytes([b[0], b[1]])),
                    u32::from(u16::from_le_bytes([b[2], b[3]])),
                ))
            }
            ImageFormat::Webp | ImageFormat::Bmp => None,
        }
    }
}

impl Serialize for Logo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    // IHDR is always the first chunk: width and height follow its type tag
    if bytes.get(12..16)? != b"IHDR" {
        return None;
    }
    let w = bytes.get(16..20)?;
    let h = bytes.get(20..24)?;
    Some((
        u32::from_be_bytes([w[0], w[1], w[2], w[3]]),
        u32::from_be_bytes([h[0], h[1], h[2], h[3]]),
    ))
}

/// Size and channel count from a JPEG start-of-frame segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JpegFrame {
    pub width: u32,
    pub height: u32,
    #[cfg_attr(not(feature = "pdf"), allow(dead_code))]
    pub components: u8,
}

pub(crate) fn jpeg_frame(bytes: &[u8]) -> Option<JpegFrame> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        // fill bytes and standalone markers carry no length
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        if (0xD0..=0xD9).contains(&marker) || marker == 0x01 {
            pos += 2;
            continue;
        }
        let len = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            let seg = bytes.get(pos + 5..pos + 10)?;
            return Some(JpegFrame {
                height: u32::from(u16::from_be_bytes([seg[0], seg[1]])),
                width: u32::from(u16::from_be_bytes([seg[2], seg[3]])),
                components: seg[4],
            });
        }
        pos += 2 + len;
    }
    None
}

/// Identifies one logo upload. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTicket(u64);

impl UploadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Holds the current logo and arbitrates between overlapping uploads.
#[derive(Debug, Clone, Default)]
pub struct LogoSlot {
    current: Option<Logo>,
    issued: u64,
    applied: u64,
    resolved: u64,
}

impl LogoSlot {
    pub fn current(&self) -> Option<&Logo> {
        self.current.as_ref()
    }

    /// Start an upload. Any upload started earlier becomes stale once this one
    /// completes.
    pub fn begin(&mut self) -> UploadTicket {
        self.issued += 1;
        debug!("logo upload #{} started", self.issued);
        UploadTicket(self.issued)
    }

    /// Deliver the result of an upload.
    ///
    /// Returns true if the logo was stored, false if a newer upload had
    /// already been applied and this result was discarded.
    pub fn complete(&mut self, ticket: UploadTicket, logo: Logo) -> bool {
        self.resolved = self.resolved.max(ticket.0);
        if ticket.0 <= self.applied {
            debug!(
                "discarding stale logo upload #{} (#{} already applied)",
                ticket.0, self.applied
            );
            return false;
        }
        self.applied = ticket.0;
        self.current = Some(logo);
        debug!("logo upload #{} applied", ticket.0);
        true
    }

    /// Resolve an upload that failed. The current logo is kept.
    pub fn fail(&mut self, ticket: UploadTicket) {
        warn!("logo upload #{} failed", ticket.0);
        self.resolved = self.resolved.max(ticket.0);
    }

    /// True while the most recently started upload has not resolved.
    pub fn is_pending(&self) -> bool {
        self.issued > self.resolved
    }

    /// Store a logo synchronously, superseding any upload in flight.
    pub fn set(&mut self, logo: Logo) {
        let ticket = self.begin();
        self.complete(ticket, logo);
    }

    /// Remove the logo. Uploads started before this call are discarded.
    pub fn clear(&mut self) {
        self.current = None;
        self.applied = self.issued;
        self.resolved = self.issued;
    }
}

/// Read an image file from disk.
#[cfg(feature = "async")]
pub async fn read_logo(path: impl AsRef<std::path::Path>) -> Result<Logo, InvoiceError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| InvoiceError::Logo(format!("failed to read {}: {e}", path.display())))?;
    Logo::from_bytes(bytes)
}
