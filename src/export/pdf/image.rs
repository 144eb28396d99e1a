//! Logo images as PDF image XObjects.
//!
//! JPEG data is passed through with `DCTDecode`. Non-interlaced 8-bit gray or
//! RGB PNGs are embedded by re-using their zlib stream with PNG predictors.
//! Anything else is left out of the document.

use lopdf::{Object, Stream, dictionary};
use log::warn;

use crate::core::logo::jpeg_frame;
use crate::core::{ImageFormat, Logo};

/// An embeddable image stream and its pixel size.
pub(crate) struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub stream: Stream,
}

pub(crate) fn image_xobject(logo: &Logo) -> Option<ImageXObject> {
    let image = match logo.format() {
        ImageFormat::Jpeg => jpeg(logo.bytes()),
        ImageFormat::Png => png(logo.bytes()),
        _ => None,
    };
    if image.is_none() {
        warn!(
            "logo ({}) cannot be embedded in PDF output, leaving it out",
            logo.format().mime_type()
        );
    }
    image
}

fn jpeg(bytes: &[u8]) -> Option<ImageXObject> {
    let frame = jpeg_frame(bytes)?;
    let color_space = match frame.components {
        1 => "DeviceGray",
        3 => "DeviceRGB",
        4 => "DeviceCMYK",
        _ => return None,
    };
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => Object::Integer(frame.width.into()),
        "Height" => Object::Integer(frame.height.into()),
        "ColorSpace" => color_space,
        "BitsPerComponent" => Object::Integer(8),
        "Filter" => "DCTDecode",
    };
    Some(ImageXObject {
        width: frame.width,
        height: frame.height,
        stream: Stream::new(dict, bytes.to_vec()).with_compression(false),
    })
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn png(bytes: &[u8]) -> Option<ImageXObject> {
    let mut rest = bytes.strip_prefix(PNG_SIGNATURE)?;
    let mut header = None;
    let mut data = Vec::new();

    while rest.len() >= 12 {
        let len = u32::from_be_bytes(rest[0..4].try_into().ok()?) as usize;
        let kind = &rest[4..8];
        let body = rest.get(8..8 + len)?;
        match kind {
            b"IHDR" if body.len() >= 13 => header = Some(body),
            b"IDAT" => data.extend_from_slice(body),
            b"IEND" => break,
            _ => {}
        }
        rest = rest.get(12 + len..)?;
    }

    let ihdr = header?;
    let width = u32::from_be_bytes(ihdr[0..4].try_into().ok()?);
    let height = u32::from_be_bytes(ihdr[4..8].try_into().ok()?);
    let (bit_depth, color_type, interlace) = (ihdr[8], ihdr[9], ihdr[12]);
    let (color_space, colors) = match color_type {
        0 => ("DeviceGray", 1),
        2 => ("DeviceRGB", 3),
        _ => return None,
    };
    if bit_depth != 8 || interlace != 0 || data.is_empty() {
        return None;
    }

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => Object::Integer(width.into()),
        "Height" => Object::Integer(height.into()),
        "ColorSpace" => color_space,
        "BitsPerComponent" => Object::Integer(8),
        "Filter" => "FlateDecode",
        "DecodeParms" => dictionary! {
            "Predictor" => Object::Integer(15),
            "Colors" => Object::Integer(colors),
            "BitsPerComponent" => Object::Integer(8),
            "Columns" => Object::Integer(width.into()),
        },
    };
    Some(ImageXObject {
        width,
        height,
        stream: Stream::new(dict, data).with_compression(false),
    })
}
