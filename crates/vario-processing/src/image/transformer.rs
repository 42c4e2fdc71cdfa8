//! Variant transformer - decode, bound-resize, re-encode.

use crate::image::resize::ImageResize;
use bytes::Bytes;
use image::{GenericImageView, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

/// Transform errors, attributed to a single fan-out target.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("source bytes are not a decodable image: {0}")]
    Decode(String),

    #[error("failed to encode variant: {0}")]
    Encode(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Produces one resized variant of a staged artifact.
pub struct VariantTransformer;

impl VariantTransformer {
    /// Decode `data` (format guessed from content), resize into a
    /// `resolution`×`resolution` bounding square, and encode to `format`.
    pub fn transform(
        data: &[u8],
        resolution: u32,
        format: ImageFormat,
    ) -> Result<Bytes, TransformError> {
        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| TransformError::Decode(e.to_string()))?;

        let resized = ImageResize::resize_to_bounds(&img, resolution);

        let (width, height) = resized.dimensions();
        let estimated_size = (width * height * 3) as usize;
        let mut buffer = Vec::with_capacity(estimated_size);
        let mut cursor = Cursor::new(&mut buffer);
        resized
            .write_to(&mut cursor, format)
            .map_err(|e| TransformError::Encode(e.to_string()))?;

        Ok(Bytes::from(buffer))
    }

    /// Output format for a file extension. Extensions come from the
    /// content-type subtype of the original upload.
    pub fn format_for_extension(extension: &str) -> Result<ImageFormat, TransformError> {
        match extension.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            "webp" => Ok(ImageFormat::WebP),
            other => Err(TransformError::UnsupportedFormat(other.to_string())),
        }
    }
}
