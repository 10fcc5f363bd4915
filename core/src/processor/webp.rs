use image::{DynamicImage, GenericImageView};

use crate::config::{EncodeOptions, DEFAULT_WEBP_QUALITY};
use crate::error::ConversionError;
use crate::format::TargetFormat;
use crate::processor::FormatEncoder;

/// Largest width or height libwebp accepts.
const WEBP_MAX_DIMENSION: u32 = 16383;

pub struct WebpProcessor;

impl FormatEncoder for WebpProcessor {
    fn supported_formats(&self) -> &[TargetFormat] {
        &[TargetFormat::Webp]
    }

    fn encode(
        &self,
        img: &DynamicImage,
        _format: TargetFormat,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, ConversionError> {
        let quality = match options {
            EncodeOptions::Webp { quality } => *quality,
            _ => DEFAULT_WEBP_QUALITY,
        };

        let (width, height) = img.dimensions();
        if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
            return Err(ConversionError::Encode(format!(
                "WebP supports at most {WEBP_MAX_DIMENSION}x{WEBP_MAX_DIMENSION}, image is {width}x{height}"
            )));
        }

        let encoded = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), width, height)
                .encode_simple(false, f32::from(quality))
        } else {
            let rgb = img.to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), width, height)
                .encode_simple(false, f32::from(quality))
        };

        let encoded = encoded
            .map_err(|e| ConversionError::Encode(format!("Failed to encode WebP: {:?}", e)))?;

        Ok(encoded.to_vec())
    }
}
