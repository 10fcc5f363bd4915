use std::io::Cursor;

use image::DynamicImage;

use crate::config::EncodeOptions;
use crate::error::ConversionError;
use crate::format::TargetFormat;
use crate::processor::FormatEncoder;

/// Formats written with the codec's defaults and no tunables.
pub struct PlainProcessor;

impl FormatEncoder for PlainProcessor {
    fn supported_formats(&self) -> &[TargetFormat] {
        &[TargetFormat::Gif, TargetFormat::Bmp, TargetFormat::Tiff]
    }

    fn encode(
        &self,
        img: &DynamicImage,
        format: TargetFormat,
        _options: &EncodeOptions,
    ) -> Result<Vec<u8>, ConversionError> {
        // The GIF and BMP writers only take 8-bit RGB(A).
        let normalized = if img.color().has_alpha() {
            DynamicImage::ImageRgba8(img.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(img.to_rgb8())
        };

        let mut output = Cursor::new(Vec::new());
        normalized
            .write_to(&mut output, format.image_format())
            .map_err(|e| {
                ConversionError::Encode(format!("Failed to encode {}: {}", format.as_str(), e))
            })?;

        Ok(output.into_inner())
    }
}
