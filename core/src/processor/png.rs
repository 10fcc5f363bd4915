use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;

use crate::config::{EncodeOptions, DEFAULT_PNG_COMPRESSION};
use crate::error::ConversionError;
use crate::format::TargetFormat;
use crate::processor::FormatEncoder;

pub struct PngProcessor;

/// zlib-style level, 0 = stored (no compression), 9 = smallest.
fn compression_type(level: u8) -> CompressionType {
    CompressionType::Level(level.min(9))
}

impl FormatEncoder for PngProcessor {
    fn supported_formats(&self) -> &[TargetFormat] {
        &[TargetFormat::Png]
    }

    fn encode(
        &self,
        img: &DynamicImage,
        _format: TargetFormat,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, ConversionError> {
        let level = match options {
            EncodeOptions::Png { compression_level } => *compression_level,
            _ => DEFAULT_PNG_COMPRESSION,
        };

        let mut output = Vec::new();
        {
            let encoder = PngEncoder::new_with_quality(
                &mut output,
                compression_type(level),
                FilterType::Adaptive,
            );
            img.write_with_encoder(encoder)
                .map_err(|e| ConversionError::Encode(format!("Failed to encode PNG: {}", e)))?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn test_compression_level_passes_through() {
        assert!(matches!(compression_type(0), CompressionType::Level(0)));
        assert!(matches!(compression_type(6), CompressionType::Level(6)));
        assert!(matches!(compression_type(12), CompressionType::Level(9)));
    }

    #[test]
    fn test_level_zero_is_larger_than_level_nine() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(128, 128, |x, y| {
            image::Rgb([(x % 8) as u8 * 30, (y % 4) as u8 * 60, 10])
        }));
        let encode = |level| {
            PngProcessor
                .encode(&img, TargetFormat::Png, &EncodeOptions::Png { compression_level: level })
                .unwrap()
        };

        let stored = encode(0);
        let smallest = encode(9);
        assert!(stored.len() > smallest.len(), "{} <= {}", stored.len(), smallest.len());
        // Level 0 keeps every raw byte (128 rows of 1 filter byte + 384 samples).
        assert!(stored.len() >= 128 * 385);
    }

    #[test]
    fn test_encode_keeps_alpha() {
        let img = DynamicImage::new_rgba8(12, 7);
        let data = PngProcessor
            .encode(&img, TargetFormat::Png, &EncodeOptions::Png { compression_level: 9 })
            .unwrap();

        assert_eq!(&data[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (12, 7));
        assert!(decoded.color().has_alpha());
    }
}
