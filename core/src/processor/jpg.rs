use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::config::{EncodeOptions, DEFAULT_JPEG_QUALITY};
use crate::error::ConversionError;
use crate::format::TargetFormat;
use crate::processor::FormatEncoder;

pub struct JpgProcessor;

impl FormatEncoder for JpgProcessor {
    fn supported_formats(&self) -> &[TargetFormat] {
        &[TargetFormat::Jpg, TargetFormat::Jpeg]
    }

    fn encode(
        &self,
        img: &DynamicImage,
        _format: TargetFormat,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, ConversionError> {
        let quality = match options {
            EncodeOptions::Jpeg { quality } => *quality,
            _ => DEFAULT_JPEG_QUALITY,
        };

        // JPEG has no alpha channel; the encoder only ever sees RGB.
        let rgb = img.to_rgb8();

        let mut output = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);
            encoder
                .encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| ConversionError::Encode(format!("Failed to encode JPEG: {}", e)))?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    #[test]
    fn test_encode_rgba_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 8, Rgba([200, 10, 10, 40])));
        let data = JpgProcessor
            .encode(&img, TargetFormat::Jpg, &EncodeOptions::Jpeg { quality: 90 })
            .unwrap();

        assert_eq!(&data[0..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory_with_format(&data, image::ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8])
        }));
        let high = JpgProcessor
            .encode(&img, TargetFormat::Jpeg, &EncodeOptions::Jpeg { quality: 100 })
            .unwrap();
        let low = JpgProcessor
            .encode(&img, TargetFormat::Jpeg, &EncodeOptions::Jpeg { quality: 10 })
            .unwrap();
        assert!(low.len() < high.len());
    }
}
