pub mod jpg;
pub mod plain;
pub mod png;
pub mod webp;

use image::DynamicImage;

use crate::config::EncodeOptions;
use crate::error::ConversionError;
use crate::format::TargetFormat;

pub trait FormatEncoder: Send + Sync {
    fn supported_formats(&self) -> &[TargetFormat];
    fn encode(
        &self,
        img: &DynamicImage,
        format: TargetFormat,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, ConversionError>;
}
