use std::collections::HashMap;
use std::io::Cursor;

use image::{DynamicImage, ImageReader};
use uuid::Uuid;

use crate::config::{ConvertOptions, EncodeOptions, PipelineLimits, ResizeRequest, DEFAULT_TARGET_FORMAT};
use crate::error::ConversionError;
use crate::format::TargetFormat;
use crate::processor::jpg::JpgProcessor;
use crate::processor::plain::PlainProcessor;
use crate::processor::png::PngProcessor;
use crate::processor::webp::WebpProcessor;
use crate::processor::FormatEncoder;
use crate::resize::resize_image;
use crate::validate::validate;

/// Encoded image handed back to the caller.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub bytes: Vec<u8>,
    /// `image/<extension>`
    pub mime_type: String,
    /// `<32 hex chars>.<extension>`
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

/// Decode → resize → alpha reconciliation → encode.
///
/// Holds no per-call state, so a single instance can be shared across threads.
pub struct Pipeline {
    encoders: Vec<Box<dyn FormatEncoder>>,
    limits: PipelineLimits,
}

impl Pipeline {
    /// An empty pipeline. Register encoders before converting.
    pub fn new() -> Self {
        Self {
            encoders: Vec::new(),
            limits: PipelineLimits::default(),
        }
    }

    /// A pipeline with every built-in encoder registered.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline.register(Box::new(JpgProcessor));
        pipeline.register(Box::new(PngProcessor));
        pipeline.register(Box::new(WebpProcessor));
        pipeline.register(Box::new(PlainProcessor));
        pipeline
    }

    pub fn with_limits(mut self, limits: PipelineLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &PipelineLimits {
        &self.limits
    }

    pub fn register(&mut self, encoder: Box<dyn FormatEncoder>) {
        self.encoders.push(encoder);
    }

    /// Find an encoder that supports the given format.
    fn find_encoder(&self, format: TargetFormat) -> Option<&dyn FormatEncoder> {
        self.encoders
            .iter()
            .find(|e| e.supported_formats().contains(&format))
            .map(|e| e.as_ref())
    }

    /// Validate an upload and its form fields, then convert it.
    ///
    /// `form` holds the flat string options (`format`, `resize`, `width`,
    /// `height`, `quality`, `compression`). Nothing is decoded unless
    /// validation passes.
    pub fn convert_upload(
        &self,
        filename: Option<&str>,
        bytes: &[u8],
        form: &HashMap<String, String>,
    ) -> Result<ConversionResult, ConversionError> {
        let requested = form
            .get("format")
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_TARGET_FORMAT);

        let target = validate(filename, requested)?;
        let options = ConvertOptions::from_form(form, target)?;

        self.convert(bytes, options.resize, target, options.encode)
    }

    pub fn convert(
        &self,
        bytes: &[u8],
        resize: ResizeRequest,
        target: TargetFormat,
        options: EncodeOptions,
    ) -> Result<ConversionResult, ConversionError> {
        if !options.applies_to(target) {
            return Err(ConversionError::OptionsMismatch {
                options: options.name(),
                format: target.as_str(),
            });
        }

        let options = options.clamped();

        let encoder = self.find_encoder(target).ok_or_else(|| {
            ConversionError::Encode(format!("no encoder registered for {}", target.as_str()))
        })?;

        let img = self.decode(bytes)?;
        let img = resize_image(img, resize, self.limits.max_pixels)?;
        let img = reconcile_alpha(img, target);

        let (width, height) = (img.width(), img.height());
        let encoded = encoder.encode(&img, target, &options)?;

        log::debug!(
            "Conversion complete: {}x{} {} ({} bytes)",
            width,
            height,
            target.as_str(),
            encoded.len()
        );

        Ok(ConversionResult {
            bytes: encoded,
            mime_type: target.mime_type(),
            filename: generate_filename(target),
            width,
            height,
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, ConversionError> {
        if bytes.len() > self.limits.max_input_bytes {
            return Err(ConversionError::InputTooLarge {
                size: bytes.len(),
                limit: self.limits.max_input_bytes,
            });
        }

        // Header-only probe so oversized images are rejected before allocation.
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ConversionError::Decode(e.to_string()))?;
        if reader.format().is_none() {
            return Err(ConversionError::Decode("unrecognized image format".into()));
        }
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| ConversionError::Decode(e.to_string()))?;
        if u64::from(width) * u64::from(height) > self.limits.max_pixels {
            return Err(ConversionError::ImageTooLarge { width, height });
        }

        let img = image::load_from_memory(bytes)
            .map_err(|e| ConversionError::Decode(e.to_string()))?;

        log::debug!(
            "Decoded image: {}x{} pixels, {:?}",
            img.width(),
            img.height(),
            img.color()
        );

        Ok(img)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Flatten alpha for targets that cannot store it.
fn reconcile_alpha(img: DynamicImage, target: TargetFormat) -> DynamicImage {
    if target.is_jpeg() && img.color().has_alpha() {
        log::debug!("Dropping alpha channel for {} output", target.as_str());
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    }
}

fn generate_filename(target: TargetFormat) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), target.extension())
}

/// Convert with the standard pipeline and default limits.
pub fn convert(
    bytes: &[u8],
    resize: ResizeRequest,
    target: TargetFormat,
    options: EncodeOptions,
) -> Result<ConversionResult, ConversionError> {
    Pipeline::standard().convert(bytes, resize, target, options)
}
