use std::collections::HashMap;

use crate::error::ValidationError;
use crate::format::TargetFormat;

pub const DEFAULT_TARGET_FORMAT: &str = "png";
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
pub const DEFAULT_PNG_COMPRESSION: u8 = 6;
pub const DEFAULT_WEBP_QUALITY: u8 = 80;

/// How the decoded image should be resized before encoding.
///
/// Dimensions carried by a variant are always positive; use
/// [`ResizeRequest::from_dimensions`] to build one from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeRequest {
    #[default]
    NoResize,
    Explicit(u32, u32),
    WidthOnly(u32),
    HeightOnly(u32),
}

impl ResizeRequest {
    /// Build a request where zero means "derive from the other side".
    ///
    /// Both sides zero degrades to [`ResizeRequest::NoResize`] with a warning.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        match (width, height) {
            (0, 0) => {
                log::warn!("resize requested without a positive width or height, keeping original size");
                ResizeRequest::NoResize
            }
            (w, 0) => ResizeRequest::WidthOnly(w),
            (0, h) => ResizeRequest::HeightOnly(h),
            (w, h) => ResizeRequest::Explicit(w, h),
        }
    }
}

/// Codec-specific knobs applied in the final encode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOptions {
    /// Quality 1-100
    Jpeg { quality: u8 },
    /// zlib-style level 0-9 (higher = smaller, slower)
    Png { compression_level: u8 },
    /// Quality 1-100
    Webp { quality: u8 },
    Other,
}

impl EncodeOptions {
    pub fn default_for(format: TargetFormat) -> Self {
        match format {
            TargetFormat::Jpg | TargetFormat::Jpeg => EncodeOptions::Jpeg {
                quality: DEFAULT_JPEG_QUALITY,
            },
            TargetFormat::Png => EncodeOptions::Png {
                compression_level: DEFAULT_PNG_COMPRESSION,
            },
            TargetFormat::Webp => EncodeOptions::Webp {
                quality: DEFAULT_WEBP_QUALITY,
            },
            TargetFormat::Gif | TargetFormat::Bmp | TargetFormat::Tiff => EncodeOptions::Other,
        }
    }

    /// JPEG options with `quality` clamped to 1-100.
    pub fn jpeg(quality: i64) -> Self {
        EncodeOptions::Jpeg {
            quality: clamp_knob("quality", quality, 1, 100),
        }
    }

    /// PNG options with `level` clamped to 0-9.
    pub fn png(level: i64) -> Self {
        EncodeOptions::Png {
            compression_level: clamp_knob("compression", level, 0, 9),
        }
    }

    /// WebP options with `quality` clamped to 1-100.
    pub fn webp(quality: i64) -> Self {
        EncodeOptions::Webp {
            quality: clamp_knob("quality", quality, 1, 100),
        }
    }

    /// Re-apply the 1-100 / 0-9 ranges to options built directly from the variants.
    pub fn clamped(self) -> Self {
        match self {
            EncodeOptions::Jpeg { quality } => EncodeOptions::jpeg(i64::from(quality)),
            EncodeOptions::Png { compression_level } => {
                EncodeOptions::png(i64::from(compression_level))
            }
            EncodeOptions::Webp { quality } => EncodeOptions::webp(i64::from(quality)),
            EncodeOptions::Other => EncodeOptions::Other,
        }
    }

    pub fn applies_to(&self, format: TargetFormat) -> bool {
        match self {
            EncodeOptions::Jpeg { .. } => format.is_jpeg(),
            EncodeOptions::Png { .. } => format == TargetFormat::Png,
            EncodeOptions::Webp { .. } => format == TargetFormat::Webp,
            EncodeOptions::Other => {
                matches!(format, TargetFormat::Gif | TargetFormat::Bmp | TargetFormat::Tiff)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EncodeOptions::Jpeg { .. } => "JPEG",
            EncodeOptions::Png { .. } => "PNG",
            EncodeOptions::Webp { .. } => "WebP",
            EncodeOptions::Other => "plain",
        }
    }
}

fn clamp_knob(name: &str, value: i64, min: u8, max: u8) -> u8 {
    let clamped = value.clamp(i64::from(min), i64::from(max));
    if clamped != value {
        log::warn!("{name} {value} is outside {min}-{max}, using {clamped}");
    }
    clamped as u8
}

/// Limits applied before and during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineLimits {
    /// Maximum size of the raw upload in bytes
    pub max_input_bytes: usize,
    /// Maximum pixel count for both the decoded image and the resize target
    pub max_pixels: u64,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: 50 * 1024 * 1024,
            max_pixels: 100_000_000,
        }
    }
}

/// Resize and encode settings parsed from a flat form mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub resize: ResizeRequest,
    pub encode: EncodeOptions,
}

impl ConvertOptions {
    pub fn defaults_for(target: TargetFormat) -> Self {
        Self {
            resize: ResizeRequest::NoResize,
            encode: EncodeOptions::default_for(target),
        }
    }

    /// Parse `resize`, `width`, `height`, `quality` and `compression`.
    ///
    /// Only the knob relevant to `target` is read. Blank or missing numbers
    /// fall back to their defaults; negative dimensions count as absent.
    pub fn from_form(
        form: &HashMap<String, String>,
        target: TargetFormat,
    ) -> Result<Self, ValidationError> {
        let resize = if form_value(form, "resize") == Some("yes") {
            let width = parse_int(form, "width")?.unwrap_or(0);
            let height = parse_int(form, "height")?.unwrap_or(0);
            ResizeRequest::from_dimensions(to_dimension(width), to_dimension(height))
        } else {
            ResizeRequest::NoResize
        };

        let encode = match target {
            TargetFormat::Jpg | TargetFormat::Jpeg => EncodeOptions::jpeg(
                parse_int(form, "quality")?.unwrap_or(i64::from(DEFAULT_JPEG_QUALITY)),
            ),
            TargetFormat::Png => EncodeOptions::png(
                parse_int(form, "compression")?.unwrap_or(i64::from(DEFAULT_PNG_COMPRESSION)),
            ),
            TargetFormat::Webp => EncodeOptions::webp(
                parse_int(form, "quality")?.unwrap_or(i64::from(DEFAULT_WEBP_QUALITY)),
            ),
            TargetFormat::Gif | TargetFormat::Bmp | TargetFormat::Tiff => EncodeOptions::Other,
        };

        Ok(Self { resize, encode })
    }
}

fn form_value<'a>(form: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    form.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn parse_int(form: &HashMap<String, String>, key: &str) -> Result<Option<i64>, ValidationError> {
    form_value(form, key)
        .map(|v| {
            v.parse::<i64>().map_err(|_| ValidationError::InvalidOption {
                key: key.to_string(),
                value: v.to_string(),
            })
        })
        .transpose()
}

fn to_dimension(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_dimensions() {
        assert_eq!(ResizeRequest::from_dimensions(100, 50), ResizeRequest::Explicit(100, 50));
        assert_eq!(ResizeRequest::from_dimensions(200, 0), ResizeRequest::WidthOnly(200));
        assert_eq!(ResizeRequest::from_dimensions(0, 80), ResizeRequest::HeightOnly(80));
        assert_eq!(ResizeRequest::from_dimensions(0, 0), ResizeRequest::NoResize);
    }

    #[test]
    fn test_defaults_per_format() {
        assert_eq!(
            EncodeOptions::default_for(TargetFormat::Jpg),
            EncodeOptions::Jpeg { quality: 90 }
        );
        assert_eq!(
            EncodeOptions::default_for(TargetFormat::Png),
            EncodeOptions::Png { compression_level: 6 }
        );
        assert_eq!(
            EncodeOptions::default_for(TargetFormat::Webp),
            EncodeOptions::Webp { quality: 80 }
        );
        assert_eq!(EncodeOptions::default_for(TargetFormat::Bmp), EncodeOptions::Other);
    }

    #[test]
    fn test_out_of_range_knobs_are_clamped() {
        assert_eq!(EncodeOptions::jpeg(0), EncodeOptions::Jpeg { quality: 1 });
        assert_eq!(EncodeOptions::jpeg(250), EncodeOptions::Jpeg { quality: 100 });
        assert_eq!(EncodeOptions::webp(-3), EncodeOptions::Webp { quality: 1 });
        assert_eq!(EncodeOptions::png(12), EncodeOptions::Png { compression_level: 9 });
        assert_eq!(EncodeOptions::png(-1), EncodeOptions::Png { compression_level: 0 });
        assert_eq!(EncodeOptions::png(4), EncodeOptions::Png { compression_level: 4 });
    }

    #[test]
    fn test_clamped_fixes_raw_variants() {
        assert_eq!(
            EncodeOptions::Webp { quality: 255 }.clamped(),
            EncodeOptions::Webp { quality: 100 }
        );
        assert_eq!(
            EncodeOptions::Jpeg { quality: 0 }.clamped(),
            EncodeOptions::Jpeg { quality: 1 }
        );
        assert_eq!(
            EncodeOptions::Png { compression_level: 200 }.clamped(),
            EncodeOptions::Png { compression_level: 9 }
        );
        assert_eq!(
            EncodeOptions::Png { compression_level: 3 }.clamped(),
            EncodeOptions::Png { compression_level: 3 }
        );
    }

    #[test]
    fn test_applies_to() {
        assert!(EncodeOptions::jpeg(80).applies_to(TargetFormat::Jpeg));
        assert!(EncodeOptions::jpeg(80).applies_to(TargetFormat::Jpg));
        assert!(!EncodeOptions::jpeg(80).applies_to(TargetFormat::Webp));
        assert!(EncodeOptions::Other.applies_to(TargetFormat::Gif));
        assert!(!EncodeOptions::Other.applies_to(TargetFormat::Png));
    }

    #[test]
    fn test_from_form_defaults() {
        let opts = ConvertOptions::from_form(&form(&[]), TargetFormat::Png).unwrap();
        assert_eq!(opts, ConvertOptions::defaults_for(TargetFormat::Png));
    }

    #[test]
    fn test_from_form_resize_only_when_requested() {
        let f = form(&[("resize", "no"), ("width", "100"), ("height", "50")]);
        let opts = ConvertOptions::from_form(&f, TargetFormat::Png).unwrap();
        assert_eq!(opts.resize, ResizeRequest::NoResize);

        let f = form(&[("resize", "yes"), ("width", "100"), ("height", "")]);
        let opts = ConvertOptions::from_form(&f, TargetFormat::Png).unwrap();
        assert_eq!(opts.resize, ResizeRequest::WidthOnly(100));

        let f = form(&[("resize", "yes"), ("width", "-4"), ("height", "60")]);
        let opts = ConvertOptions::from_form(&f, TargetFormat::Png).unwrap();
        assert_eq!(opts.resize, ResizeRequest::HeightOnly(60));
    }

    #[test]
    fn test_from_form_reads_knob_for_target() {
        let f = form(&[("quality", "70"), ("compression", "9")]);
        assert_eq!(
            ConvertOptions::from_form(&f, TargetFormat::Jpeg).unwrap().encode,
            EncodeOptions::Jpeg { quality: 70 }
        );
        assert_eq!(
            ConvertOptions::from_form(&f, TargetFormat::Png).unwrap().encode,
            EncodeOptions::Png { compression_level: 9 }
        );
        assert_eq!(
            ConvertOptions::from_form(&f, TargetFormat::Webp).unwrap().encode,
            EncodeOptions::Webp { quality: 70 }
        );
        assert_eq!(
            ConvertOptions::from_form(&f, TargetFormat::Gif).unwrap().encode,
            EncodeOptions::Other
        );
    }

    #[test]
    fn test_from_form_rejects_non_numeric() {
        let f = form(&[("quality", "high")]);
        let err = ConvertOptions::from_form(&f, TargetFormat::Jpg).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidOption {
                key: "quality".into(),
                value: "high".into()
            }
        );

        // Knobs for other formats are never read.
        assert!(ConvertOptions::from_form(&f, TargetFormat::Png).is_ok());
    }
}
