use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Extensions accepted for uploaded files. Independent of the output formats.
pub const ALLOWED_INPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Returns true if the path carries one of [`ALLOWED_INPUT_EXTENSIONS`].
pub fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(is_allowed_extension)
        .unwrap_or(false)
}

pub(crate) fn is_allowed_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    ALLOWED_INPUT_EXTENSIONS.contains(&ext.as_str())
}

/// Output codec requested by the caller.
///
/// `Jpg` and `Jpeg` encode identically but keep the caller's spelling for the
/// generated filename and MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Png,
    Jpg,
    Jpeg,
    Webp,
    Gif,
    Bmp,
    Tiff,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 7] = [
        TargetFormat::Png,
        TargetFormat::Jpg,
        TargetFormat::Jpeg,
        TargetFormat::Webp,
        TargetFormat::Gif,
        TargetFormat::Bmp,
        TargetFormat::Tiff,
    ];

    /// Case-insensitive lookup by extension name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "png" => Some(TargetFormat::Png),
            "jpg" => Some(TargetFormat::Jpg),
            "jpeg" => Some(TargetFormat::Jpeg),
            "webp" => Some(TargetFormat::Webp),
            "gif" => Some(TargetFormat::Gif),
            "bmp" => Some(TargetFormat::Bmp),
            "tif" | "tiff" => Some(TargetFormat::Tiff),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpg => "jpg",
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Webp => "webp",
            TargetFormat::Gif => "gif",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Tiff => "tiff",
        }
    }

    /// `image/<extension>`, so `jpg` yields `image/jpg`.
    pub fn mime_type(&self) -> String {
        format!("image/{}", self.extension())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFormat::Png => "PNG",
            TargetFormat::Jpg | TargetFormat::Jpeg => "JPEG",
            TargetFormat::Webp => "WebP",
            TargetFormat::Gif => "GIF",
            TargetFormat::Bmp => "BMP",
            TargetFormat::Tiff => "TIFF",
        }
    }

    pub fn is_jpeg(&self) -> bool {
        matches!(self, TargetFormat::Jpg | TargetFormat::Jpeg)
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            TargetFormat::Png => image::ImageFormat::Png,
            TargetFormat::Jpg | TargetFormat::Jpeg => image::ImageFormat::Jpeg,
            TargetFormat::Webp => image::ImageFormat::WebP,
            TargetFormat::Gif => image::ImageFormat::Gif,
            TargetFormat::Bmp => image::ImageFormat::Bmp,
            TargetFormat::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown target format: {s}"))
    }
}
