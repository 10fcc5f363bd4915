use thiserror::Error;

/// Rejections raised before any decode work happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no file part")]
    NoFile,

    #[error("no file selected")]
    EmptyFilename,

    #[error("invalid file type `{0}`. Allowed formats: PNG, JPG, JPEG, GIF, WebP, BMP")]
    UnsupportedExtension(String),

    #[error("unsupported target format: {0}")]
    UnsupportedTargetFormat(String),

    #[error("invalid value for `{key}`: {value:?}")]
    InvalidOption { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("{options} options cannot be used for {format} output")]
    OptionsMismatch {
        options: &'static str,
        format: &'static str,
    },

    #[error("upload is {size} bytes, limit is {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("image resolution exceeds maximum ({width}x{height})")]
    ImageTooLarge { width: u32, height: u32 },
}

impl ConversionError {
    /// True when the failure was caused by the request rather than by a codec.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InputTooLarge { .. } | Self::ImageTooLarge { .. }
        )
    }
}
