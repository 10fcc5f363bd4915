//! Image conversion core: validate an upload, decode it, optionally resize
//! it, and re-encode it with format-specific options.

pub mod config;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod processor;
pub mod resize;
pub mod validate;

pub use config::{ConvertOptions, EncodeOptions, PipelineLimits, ResizeRequest};
pub use error::{ConversionError, ValidationError};
pub use format::TargetFormat;
pub use pipeline::{convert, ConversionResult, Pipeline};
pub use validate::validate;
