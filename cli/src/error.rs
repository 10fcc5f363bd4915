use std::path::PathBuf;
use thiserror::Error;

use media_converter_core::ConversionError;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("refusing to overwrite input file {0}")]
    OutputIsInput(PathBuf),

    #[error("output {output} would also be written by {other}")]
    OutputCollision { output: PathBuf, other: PathBuf },

    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
