use std::collections::HashMap;
use std::path::{Path, PathBuf};

use media_converter_core::{ConversionResult, Pipeline, TargetFormat};

use crate::error::ProcessingError;
use crate::io::read_file;
use crate::report::FileResult;

/// Read, validate and convert one file without writing anything.
///
/// The file name goes through the same validation as a web upload.
pub fn convert_path(
    pipeline: &Pipeline,
    input: &Path,
    form: &HashMap<String, String>,
) -> Result<ConversionResult, ProcessingError> {
    let filename = input.file_name().map(|n| n.to_string_lossy());
    let data = read_file(input)?;
    let result = pipeline.convert_upload(filename.as_deref(), &data, form)?;
    Ok(result)
}

/// Convert one file and write it to `output_path`.
pub fn convert_file(
    pipeline: &Pipeline,
    input: &Path,
    output_path: &Path,
    form: &HashMap<String, String>,
) -> Result<FileResult, ProcessingError> {
    if same_file(input, output_path) {
        return Err(ProcessingError::OutputIsInput(input.to_path_buf()));
    }

    let original_size = input
        .metadata()
        .map_err(|e| ProcessingError::ReadFile {
            path: input.to_path_buf(),
            source: e,
        })?
        .len();

    let converted = convert_path(pipeline, input, form)?;
    crate::io::write_file(output_path, &converted.bytes)?;

    log::debug!(
        "{} → {} ({}x{}, {})",
        input.display(),
        output_path.display(),
        converted.width,
        converted.height,
        converted.mime_type
    );

    Ok(FileResult {
        path: input.to_path_buf(),
        output: Some(output_path.to_path_buf()),
        original_size,
        converted_size: converted.bytes.len() as u64,
        error: None,
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Where `convert` writes its result.
///
/// `output` with an extension is used verbatim; otherwise it is a directory
/// (default: the input's directory) receiving `<stem>.<extension>`.
pub fn resolve_single_output(input: &Path, output: Option<&Path>, target: TargetFormat) -> PathBuf {
    match output {
        Some(out) if out.extension().is_some() && !out.is_dir() => out.to_path_buf(),
        Some(dir) => crate::io::output_path_in(dir, input, target),
        None => input.with_extension(target.extension()),
    }
}
