use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use media_converter_core::format::has_allowed_extension;
use media_converter_core::TargetFormat;

use crate::error::ProcessingError;

/// Collect all convertible image files from the input path.
/// If `recursive` is true, walk subdirectories.
///
/// A file given directly is returned as is so that validation can report it.
pub fn collect_files(input: &Path, recursive: bool) -> Result<Vec<PathBuf>, ProcessingError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    if !input.is_dir() {
        return Err(ProcessingError::ReadFile {
            path: input.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a file or directory"),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files = Vec::new();
    for entry in WalkDir::new(input).max_depth(max_depth).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_allowed_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// `<output_dir>/<input stem>.<target extension>`
pub fn output_path_in(output_dir: &Path, input_file: &Path, target: TargetFormat) -> PathBuf {
    let stem = input_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    output_dir.join(format!("{}.{}", stem, target.extension()))
}

/// One input file of a batch and where its result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Map every convertible file under `inputs` to a path in `output_dir`.
///
/// Files found inside a directory keep their sub-directory relative to it,
/// so `a/x.png` and `b/x.png` land in `out/a/x.webp` and `out/b/x.webp`.
pub fn plan_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    recursive: bool,
    target: TargetFormat,
) -> Result<Vec<BatchEntry>, ProcessingError> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    for root in inputs {
        for file in collect_files(root, recursive)? {
            if !seen.insert(file.clone()) {
                continue;
            }
            let sub_dir = if root.is_dir() {
                file.strip_prefix(root)
                    .ok()
                    .and_then(Path::parent)
                    .map(Path::to_path_buf)
                    .unwrap_or_default()
            } else {
                PathBuf::new()
            };
            let output = output_path_in(&output_dir.join(sub_dir), &file, target);
            entries.push(BatchEntry { input: file, output });
        }
    }
    Ok(entries)
}

/// Split off entries whose output path is claimed by more than one input.
///
/// Every input sharing an output is rejected, so nothing is silently overwritten.
pub fn split_collisions(
    entries: Vec<BatchEntry>,
) -> (Vec<BatchEntry>, Vec<(BatchEntry, ProcessingError)>) {
    let mut claims: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
    for entry in &entries {
        claims
            .entry(entry.output.clone())
            .or_default()
            .push(entry.input.clone());
    }

    let mut unique = Vec::new();
    let mut colliding = Vec::new();
    for entry in entries {
        let owners = &claims[&entry.output];
        match owners.iter().find(|other| **other != entry.input) {
            Some(other) => {
                let err = ProcessingError::OutputCollision {
                    output: entry.output.clone(),
                    other: other.clone(),
                };
                colliding.push((entry, err));
            }
            None => unique.push(entry),
        }
    }

    (unique, colliding)
}

/// Read file contents.
pub fn read_file(path: &Path) -> Result<Vec<u8>, ProcessingError> {
    fs::read(path).map_err(|e| ProcessingError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write file contents, creating parent directories as needed.
pub fn write_file(path: &Path, data: &[u8]) -> Result<(), ProcessingError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ProcessingError::WriteFile {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, data).map_err(|e| ProcessingError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_files_filters_and_recurses() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        for name in ["a.png", "b.JPG", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::write(nested.join("c.webp"), b"x").unwrap();

        let flat = collect_files(dir.path(), false).unwrap();
        assert_eq!(flat.len(), 2);

        let deep = collect_files(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.iter().any(|p| p.ends_with("nested/c.webp")));
    }

    #[test]
    fn test_collect_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_files(&dir.path().join("missing"), false).unwrap_err();
        assert!(matches!(err, ProcessingError::ReadFile { .. }));
    }

    #[test]
    fn test_plan_batch_keeps_sub_directories_and_flags_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("in");
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        for name in ["a/x.png", "b/x.png", "x.png", "x.jpg"] {
            fs::write(root.join(name), b"x").unwrap();
        }
        let out = dir.path().join("out");

        let entries = plan_batch(&[root.clone()], &out, true, TargetFormat::Webp).unwrap();
        assert_eq!(entries.len(), 4);

        let (unique, colliding) = split_collisions(entries);

        let mut outputs: Vec<_> = unique.iter().map(|e| e.output.clone()).collect();
        outputs.sort();
        assert_eq!(outputs, vec![out.join("a/x.webp"), out.join("b/x.webp")]);

        // x.png and x.jpg both want out/x.webp; neither is written.
        assert_eq!(colliding.len(), 2);
        for (entry, err) in &colliding {
            assert_eq!(entry.output, out.join("x.webp"));
            assert!(matches!(err, ProcessingError::OutputCollision { .. }));
        }
    }

    #[test]
    fn test_plan_batch_across_roots_collides() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["one", "two"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("x.png"), b"x").unwrap();
        }
        let roots = vec![dir.path().join("one"), dir.path().join("two")];

        let entries = plan_batch(&roots, Path::new("out"), false, TargetFormat::Png).unwrap();
        let (unique, colliding) = split_collisions(entries);
        assert!(unique.is_empty());
        assert_eq!(colliding.len(), 2);
    }

    #[test]
    fn test_output_path_in() {
        let out = output_path_in(Path::new("out"), Path::new("in/photo.png"), TargetFormat::Jpeg);
        assert_eq!(out, PathBuf::from("out/photo.jpeg"));
    }

    #[test]
    fn test_write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.bin");
        write_file(&path, b"data").unwrap();
        assert_eq!(read_file(&path).unwrap(), b"data");
    }
}
