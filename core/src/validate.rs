use crate::error::ValidationError;
use crate::format::{is_allowed_extension, TargetFormat};

/// Check an upload's filename and the requested output format.
///
/// Filename checks run first, so a bad upload is reported even when the
/// target format is also wrong. No bytes are inspected.
pub fn validate(filename: Option<&str>, target: &str) -> Result<TargetFormat, ValidationError> {
    let filename = filename.ok_or(ValidationError::NoFile)?;

    if filename.is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if !allowed_file(filename) {
        return Err(ValidationError::UnsupportedExtension(filename.to_string()));
    }

    TargetFormat::from_name(target)
        .ok_or_else(|| ValidationError::UnsupportedTargetFormat(target.to_string()))
}

/// True if the suffix after the last `.` is an allowed input extension.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| is_allowed_extension(ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        assert_eq!(validate(None, "png"), Err(ValidationError::NoFile));
    }

    #[test]
    fn test_empty_filename() {
        assert_eq!(validate(Some(""), "png"), Err(ValidationError::EmptyFilename));
    }

    #[test]
    fn test_unsupported_extension() {
        for name in ["notes.txt", "archive.tar.gz", "noextension", "photo.", "image.tiff", ".png.exe"] {
            assert_eq!(
                validate(Some(name), "png"),
                Err(ValidationError::UnsupportedExtension(name.to_string())),
                "{name}"
            );
        }
    }

    #[test]
    fn test_allowed_extensions_any_case() {
        for name in ["a.png", "b.JPG", "c.jpeg", "d.Gif", "e.webp", "f.BMP", "my.holiday.png"] {
            assert!(allowed_file(name), "{name}");
        }
    }

    #[test]
    fn test_target_format_checked_separately() {
        // tiff is not an allowed input extension but is a legal output
        assert_eq!(validate(Some("scan.png"), "tiff"), Ok(TargetFormat::Tiff));
        assert_eq!(
            validate(Some("scan.png"), "svg"),
            Err(ValidationError::UnsupportedTargetFormat("svg".to_string()))
        );
    }

    #[test]
    fn test_filename_checked_before_target() {
        assert_eq!(
            validate(Some("notes.txt"), "svg"),
            Err(ValidationError::UnsupportedExtension("notes.txt".to_string()))
        );
    }

    #[test]
    fn test_target_is_case_insensitive() {
        assert_eq!(validate(Some("x.gif"), "JPG"), Ok(TargetFormat::Jpg));
    }
}
