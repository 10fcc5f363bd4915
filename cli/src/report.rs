use std::path::PathBuf;

/// Result of converting a single file.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub original_size: u64,
    pub converted_size: u64,
    pub error: Option<String>,
}

impl FileResult {
    pub fn failed(path: PathBuf, error: String) -> Self {
        Self {
            path,
            output: None,
            original_size: 0,
            converted_size: 0,
            error: Some(error),
        }
    }

    /// Size change relative to the original; negative when the output grew.
    pub fn savings_pct(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.converted_size as f64 / self.original_size as f64) * 100.0
    }
}

/// Aggregate report for all converted files.
#[derive(Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    fn succeeded(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| r.error.is_none())
    }

    pub fn total_original(&self) -> u64 {
        self.succeeded().map(|r| r.original_size).sum()
    }

    pub fn total_converted(&self) -> u64 {
        self.succeeded().map(|r| r.converted_size).sum()
    }

    pub fn total_savings_pct(&self) -> f64 {
        let orig = self.total_original();
        if orig == 0 {
            return 0.0;
        }
        (1.0 - self.total_converted() as f64 / orig as f64) * 100.0
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }

    pub fn print_summary(&self) {
        println!("\n--- Summary ---");
        println!(
            "Files converted: {} | Errors: {}",
            self.success_count(),
            self.error_count()
        );

        if self.success_count() > 0 {
            println!(
                "Total: {} → {} ({:.1}% change)",
                format_size(self.total_original()),
                format_size(self.total_converted()),
                -self.total_savings_pct()
            );
        }

        for r in &self.results {
            if let Some(ref err) = r.error {
                println!("  ERROR {}: {}", r.path.display(), err);
            }
        }
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(original: u64, converted: u64) -> FileResult {
        FileResult {
            path: PathBuf::from("x.png"),
            output: Some(PathBuf::from("x.webp")),
            original_size: original,
            converted_size: converted,
            error: None,
        }
    }

    #[test]
    fn test_totals_ignore_failures() {
        let mut report = Report::new();
        report.add(ok(1000, 250));
        report.add(ok(1000, 750));
        report.add(FileResult::failed(PathBuf::from("bad.png"), "boom".into()));

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.total_original(), 2000);
        assert_eq!(report.total_converted(), 1000);
        assert!((report.total_savings_pct() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_growth_is_negative_savings() {
        assert!(ok(100, 150).savings_pct() < 0.0);
        assert_eq!(ok(0, 10).savings_pct(), 0.0);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
