use std::path::{Path, PathBuf};
use std::time::Instant;

use ai_team::contexts::{WriteError, WrittenFile};

/// Tracks one batch of file writes into an output directory.
pub struct WriteProgress {
    root: PathBuf,
    total: usize,
    written: usize,
    backups: usize,
    failed: Vec<String>,
    start_time: Instant,
}

impl WriteProgress {
    pub fn new(root: &Path, total: usize) -> Self {
        Self {
            root: root.to_path_buf(),
            total,
            written: 0,
            backups: 0,
            failed: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn start_file(&self, path: &str) {
        println!("Writing: {} ({}/{})", path, self.position(), self.total);
    }

    /// Counts the outcome of one write. Failed paths are kept for the report.
    pub fn record(&mut self, path: &str, outcome: Result<&WrittenFile, &WriteError>) {
        match outcome {
            Ok(written) => {
                self.written += 1;
                if written.backup.is_some() {
                    self.backups += 1;
                }
            }
            Err(_) => self.failed.push(path.to_string()),
        }
    }

    pub fn failed(&self) -> usize {
        self.failed.len()
    }

    pub fn finish(&self) {
        print!("{}", self.report(self.start_time.elapsed().as_secs_f64()));
    }

    fn position(&self) -> usize {
        self.written + self.failed.len() + 1
    }

    fn report(&self, seconds: f64) -> String {
        let rule = "=".repeat(60);
        let mut report = format!("\n{}\nSummary for {}:\n", rule, self.root.display());
        report.push_str(&format!("  Total:     {}\n", self.total));
        report.push_str(&format!("  Written:   {}\n", self.written));
        if self.backups > 0 {
            report.push_str(&format!("  Backups:   {}\n", self.backups));
        }
        report.push_str(&format!("  Failed:    {}\n", self.failed.len()));
        for path in &self.failed {
            report.push_str(&format!("    ✗ {}\n", path));
        }
        report.push_str(&format!("  Duration:  {:.2}s\n{}\n", seconds, rule));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(path: &str, backup: bool) -> WrittenFile {
        WrittenFile {
            path: PathBuf::from(path),
            backup: backup.then(|| PathBuf::from(format!("{}.backup", path))),
        }
    }

    #[test]
    fn test_counts_backups_and_failures() {
        let mut progress = WriteProgress::new(Path::new("out"), 3);
        progress.record("src/a.js", Ok(&written("out/src/a.js", true)));
        progress.record("src/b.js", Ok(&written("out/src/b.js", false)));
        progress.record("../c.js", Err(&WriteError::UnsafePath("../c.js".to_string())));

        assert_eq!(progress.failed(), 1);
        assert_eq!(progress.position(), 4);

        let report = progress.report(0.5);
        assert!(report.contains("Summary for out:"));
        assert!(report.contains("  Written:   2\n"));
        assert!(report.contains("  Backups:   1\n"));
        assert!(report.contains("  Failed:    1\n    ✗ ../c.js\n"));
        assert!(report.contains("  Duration:  0.50s"));
    }

    #[test]
    fn test_backup_line_only_when_backups_were_made() {
        let mut progress = WriteProgress::new(Path::new("."), 1);
        progress.record("src/a.js", Ok(&written("src/a.js", false)));
        assert!(!progress.report(0.0).contains("Backups"));
    }
}
