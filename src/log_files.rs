//! Local log directory handling: rebuild before each fetch, then list and
//! print what was downloaded.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Section rule used throughout the tool's output.
pub const RULE: &str =
    "======================================================================";

/// Extensions treated as plain text. The empty string means "no extension".
const TEXT_EXTENSIONS: &[&str] = &["log", "txt", "out", ""];

/// A file found in the log directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl LogFile {
    /// Whether the file's contents should be printed.
    pub fn is_text(&self) -> bool {
        let ext = self
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        TEXT_EXTENSIONS.contains(&ext.as_str())
    }
}

/// Local log directory for a notebook.
pub fn log_dir(logs_root: &Path, notebook_name: &str) -> PathBuf {
    logs_root.join(notebook_name)
}

/// Delete `dir` with everything in it, then create it empty.
pub fn reset_log_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        log::debug!("removing {}", dir.display());
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}

/// List every entry of `dir`, dot files included, in name order.
///
/// Returns `None` if the directory does not exist.
pub fn list_log_files(dir: &Path) -> io::Result<Option<Vec<LogFile>>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        files.push(LogFile {
            name,
            path: entry.path(),
            size,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Some(files))
}

/// Print the listing of `dir` followed by the contents of its text files.
///
/// A file that cannot be read is reported and skipped.
pub fn display_logs<W: Write>(dir: &Path, out: &mut W) -> io::Result<()> {
    let files = match list_log_files(dir) {
        Ok(Some(files)) => files,
        Ok(None) => {
            writeln!(out, "\nNo logs directory found - kernel may not have executed yet")?;
            return Ok(());
        }
        Err(e) => {
            writeln!(out, "\nCould not list {}: {}", dir.display(), e)?;
            return Ok(());
        }
    };

    if files.is_empty() {
        writeln!(out, "\nNo log files found in logs directory")?;
        return Ok(());
    }

    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "Found {} file(s) in {}:", files.len(), dir.display())?;
    writeln!(out, "{}", RULE)?;
    for file in &files {
        writeln!(out, "  - {} ({} bytes)", file.name, file.size)?;
    }

    for file in files.iter().filter(|f| f.is_text()) {
        writeln!(out, "\n{}", RULE)?;
        writeln!(out, "Content of: {}", file.name)?;
        writeln!(out, "{}", RULE)?;
        match fs::read_to_string(&file.path) {
            Ok(content) if content.is_empty() => writeln!(out, "(empty file)")?,
            Ok(content) => writeln!(out, "{}", content)?,
            Err(e) => writeln!(out, "Could not read {}: {}", file.name, e)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn render(dir: &Path) -> String {
        let mut out = Vec::new();
        display_logs(dir, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_reset_log_dir_removes_previous_run() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("logs").join("demo");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("old.log"), "stale").unwrap();
        fs::write(dir.join("nested").join("deep.txt"), "stale").unwrap();

        reset_log_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_reset_log_dir_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("logs").join("fresh");
        reset_log_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_is_text() {
        let file = |name: &str| LogFile {
            name: name.to_string(),
            path: PathBuf::from(name),
            size: 0,
        };
        assert!(file("demo.log").is_text());
        assert!(file("notes.txt").is_text());
        assert!(file("run.out").is_text());
        assert!(file("stdout").is_text());
        assert!(!file("submission.csv").is_text());
        assert!(!file("demo.ipynb").is_text());
    }

    #[test]
    fn test_display_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let output = render(&tmp.path().join("nope"));
        assert!(output.contains("No logs directory found"));
    }

    #[test]
    fn test_display_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let output = render(tmp.path());
        assert!(output.contains("No log files found in logs directory"));
    }

    #[test]
    fn test_display_lists_and_prints_text_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("demo.log"), "epoch 1 loss 0.5").unwrap();
        fs::write(tmp.path().join("empty.txt"), "").unwrap();
        fs::write(tmp.path().join("submission.csv"), "id,target\n1,0\n").unwrap();
        fs::write(tmp.path().join(".hidden"), "secret").unwrap();

        let output = render(tmp.path());

        assert!(output.contains("Found 4 file(s)"));
        assert!(output.contains("  - .hidden (6 bytes)"));
        assert!(output.contains("  - demo.log (16 bytes)"));
        assert!(output.contains("  - submission.csv (14 bytes)"));
        assert!(output.contains("Content of: demo.log\n"));
        assert!(output.contains("epoch 1 loss 0.5"));
        assert!(output.contains("Content of: empty.txt"));
        assert!(output.contains("(empty file)"));
        assert!(!output.contains("Content of: submission.csv"));
    }

    #[test]
    fn test_display_lists_dot_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".output"), "run finished").unwrap();

        let output = render(tmp.path());

        assert!(!output.contains("No log files found"));
        assert!(output.contains("Found 1 file(s)"));
        assert!(output.contains("  - .output (12 bytes)"));
    }

    #[test]
    fn test_display_continues_after_unreadable_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.log"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(tmp.path().join("b.log"), "still shown").unwrap();

        let output = render(tmp.path());

        assert!(output.contains("Could not read a.log:"));
        assert!(output.contains("still shown"));
    }
}
