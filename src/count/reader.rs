use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::metric::{MetricKind, PartialResult};

/// A 1-based line range, `start` inclusive and `end` exclusive.
///
/// `end == None` means "through the last line".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Every line of the file
    pub fn whole() -> Self {
        Self { start: 1, end: None }
    }

    pub fn contains(&self, line_number: usize) -> bool {
        line_number >= self.start && self.end.is_none_or(|end| line_number < end)
    }

    pub fn is_empty(&self) -> bool {
        self.end.is_some_and(|end| end <= self.start)
    }

    fn is_past(&self, line_number: usize) -> bool {
        self.end.is_some_and(|end| line_number >= end)
    }
}

/// Byte size of a file
pub fn file_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata of \"{}\"", path.display()))?;
    Ok(metadata.len())
}

/// Run `metric` over the lines of `path` that fall inside `range`.
///
/// Lines are decoded lossily, so invalid UTF-8 never fails a unit. Reading
/// stops at the first line past the range.
pub fn count_lines(path: &Path, range: LineRange, metric: MetricKind) -> Result<PartialResult> {
    let file =
        File::open(path).with_context(|| format!("Failed to open \"{}\"", path.display()))?;
    let mut engine = metric.engine();
    if range.is_empty() {
        return Ok(engine.finish());
    }

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_number = 0;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read \"{}\"", path.display()))?;
        if read == 0 {
            break;
        }
        line_number += 1;
        if range.is_past(line_number) {
            break;
        }
        if range.contains(line_number) {
            engine.consume_line(&String::from_utf8_lossy(&buf));
        }
    }

    Ok(engine.finish())
}

/// Count the lines of a file, the way `count_lines` numbers them
pub fn line_count(path: &Path) -> Result<usize> {
    let file =
        File::open(path).with_context(|| format!("Failed to open \"{}\"", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut lines = 0;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read \"{}\"", path.display()))?;
        if read == 0 {
            return Ok(lines);
        }
        lines += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_line_range_bounds() {
        let range = LineRange::new(2, 4);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(3));
        assert!(!range.contains(4));
        assert!(LineRange::new(5, 5).is_empty());
        assert!(LineRange::whole().contains(usize::MAX));
    }

    #[test]
    fn test_count_whole_file() {
        let (_dir, path) = fixture("the cat sat\non the mat\n");
        let result = count_lines(&path, LineRange::whole(), MetricKind::Total).unwrap();
        assert_eq!(result, PartialResult::Total(6));
    }

    #[test]
    fn test_count_line_range_only() {
        let (_dir, path) = fixture("one\ntwo two\nthree three three\nfour\n");
        let result = count_lines(&path, LineRange::new(2, 4), MetricKind::Total).unwrap();
        assert_eq!(result, PartialResult::Total(5));
    }

    #[test]
    fn test_last_line_without_newline_is_counted() {
        let (_dir, path) = fixture("a b\nc d e");
        let result = count_lines(&path, LineRange::whole(), MetricKind::Total).unwrap();
        assert_eq!(result, PartialResult::Total(5));
        assert_eq!(line_count(&path).unwrap(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.txt");
        fs::write(&path, b"ok \xff\xfe done\n").unwrap();
        let result = count_lines(&path, LineRange::whole(), MetricKind::Total).unwrap();
        assert_eq!(result, PartialResult::Total(3));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        let err = count_lines(&path, LineRange::whole(), MetricKind::Unique).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
        assert!(file_size(&path).is_err());
    }
}
