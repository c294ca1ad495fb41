use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::count::{LineRange, MetricKind, PartialResult};

/// A unit of work, processed by exactly one worker exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkUnit {
    WholeFile {
        path: PathBuf,
    },
    /// Lines `[start_line, end_line)` of one file, 1-based
    FileChunk {
        path: PathBuf,
        index: usize,
        start_line: usize,
        end_line: usize,
    },
}

impl WorkUnit {
    pub fn path(&self) -> &Path {
        match self {
            WorkUnit::WholeFile { path } | WorkUnit::FileChunk { path, .. } => path,
        }
    }

    pub fn line_range(&self) -> LineRange {
        match self {
            WorkUnit::WholeFile { .. } => LineRange::whole(),
            WorkUnit::FileChunk {
                start_line,
                end_line,
                ..
            } => LineRange::new(*start_line, *end_line),
        }
    }
}

/// Validated input handed to the dispatch core
#[derive(Debug, Clone)]
pub struct CountRequest {
    pub metric: MetricKind,
    pub workers: usize,
    pub files: Vec<PathBuf>,
}

impl CountRequest {
    pub fn new(metric: MetricKind, workers: usize, files: Vec<PathBuf>) -> Result<Self> {
        let request = Self {
            metric,
            workers,
            files,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("Worker count must be greater than 0");
        }
        if self.files.is_empty() {
            bail!("At least one file must be given");
        }
        Ok(())
    }
}

/// A unit that could not be counted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl UnitFailure {
    pub fn new(unit: &WorkUnit, error: &anyhow::Error) -> Self {
        Self {
            path: unit.path().to_path_buf(),
            reason: format!("{error:#}"),
        }
    }
}

/// Final, self-contained result for one whole file
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub size: u64,
    pub result: PartialResult,
}

/// What is kept of a file once its result has been printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedFile {
    pub path: PathBuf,
    pub size: u64,
    /// Total or Unique count; `None` for occurrence listings
    pub count: Option<usize>,
}

impl From<FileReport> for ReportedFile {
    fn from(report: FileReport) -> Self {
        Self {
            count: report.result.count(),
            path: report.path,
            size: report.size,
        }
    }
}

/// Outcome of a queue distribution over many files
#[derive(Debug, Default)]
pub struct DispatchSummary {
    pub workers: usize,
    /// Printed files in completion order, without their word tables
    pub reports: Vec<ReportedFile>,
    pub failures: Vec<UnitFailure>,
}

impl DispatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Outcome of counting one file split into chunks
#[derive(Debug)]
pub struct AggregateResult {
    pub path: PathBuf,
    pub size: u64,
    pub metric: MetricKind,
    pub chunks: usize,
    /// Sum of chunk counts; `None` for occurrence listings or when a chunk failed
    pub total: Option<usize>,
    pub failures: Vec<UnitFailure>,
}

impl AggregateResult {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation() {
        assert!(CountRequest::new(MetricKind::Total, 1, vec!["a.txt".into()]).is_ok());

        let err = CountRequest::new(MetricKind::Total, 0, vec!["a.txt".into()]).unwrap_err();
        assert!(err.to_string().contains("greater than 0"));

        let err = CountRequest::new(MetricKind::Unique, 2, vec![]).unwrap_err();
        assert!(err.to_string().contains("At least one file"));
    }

    #[test]
    fn test_reported_file_drops_the_table() {
        let report = FileReport {
            path: "a.txt".into(),
            size: 9,
            result: PartialResult::Unique(["a".to_string(), "b".to_string()].into()),
        };
        let kept = ReportedFile::from(report);
        assert_eq!(
            kept,
            ReportedFile {
                path: "a.txt".into(),
                size: 9,
                count: Some(2),
            }
        );
    }

    #[test]
    fn test_unit_ranges() {
        let whole = WorkUnit::WholeFile {
            path: "a.txt".into(),
        };
        assert_eq!(whole.line_range(), LineRange::whole());

        let chunk = WorkUnit::FileChunk {
            path: "a.txt".into(),
            index: 1,
            start_line: 10,
            end_line: 20,
        };
        assert_eq!(chunk.line_range(), LineRange::new(10, 20));
        assert_eq!(chunk.path(), Path::new("a.txt"));
    }
}
