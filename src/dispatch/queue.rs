use anyhow::{Result, bail};
use std::cmp::Reverse;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::aggregate::emit_file_report;
use super::types::{DispatchSummary, FileReport, UnitFailure, WorkUnit};
use crate::count::{self, LineRange, MetricKind};
use crate::parallel::{PoolConfig, WorkerPool};

/// How a list of files will be handed to the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePlan {
    /// Workers to spawn, never more than there are files
    pub workers: usize,
    /// More files than workers: files wait in the queue, heaviest first
    pub queued: bool,
    /// Files in enqueue order
    pub files: Vec<PathBuf>,
}

/// Hands whole files to a bounded pool of workers through a pull queue
pub struct WorkQueueDistributor {
    channel_buffer_multiplier: usize,
}

impl WorkQueueDistributor {
    pub fn new(channel_buffer_multiplier: usize) -> Self {
        Self {
            channel_buffer_multiplier,
        }
    }

    /// Decide the pool size and the queue order.
    ///
    /// With more files than workers the files are sorted by descending byte
    /// size so the heaviest ones start first. Files whose size cannot be read
    /// sort last and fail when a worker picks them up.
    pub fn plan(&self, files: &[PathBuf], worker_count: usize) -> Result<QueuePlan> {
        if worker_count == 0 {
            bail!("Worker count must be greater than 0");
        }

        let workers = std::cmp::min(worker_count, files.len());
        let queued = files.len() > worker_count;
        let mut files = files.to_vec();
        if queued {
            files.sort_by_cached_key(|path| Reverse(count::file_size(path).unwrap_or(0)));
        }

        info!(
            "Distributing {} file(s) over {} worker(s){}",
            files.len(),
            workers,
            if queued { ", heaviest first" } else { "" }
        );
        Ok(QueuePlan {
            workers,
            queued,
            files,
        })
    }

    /// Count every file of the plan, printing each file's result as soon as
    /// its worker finishes.
    ///
    /// Output order across files is completion order. A file that cannot be
    /// read is recorded as a failure; the remaining files are still counted.
    /// Word tables are dropped once printed, so the summary stays small.
    pub fn run<W: Write + ?Sized>(
        &self,
        plan: QueuePlan,
        metric: MetricKind,
        out: &mut W,
    ) -> Result<DispatchSummary> {
        let mut summary = DispatchSummary {
            workers: plan.workers,
            ..DispatchSummary::default()
        };
        if plan.files.is_empty() {
            return Ok(summary);
        }

        let units: Vec<WorkUnit> = plan
            .files
            .into_iter()
            .map(|path| WorkUnit::WholeFile { path })
            .collect();

        let pool = WorkerPool::new(PoolConfig {
            workers: plan.workers,
            channel_buffer_multiplier: self.channel_buffer_multiplier,
        });
        pool.run(
            units,
            |unit| {
                let path = unit.path();
                let result = count::count_lines(path, LineRange::whole(), metric)?;
                let size = count::file_size(path)?;
                Ok((size, result))
            },
            |work| {
                debug!(
                    "Worker {} finished \"{}\"",
                    work.worker_id,
                    work.item.path().display()
                );
                match work.outcome {
                    Ok((size, result)) => {
                        let report = FileReport {
                            path: work.item.path().to_path_buf(),
                            size,
                            result,
                        };
                        emit_file_report(&mut *out, &report)?;
                        summary.reports.push(report.into());
                    }
                    Err(error) => {
                        warn!("Failed to count \"{}\": {:#}", work.item.path().display(), error);
                        summary.failures.push(UnitFailure::new(&work.item, &error));
                    }
                }
                Ok(())
            },
        )?;

        Ok(summary)
    }

    /// Plan and run in one step
    pub fn distribute<W: Write + ?Sized>(
        &self,
        files: &[PathBuf],
        worker_count: usize,
        metric: MetricKind,
        out: &mut W,
    ) -> Result<DispatchSummary> {
        let plan = self.plan(files, worker_count)?;
        self.run(plan, metric, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::types::ReportedFile;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn distribute(
        files: &[PathBuf],
        workers: usize,
        metric: MetricKind,
    ) -> (DispatchSummary, String) {
        let mut out = Vec::new();
        let summary = WorkQueueDistributor::new(2)
            .distribute(files, workers, metric, &mut out)
            .unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    fn count_for(summary: &DispatchSummary, path: &Path) -> Option<usize> {
        summary
            .reports
            .iter()
            .find(|r| r.path == path)
            .and_then(|r| r.count)
    }

    #[test]
    fn test_plan_clamps_workers_to_file_count() {
        let files: Vec<PathBuf> = vec!["a".into(), "b".into()];
        let plan = WorkQueueDistributor::new(2).plan(&files, 8).unwrap();
        assert_eq!(plan.workers, 2);
        assert!(!plan.queued);
        assert_eq!(plan.files, files);
    }

    #[test]
    fn test_plan_sorts_heaviest_first_when_queued() {
        let dir = TempDir::new().unwrap();
        let small = write(dir.path(), "small.txt", "a");
        let large = write(dir.path(), "large.txt", "a b c d e f g h");
        let medium = write(dir.path(), "medium.txt", "a b c");

        let plan = WorkQueueDistributor::new(2)
            .plan(&[small.clone(), large.clone(), medium.clone()], 2)
            .unwrap();
        assert!(plan.queued);
        assert_eq!(plan.workers, 2);
        assert_eq!(plan.files, vec![large, medium, small]);
    }

    #[test]
    fn test_plan_rejects_zero_workers() {
        assert!(WorkQueueDistributor::new(2).plan(&["a".into()], 0).is_err());
    }

    #[test]
    fn test_cat_sat_on_the_mat_all_metrics() {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "a.txt", "the cat sat on the mat");

        let (summary, out) = distribute(std::slice::from_ref(&file), 1, MetricKind::Total);
        assert_eq!(count_for(&summary, &file), Some(6));
        assert!(out.contains("has 6 words, and a total size of 22 bytes."));

        let (summary, out) = distribute(std::slice::from_ref(&file), 1, MetricKind::Unique);
        assert_eq!(count_for(&summary, &file), Some(5));
        assert!(out.contains("has 5 unique words"));

        let (summary, out) = distribute(std::slice::from_ref(&file), 1, MetricKind::Occurrence);
        assert_eq!(
            summary.reports,
            vec![ReportedFile {
                path: file.clone(),
                size: 22,
                count: None,
            }]
        );
        let rows: Vec<&str> = out.lines().skip(1).take(5).collect();
        assert_eq!(
            rows,
            vec!["the: 2 times", "cat: 1 time", "sat: 1 time", "on: 1 time", "mat: 1 time"]
        );
        assert!(out.contains("• End of list •"));
    }

    #[test]
    fn test_total_is_linear_across_files() {
        let dir = TempDir::new().unwrap();
        let contents = ["one two three\nfour", "five six", "", "seven\n\neight nine ten"];
        let files: Vec<PathBuf> = contents
            .iter()
            .enumerate()
            .map(|(i, c)| write(dir.path(), &format!("f{i}.txt"), c))
            .collect();

        let (summary, _) = distribute(&files, 2, MetricKind::Total);
        let sum: usize = summary.reports.iter().filter_map(|r| r.count).sum();

        let concatenated = write(dir.path(), "all.txt", &contents.join("\n"));
        let (whole, _) = distribute(&[concatenated.clone()], 1, MetricKind::Total);

        assert_eq!(summary.reports.len(), 4);
        assert_eq!(Some(sum), count_for(&whole, &concatenated));
    }

    #[test]
    fn test_each_file_reported_once_with_clamped_pool() {
        let dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..3)
            .map(|i| write(dir.path(), &format!("f{i}.txt"), "x y"))
            .collect();

        let (summary, out) = distribute(&files, 10, MetricKind::Total);
        assert_eq!(summary.workers, 3);
        assert_eq!(summary.reports.len(), 3);
        assert_eq!(out.lines().count(), 3);
        for file in &files {
            assert_eq!(summary.reports.iter().filter(|r| &r.path == file).count(), 1);
        }
    }

    #[test]
    fn test_unreadable_file_does_not_stop_siblings() {
        let dir = TempDir::new().unwrap();
        let good = write(dir.path(), "good.txt", "a b c");
        let missing = dir.path().join("missing.txt");
        let other = write(dir.path(), "other.txt", "d e");

        let files = [good.clone(), missing.clone(), other.clone()];
        let (summary, out) = distribute(&files, 2, MetricKind::Total);

        assert_eq!(summary.reports.len(), 2);
        assert_eq!(count_for(&summary, &good), Some(3));
        assert_eq!(count_for(&summary, &other), Some(2));
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].path, missing);
        assert!(summary.has_failures());
        assert!(!out.contains("missing.txt"));
    }

    #[test]
    fn test_no_files_no_output() {
        let (summary, out) = distribute(&[], 3, MetricKind::Total);
        assert_eq!(summary.workers, 0);
        assert!(summary.reports.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_repeated_runs_give_identical_counts() {
        let dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..5)
            .map(|i| write(dir.path(), &format!("f{i}.txt"), &"w ".repeat(i * 7 + 1)))
            .collect();

        let collect = |summary: DispatchSummary| {
            let mut reports = summary.reports;
            reports.sort_by(|a, b| a.path.cmp(&b.path));
            reports
        };
        let (first, _) = distribute(&files, 3, MetricKind::Unique);
        let (second, _) = distribute(&files, 3, MetricKind::Unique);
        let first = collect(first);
        assert_eq!(first, collect(second));
        assert!(first.iter().all(|r| r.count == Some(1)));
    }
}
