use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::aggregate::ChunkAggregator;
use super::types::{AggregateResult, WorkUnit};
use crate::count::{self, MetricKind};
use crate::parallel::{PoolConfig, WorkerPool};

/// How a single file is cut into per-worker line ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// `file_size / workers` used as the line span of each chunk
    #[default]
    Bytes,
    /// The file's actual line count divided evenly
    Lines,
}

/// The chunks one file is split into
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    pub path: PathBuf,
    pub size: u64,
    pub units: Vec<WorkUnit>,
}

/// Splits one file into line ranges and counts them on one worker each
pub struct ChunkPlanner {
    split: SplitStrategy,
    channel_buffer_multiplier: usize,
}

impl ChunkPlanner {
    pub fn new(split: SplitStrategy, channel_buffer_multiplier: usize) -> Self {
        Self {
            split,
            channel_buffer_multiplier,
        }
    }

    /// Compute the chunks for `file`.
    ///
    /// A single worker gets the whole file as one unit.
    pub fn plan(&self, file: &Path, worker_count: usize) -> Result<ChunkPlan> {
        if worker_count == 0 {
            bail!("Worker count must be greater than 0");
        }
        let size = count::file_size(file)?;

        let units = if worker_count == 1 {
            vec![WorkUnit::WholeFile {
                path: file.to_path_buf(),
            }]
        } else {
            let ranges = match self.split {
                SplitStrategy::Bytes => byte_span_ranges(size, worker_count),
                SplitStrategy::Lines => line_count_ranges(count::line_count(file)?, worker_count),
            };
            ranges
                .into_iter()
                .enumerate()
                .map(|(index, (start_line, end_line))| WorkUnit::FileChunk {
                    path: file.to_path_buf(),
                    index,
                    start_line,
                    end_line,
                })
                .collect()
        };

        info!(
            "Split \"{}\" ({} bytes) into {} chunk(s) by {:?}",
            file.display(),
            size,
            units.len(),
            self.split
        );
        Ok(ChunkPlan {
            path: file.to_path_buf(),
            size,
            units,
        })
    }

    /// Count one file with one worker per chunk and print the merged answer.
    ///
    /// Blocks until every chunk worker has finished. Total and Unique print
    /// one line with the summed count; Occurrence prints each chunk's table as
    /// it completes, then the footer.
    pub fn plan_and_dispatch<W: Write + ?Sized>(
        &self,
        file: &Path,
        worker_count: usize,
        metric: MetricKind,
        out: &mut W,
    ) -> Result<AggregateResult> {
        let plan = self.plan(file, worker_count)?;
        self.dispatch(plan, metric, out)
    }

    pub fn dispatch<W: Write + ?Sized>(
        &self,
        plan: ChunkPlan,
        metric: MetricKind,
        out: &mut W,
    ) -> Result<AggregateResult> {
        let mut aggregator = ChunkAggregator::new(out, plan.path, plan.size, metric);

        if let [unit @ WorkUnit::WholeFile { .. }] = plan.units.as_slice() {
            // Single full pass on the calling thread
            let outcome = count::count_lines(unit.path(), unit.line_range(), metric);
            aggregator.accept(unit, outcome)?;
            return aggregator.finish();
        }

        let pool = WorkerPool::new(PoolConfig {
            workers: plan.units.len(),
            channel_buffer_multiplier: self.channel_buffer_multiplier,
        });
        pool.run(
            plan.units,
            |unit| {
                debug!("Counting {:?} of \"{}\"", unit.line_range(), unit.path().display());
                count::count_lines(unit.path(), unit.line_range(), metric)
            },
            |result| aggregator.accept(&result.item, result.outcome),
        )?;

        aggregator.finish()
    }
}

/// Chunk bounds from the file's byte size, applied as line numbers.
///
/// Chunk `i` covers lines `[i * span, (i + 1) * span)` with `span = size / workers`,
/// except that the first chunk starts at line 1. Lines past `workers * span`
/// belong to no chunk, and a file smaller than `workers` bytes yields only
/// empty chunks.
pub fn byte_span_ranges(size: u64, workers: usize) -> Vec<(usize, usize)> {
    let span = usize::try_from(size / workers as u64).unwrap_or(usize::MAX);
    (0..workers)
        .map(|i| {
            let start = if i == 0 { 1 } else { i.saturating_mul(span) };
            let end = (i + 1).saturating_mul(span);
            (start, end)
        })
        .collect()
}

/// Contiguous ranges covering lines `1..=lines`, sizes differing by at most one
pub fn line_count_ranges(lines: usize, workers: usize) -> Vec<(usize, usize)> {
    let base = lines / workers;
    let extra = lines % workers;
    let mut start = 1;
    (0..workers)
        .map(|i| {
            let len = base + usize::from(i < extra);
            let range = (start, start + len);
            start += len;
            range
        })
        .collect()
}
