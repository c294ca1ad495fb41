//! Merging and reporting of partial results.
//!
//! Whole-file results are printed as they arrive and never combined with
//! other files. Chunk results of one file are folded by a [`ChunkAggregator`]
//! living on the collector thread, which replaces a counter shared between
//! workers: every chunk sends its partial result and only the collector
//! touches the running total.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use super::types::{AggregateResult, FileReport, UnitFailure, WorkUnit};
use crate::count::{MetricKind, PartialResult, report};

/// Print one file's independent, final result
pub fn emit_file_report<W: Write + ?Sized>(out: &mut W, file: &FileReport) -> Result<()> {
    let written = match &file.result {
        PartialResult::Occurrence(table) => {
            report::write_occurrences(out, &file.path, table, file.size)
        }
        other => {
            let count = other.count().unwrap_or_default();
            report::write_count(out, &file.path, other.metric(), count, file.size)
        }
    };
    written.context("Failed to write result")?;
    out.flush().context("Failed to write result")
}

/// Accumulates the chunk results of a single file until the join barrier
pub struct ChunkAggregator<'w, W: Write + ?Sized> {
    out: &'w mut W,
    path: PathBuf,
    size: u64,
    metric: MetricKind,
    accumulated: usize,
    received: usize,
    header_written: bool,
    failures: Vec<UnitFailure>,
}

impl<'w, W: Write + ?Sized> ChunkAggregator<'w, W> {
    pub fn new(out: &'w mut W, path: PathBuf, size: u64, metric: MetricKind) -> Self {
        Self {
            out,
            path,
            size,
            metric,
            accumulated: 0,
            received: 0,
            header_written: false,
            failures: Vec::new(),
        }
    }

    /// Fold in one chunk's outcome.
    ///
    /// Counts are summed. Occurrence tables are printed straight away as a
    /// partial view of the file, under a header written before the first rows
    /// whichever chunk finishes first.
    pub fn accept(&mut self, unit: &WorkUnit, outcome: Result<PartialResult>) -> Result<()> {
        self.received += 1;
        let partial = match outcome {
            Ok(partial) => partial,
            Err(error) => {
                debug!("Chunk {:?} failed: {:#}", unit, error);
                self.failures.push(UnitFailure::new(unit, &error));
                return Ok(());
            }
        };

        match partial {
            PartialResult::Occurrence(table) => {
                self.write_header()?;
                report::write_occurrence_rows(&mut *self.out, &table)
                    .context("Failed to write result")?;
                self.out.flush().context("Failed to write result")?;
            }
            other => {
                self.accumulated += other.count().unwrap_or_default();
            }
        }
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            report::write_occurrence_header(&mut *self.out, &self.path)
                .context("Failed to write result")?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Runs after every chunk worker has joined: prints the closing line(s)
    pub fn finish(mut self) -> Result<AggregateResult> {
        let total = if self.metric.is_summed() && self.failures.is_empty() {
            report::write_count(&mut *self.out, &self.path, self.metric, self.accumulated, self.size)
                .context("Failed to write result")?;
            Some(self.accumulated)
        } else {
            None
        };
        if !self.metric.is_summed() {
            // Only writes when no chunk produced a table
            self.write_header()?;
            report::write_occurrence_footer(&mut *self.out, &self.path, self.size)
                .context("Failed to write result")?;
        }
        self.out.flush().context("Failed to write result")?;

        Ok(AggregateResult {
            path: self.path,
            size: self.size,
            metric: self.metric,
            chunks: self.received,
            total,
            failures: self.failures,
        })
    }
}
