//! Work distribution and result aggregation
//!
//! Two strategies share the same worker pool:
//!
//! - [`WorkQueueDistributor`]: one whole file per pull from a closable queue.
//!   Used for several files, or for any run with a single worker.
//! - [`ChunkPlanner`]: one worker per line range of a single file, with the
//!   partial results folded by a [`ChunkAggregator`] after the join barrier.
//!
//! No result is ever merged across different files.

pub mod aggregate;
pub mod chunk;
pub mod queue;
pub mod types;

pub use aggregate::{ChunkAggregator, emit_file_report};
pub use chunk::{ChunkPlan, ChunkPlanner, SplitStrategy};
pub use queue::{QueuePlan, WorkQueueDistributor};
pub use types::{
    AggregateResult, CountRequest, DispatchSummary, FileReport, ReportedFile, UnitFailure, WorkUnit,
};

/// Which dispatch path a request takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Whole files through the pull queue
    Queue,
    /// Line ranges of the only file, one worker each
    Chunked,
}

impl Strategy {
    /// Exactly one file and more than one worker splits the file; everything
    /// else goes through the queue.
    pub fn select(request: &CountRequest) -> Self {
        if request.files.len() == 1 && request.workers > 1 {
            Strategy::Chunked
        } else {
            Strategy::Queue
        }
    }
}
