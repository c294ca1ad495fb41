//! Generic parallel execution framework
//!
//! A bounded pool of scoped worker threads consuming a closable queue, with
//! results funneled over a channel to a single collector on the calling
//! thread.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Worker Management**: Spawns `min(workers, items)` scoped threads and joins them all
//! - **Queue Draining**: Workers pull with a blocking `recv`; a closed queue is their stop signal
//! - **Result Collection**: Streams every item's outcome, success or error, to one collector
//!
//! ## What This Module Does NOT Do:
//! - **Domain Logic**: Knows nothing about files, chunks or word metrics
//! - **Ordering**: Results arrive in completion order; callers that need order sort themselves
//! - **Retries**: A failed item is reported once and never re-enqueued
//!
//! ```text
//! ┌──────────┐  work_tx   ┌──────────┐  result_tx  ┌───────────┐
//! │ Producer │──────────▶│ Worker N │────────────▶│ Collector │
//! │ (closes) │  (bounded) │  (recv)  │  (bounded)  │ (caller)  │
//! └──────────┘            └──────────┘             └───────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use pwordcount::parallel::{PoolConfig, WorkerPool};
//!
//! let pool = WorkerPool::new(PoolConfig { workers: 4, ..PoolConfig::default() });
//! let mut total = 0;
//! pool.run(vec![1, 2, 3], |x| Ok(x * 10), |result| {
//!     total += result.outcome?;
//!     Ok(())
//! })
//! .unwrap();
//! assert_eq!(total, 60);
//! ```

pub mod processor;

// Re-export main types for easier access
pub use processor::{PoolConfig, WorkResult, WorkerPool};
