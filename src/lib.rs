//! # pwordcount - Parallel Word Counting
//!
//! Counts words across one or more text files under three metrics: total
//! words, distinct words, and occurrences of each word. The work is spread
//! over a bounded pool of worker threads.
//!
//! ## Dispatch
//!
//! - Several files: whole files are pulled from a queue by up to `workers`
//!   threads, heaviest first when files outnumber workers. Each file's result
//!   is printed as soon as it is done.
//! - One file with several workers: the file is split into line ranges, one
//!   worker per range, and the partial results are merged after all workers
//!   have joined.
//!
//! ## Quick Start
//!
//! ```bash
//! # Unique words in two files with 4 workers
//! pwordcount -m u -p 4 notes.txt book.txt
//! ```
//!
//! ```rust,no_run
//! use pwordcount::count::MetricKind;
//! use pwordcount::dispatch::WorkQueueDistributor;
//!
//! let files: Vec<std::path::PathBuf> = vec!["a.txt".into(), "b.txt".into()];
//! let mut out = std::io::stdout();
//! let summary = WorkQueueDistributor::new(2)
//!     .distribute(&files, 2, MetricKind::Total, &mut out)
//!     .unwrap();
//! assert!(!summary.has_failures());
//! ```

pub mod cli;
pub mod config;
pub mod count;
pub mod dispatch;
pub mod parallel;

pub use cli::{Cli, Output};
pub use config::PwordcountConfig;

/// Result type alias for pwordcount operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
