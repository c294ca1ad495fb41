//! Word counting primitives
//!
//! Everything here is single-threaded: tokenizing a line, folding lines into
//! one of the three metrics, reading a file (or a line range of it) through an
//! engine, and rendering the result lines. The `dispatch` module decides how
//! these run in parallel.

pub mod metric;
pub mod reader;
pub mod report;
pub mod tokenizer;

pub use metric::{MetricEngine, MetricKind, PartialResult};
pub use reader::{LineRange, count_lines, file_size, line_count};
pub use tokenizer::tokenize;
