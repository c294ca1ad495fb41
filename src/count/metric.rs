use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::tokenizer::{count_words, tokenize};

/// Which of the three word metrics to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Total number of words
    #[default]
    #[value(name = "t", alias = "total")]
    #[serde(alias = "t")]
    Total,
    /// Number of distinct words
    #[value(name = "u", alias = "unique")]
    #[serde(alias = "u")]
    Unique,
    /// Number of occurrences of each distinct word
    #[value(name = "o", alias = "occurrence")]
    #[serde(alias = "o")]
    Occurrence,
}

impl MetricKind {
    /// Fresh engine for one unit of work
    pub fn engine(self) -> Box<dyn MetricEngine> {
        match self {
            MetricKind::Total => Box::new(TotalEngine::default()),
            MetricKind::Unique => Box::new(UniqueEngine::default()),
            MetricKind::Occurrence => Box::new(OccurrenceEngine::default()),
        }
    }

    /// Whether chunk results of this metric are summed into a single count
    pub fn is_summed(self) -> bool {
        !matches!(self, MetricKind::Occurrence)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricKind::Total => "total",
            MetricKind::Unique => "unique",
            MetricKind::Occurrence => "occurrence",
        };
        f.write_str(name)
    }
}

/// Output of one engine over one unit of work, before any merge
#[derive(Debug, Clone, PartialEq)]
pub enum PartialResult {
    Total(usize),
    Unique(HashSet<String>),
    /// Word to occurrences, in the order words were first seen
    Occurrence(IndexMap<String, usize>),
}

impl PartialResult {
    pub fn metric(&self) -> MetricKind {
        match self {
            PartialResult::Total(_) => MetricKind::Total,
            PartialResult::Unique(_) => MetricKind::Unique,
            PartialResult::Occurrence(_) => MetricKind::Occurrence,
        }
    }

    /// The summable count carried by Total and Unique results.
    ///
    /// Occurrence tables are never summed and yield `None`.
    pub fn count(&self) -> Option<usize> {
        match self {
            PartialResult::Total(words) => Some(*words),
            PartialResult::Unique(seen) => Some(seen.len()),
            PartialResult::Occurrence(_) => None,
        }
    }
}

/// Line-at-a-time consumer producing a [`PartialResult`]
pub trait MetricEngine: Send {
    fn consume_line(&mut self, line: &str);

    fn finish(self: Box<Self>) -> PartialResult;
}

#[derive(Debug, Default)]
pub struct TotalEngine {
    words: usize,
}

impl MetricEngine for TotalEngine {
    fn consume_line(&mut self, line: &str) {
        self.words += count_words(line);
    }

    fn finish(self: Box<Self>) -> PartialResult {
        PartialResult::Total(self.words)
    }
}

#[derive(Debug, Default)]
pub struct UniqueEngine {
    seen: HashSet<String>,
}

impl MetricEngine for UniqueEngine {
    fn consume_line(&mut self, line: &str) {
        for word in tokenize(line) {
            if !self.seen.contains(word) {
                self.seen.insert(word.to_string());
            }
        }
    }

    fn finish(self: Box<Self>) -> PartialResult {
        PartialResult::Unique(self.seen)
    }
}

#[derive(Debug, Default)]
pub struct OccurrenceEngine {
    table: IndexMap<String, usize>,
}

impl MetricEngine for OccurrenceEngine {
    fn consume_line(&mut self, line: &str) {
        for word in tokenize(line) {
            match self.table.get_mut(word) {
                Some(count) => *count += 1,
                None => {
                    self.table.insert(word.to_string(), 1);
                }
            }
        }
    }

    fn finish(self: Box<Self>) -> PartialResult {
        PartialResult::Occurrence(self.table)
    }
}
