//! Output system for pwordcount
//!
//! Dispatch notices and diagnostics go through [`Output`]; result lines are
//! written directly by the dispatch core so they stay unstyled.

use console::style;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a plain notice about how the work is being dispatched
    pub fn notice(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    /// `Using N worker(s)`
    pub fn worker_notice(&self, workers: usize) {
        let noun = if workers == 1 { "worker" } else { "workers" };
        self.notice(&format!("Using {} {}", workers, noun));
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print blank line
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }
}
