//! Text rendering of per-file results.
//!
//! These lines are the program's actual output, so they are written without
//! styling and keep the exact wording scripts may grep for.

use indexmap::IndexMap;
use std::io::{self, Write};
use std::path::Path;

use super::metric::MetricKind;

pub const END_OF_LIST: &str = "• End of list •";

/// `The file "<path>" has <n> [unique ]words, and a total size of <bytes> bytes.`
pub fn write_count<W: Write + ?Sized>(
    out: &mut W,
    path: &Path,
    metric: MetricKind,
    count: usize,
    size: u64,
) -> io::Result<()> {
    let noun = match metric {
        MetricKind::Unique => "unique words",
        _ => "words",
    };
    writeln!(
        out,
        "The file \"{}\" has {} {}, and a total size of {} bytes.",
        path.display(),
        count,
        noun,
        size
    )
}

pub fn write_occurrence_header<W: Write + ?Sized>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "Number of occurrences of each word in \"{}\":", path.display())
}

/// One `<word>: <n> time[s]` row per entry, in table order
pub fn write_occurrence_rows<W: Write + ?Sized>(
    out: &mut W,
    table: &IndexMap<String, usize>,
) -> io::Result<()> {
    for (word, occurrences) in table {
        let unit = if *occurrences == 1 { "time" } else { "times" };
        writeln!(out, "{word}: {occurrences} {unit}")?;
    }
    Ok(())
}

/// Footer closing an occurrence listing
pub fn write_occurrence_footer<W: Write + ?Sized>(
    out: &mut W,
    path: &Path,
    size: u64,
) -> io::Result<()> {
    writeln!(out, "{END_OF_LIST}")?;
    writeln!(out, "Size of \"{}\": {} bytes.", path.display(), size)
}

/// Header, rows and footer of a whole-file listing
pub fn write_occurrences<W: Write + ?Sized>(
    out: &mut W,
    path: &Path,
    table: &IndexMap<String, usize>,
    size: u64,
) -> io::Result<()> {
    write_occurrence_header(out, path)?;
    write_occurrence_rows(out, table)?;
    write_occurrence_footer(out, path, size)
}
