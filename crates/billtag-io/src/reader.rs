//! # Table Reader
//!
//! Reads a tab-separated bill into [`RawLine`]s.
//!
//! ## Format
//! ```text
//! # Dinner at Luigi's          ← comment, skipped
//!                              ← blank, skipped
//! qty  name    tags  total     ← first real row = header
//! 2    Pizza   AB    10,00     ← row → RawLine { number: 4, ... }
//! # split the wine evenly      ← comment, skipped anywhere
//! 1    Wine    ABC   24.00
//! ```
//!
//! Rows are zipped positionally against the header: extra cells are
//! dropped, missing cells are simply absent. Whether the fields make sense
//! is for [`billtag_core::LineItem::from_raw`] to decide.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use billtag_core::RawLine;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// Reads a table from any byte source.
///
/// `RawLine::number` is the physical line in the source, counted the same
/// way for `\n` and `\r\n` endings and across skipped rows.
pub fn read<R: Read>(mut source: R) -> IoResult<Vec<RawLine>> {
    let mut text = String::new();
    source.read_to_string(&mut text)?;

    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All);

    let mut headers: Option<Vec<String>> = None;
    let mut lines = Vec::new();

    for (index, row) in text.lines().enumerate() {
        let number = index + 1;
        let record = match split_row(&builder, row)? {
            Some(record) if !is_skipped(&record) => record,
            _ => continue,
        };

        match &headers {
            None => {
                let names: Vec<String> = record.iter().map(str::to_string).collect();
                debug!(line = number, columns = ?names, "Read table header");
                headers = Some(names);
            }
            Some(names) => {
                let fields = names
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect();
                lines.push(RawLine { number, fields });
            }
        }
    }

    info!(lines = lines.len(), "Table read");
    Ok(lines)
}

/// Opens and reads a table file.
pub fn read_path(path: &Path) -> IoResult<Vec<RawLine>> {
    let file = File::open(path).map_err(|source| IoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(?path, "Opened table");
    read(file)
}

/// Splits one physical line into cells; `None` for an empty line.
fn split_row(builder: &ReaderBuilder, row: &str) -> IoResult<Option<StringRecord>> {
    let mut record = StringRecord::new();
    let found = builder.from_reader(row.as_bytes()).read_record(&mut record)?;
    Ok(found.then_some(record))
}

/// Blank rows and `#` comments.
fn is_skipped(record: &StringRecord) -> bool {
    match record.iter().find(|field| !field.is_empty()) {
        None => true,
        Some(first) => first.starts_with('#'),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
