//! Parser for AURIC stacked-block output files
//!
//! These files end with one or more data blocks, each a heading followed by
//! fixed-width rows. Above the data sits a title heading, and above that an
//! index block naming the axis the data is laid out against. Anything higher
//! up is free text.
//!
//! The only reliable way to tell a heading from a row is to try reading the
//! line as a record, so the file is walked from the bottom up:
//!
//! 1. Data phase: rows accumulate until a heading closes them into a column.
//!    A heading with no rows pending is the title.
//! 2. Index phase: rows accumulate under the index grammar until the first
//!    heading, which names the index axis.

pub mod format;

#[cfg(test)]
mod tests;

pub use format::{EditDescriptor, EditKind, FieldError, RecordFormat};

use crate::constants::{DEFAULT_DATA_FORMAT, DEFAULT_INDEX_FORMAT};
use crate::error::{AuricError, Result};
use crate::models::{Column, TabularDataset};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Reads stacked-block files with a pair of record grammars
#[derive(Debug, Clone)]
pub struct StackedRecordReader {
    index_format: RecordFormat,
    data_format: RecordFormat,
}

impl Default for StackedRecordReader {
    fn default() -> Self {
        Self::with_formats(DEFAULT_INDEX_FORMAT, DEFAULT_DATA_FORMAT)
            .expect("default record formats must parse")
    }
}

impl StackedRecordReader {
    pub fn new(index_format: RecordFormat, data_format: RecordFormat) -> Self {
        Self {
            index_format,
            data_format,
        }
    }

    /// Build a reader from Fortran format strings
    pub fn with_formats(index_format: &str, data_format: &str) -> Result<Self> {
        Ok(Self::new(index_format.parse()?, data_format.parse()?))
    }

    pub fn index_format(&self) -> &RecordFormat {
        &self.index_format
    }

    pub fn data_format(&self) -> &RecordFormat {
        &self.data_format
    }

    /// Read and parse a stacked-block file
    pub fn read(&self, path: impl AsRef<Path>) -> Result<TabularDataset> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| AuricError::file_access(path, e))?;
        let lines: Vec<&str> = content.lines().collect();
        debug!("Parsing stacked file {} ({} lines)", path.display(), lines.len());
        self.parse_lines(path, &lines)
    }

    /// Parse the lines of a stacked-block file
    ///
    /// `path` only names the source in the result and in errors.
    pub fn parse_lines<S: AsRef<str>>(
        &self,
        path: impl AsRef<Path>,
        lines: &[S],
    ) -> Result<TabularDataset> {
        let path = path.as_ref();
        let mut remaining: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
        let mut pending: Vec<Vec<f64>> = Vec::new();
        let mut columns = Vec::new();

        let title = loop {
            let line = remaining.pop().ok_or_else(|| {
                AuricError::invalid_format(path, "ran out of lines before the data title")
            })?;
            match self.data_format.read(line) {
                Ok(row) => pending.push(row),
                Err(reason) => {
                    trace!("Heading line '{}': {:?}", line, reason);
                    let heading = line.trim().to_string();
                    if pending.is_empty() {
                        break heading;
                    }
                    if columns.iter().any(|c: &Column| c.name == heading) {
                        return Err(AuricError::invalid_format(
                            path,
                            format!("data block '{heading}' appears more than once"),
                        ));
                    }
                    columns.push(stack_rows(heading, &mut pending));
                }
            }
        };
        columns.reverse();

        let index = loop {
            let line = remaining.pop().ok_or_else(|| {
                AuricError::invalid_format(path, "ran out of lines before the index heading")
            })?;
            match self.index_format.read(line) {
                Ok(row) => pending.push(row),
                Err(_) if pending.is_empty() => {
                    return Err(AuricError::invalid_format(
                        path,
                        format!("index block under '{}' is empty", line.trim()),
                    ));
                }
                Err(_) => break stack_rows(line.trim().to_string(), &mut pending),
            }
        };

        for column in &columns {
            if column.values.len() != index.values.len() {
                warn!(
                    "Column '{}' has {} values but index '{}' has {}",
                    column.name,
                    column.values.len(),
                    index.name,
                    index.values.len()
                );
            }
        }

        debug!(
            "Parsed '{}': {} columns against {} '{}' values",
            title,
            columns.len(),
            index.values.len(),
            index.name
        );

        Ok(TabularDataset {
            source: source_name(path),
            title,
            index,
            columns,
            info: remaining.iter().map(|line| line.to_string()).collect(),
            raw_lines: lines.iter().map(|line| line.as_ref().to_string()).collect(),
        })
    }
}

/// Close the rows read so far (bottom first) into a column in file order
fn stack_rows(name: String, pending: &mut Vec<Vec<f64>>) -> Column {
    let values = pending.drain(..).rev().flatten().collect();
    Column { name, values }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a stacked-block file with the default grammars
pub fn read_stacked_file(path: impl AsRef<Path>) -> Result<TabularDataset> {
    StackedRecordReader::default().read(path)
}
