//! param.inp: fixed-layout model parameters
//!
//! The file holds exactly [`PARAM_LINE_COUNT`] lines. A line ending in `:` is
//! a section header; every other line is a record
//!
//! ```text
//!          SZA =      30.00 : solar zenith angle (deg)
//! ```
//!
//! Files are always rewritten wholesale so the layout AURIC expects is kept.

use crate::constants::{PARAM_FILE, PARAM_INTEGER_KEYS, PARAM_LINE_COUNT, PARAM_TEMPLATE, PARAM_UNSET};
use crate::error::{AuricError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// One `key = value : description` line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamRecord {
    pub key: String,
    pub value: f64,
    pub description: String,
}

impl ParamRecord {
    fn decimals(&self) -> usize {
        if PARAM_INTEGER_KEYS.contains(&self.key.as_str()) || self.value == PARAM_UNSET {
            0
        } else {
            2
        }
    }
}

impl fmt::Display for ParamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>12} = {:>10.prec$} : {}",
            self.key,
            self.value,
            self.description,
            prec = self.decimals()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamEntry {
    /// Section header, kept verbatim
    Section(String),
    Record(ParamRecord),
}

impl fmt::Display for ParamEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamEntry::Section(line) => f.write_str(line),
            ParamEntry::Record(record) => record.fmt(f),
        }
    }
}

/// Contents of a param.inp file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamFile {
    entries: Vec<ParamEntry>,
}

impl ParamFile {
    /// Parse param.inp text
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_named(Path::new(PARAM_FILE), content)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| AuricError::file_access(path, e))?;
        Self::parse_named(path, &content)
    }

    /// The stock layout shipped with AURIC
    pub fn template() -> Result<Self> {
        Self::parse(PARAM_TEMPLATE)
    }

    fn parse_named(path: &Path, content: &str) -> Result<Self> {
        let mut entries = Vec::with_capacity(PARAM_LINE_COUNT);
        for (i, line) in content.lines().enumerate() {
            let entry = if line.trim_end().ends_with(':') {
                ParamEntry::Section(line.to_string())
            } else {
                ParamEntry::Record(parse_record(line).map_err(|reason| {
                    AuricError::InvalidParamLine {
                        path: path.to_path_buf(),
                        line_number: i + 1,
                        reason,
                    }
                })?)
            };
            entries.push(entry);
        }

        if entries.len() != PARAM_LINE_COUNT {
            return Err(AuricError::ParamLayout {
                expected: PARAM_LINE_COUNT,
                found: entries.len(),
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ParamEntry] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &ParamRecord> {
        self.entries.iter().filter_map(|entry| match entry {
            ParamEntry::Record(record) => Some(record),
            ParamEntry::Section(_) => None,
        })
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.records().find(|r| r.key == key).map(|r| r.value)
    }

    /// Record values by key
    pub fn values(&self) -> BTreeMap<String, f64> {
        self.records()
            .map(|r| (r.key.clone(), r.value))
            .collect()
    }

    /// Replace the values of matching keys in place
    ///
    /// Returns the requested keys that are not in the file.
    pub fn modify<'a, I>(&mut self, changes: I) -> Vec<String>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut missing = Vec::new();
        for (key, value) in changes {
            let mut found = false;
            for entry in &mut self.entries {
                if let ParamEntry::Record(record) = entry {
                    if record.key == key {
                        record.value = value;
                        found = true;
                    }
                }
            }
            if !found {
                warn!("Parameter '{}' is not in the parameter file; ignoring it", key);
                missing.push(key.to_string());
            }
        }
        missing
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_string()).map_err(|e| AuricError::file_access(path, e))
    }
}

impl fmt::Display for ParamFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

fn parse_record(line: &str) -> std::result::Result<ParamRecord, String> {
    let (key, rest) = line
        .split_once('=')
        .ok_or_else(|| format!("missing '=' in '{}'", line.trim()))?;
    let (value, description) = rest
        .split_once(':')
        .ok_or_else(|| format!("missing ':' in '{}'", line.trim()))?;

    let key = key.trim();
    if key.is_empty() {
        return Err("empty parameter name".to_string());
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;

    Ok(ParamRecord {
        key: key.to_string(),
        value,
        description: description.trim().to_string(),
    })
}

/// Read a parameter file, change some values and write it back
///
/// Returns the requested keys that were not found.
pub fn update_params<'a, I>(path: impl AsRef<Path>, changes: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let path = path.as_ref();
    let mut params = ParamFile::read(path)?;
    let missing = params.modify(changes);
    params.write(path)?;
    debug!("Updated {}", path.display());
    Ok(missing)
}
