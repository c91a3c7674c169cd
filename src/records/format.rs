//! Fortran edit-descriptor record grammars
//!
//! AURIC writes its tables with Fortran formats such as `6F12.2` or `6E12.3`.
//! A [`RecordFormat`] reads a line field by field at the widths the format
//! prescribes, so values that touch each other are still separated correctly.

use crate::error::{AuricError, Result};
use std::fmt;
use std::str::FromStr;

/// Numeric edit descriptors that can appear in a record format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// `Fw.d` fixed point
    Fixed,
    /// `Ew.d` / `Dw.d` exponent form
    Exponent,
    /// `Gw.d` generalized
    General,
    /// `Iw` integer
    Integer,
    /// `nX` skipped columns
    Skip,
}

/// One descriptor with its repeat count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditDescriptor {
    pub repeat: usize,
    pub kind: EditKind,
    pub width: usize,
    pub decimals: usize,
}

/// Why a line is not a record of this format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A field's text does not look like a number
    NotNumeric { column: usize, text: String },
    /// A field looked numeric but did not parse
    Unparseable { column: usize, text: String },
}

/// A parsed Fortran record format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFormat {
    source: String,
    descriptors: Vec<EditDescriptor>,
}

impl RecordFormat {
    pub fn descriptors(&self) -> &[EditDescriptor] {
        &self.descriptors
    }

    /// Number of values one record can hold
    pub fn values_per_record(&self) -> usize {
        self.descriptors
            .iter()
            .filter(|d| d.kind != EditKind::Skip)
            .map(|d| d.repeat)
            .sum()
    }

    /// Read one line as a record
    ///
    /// Fields past the end of the line, and blank fields, are absent. Every
    /// present field must pass the numeric shape test and then parse.
    pub fn read(&self, line: &str) -> std::result::Result<Vec<f64>, FieldError> {
        let mut values = Vec::new();
        let mut column = 0;

        for descriptor in &self.descriptors {
            for _ in 0..descriptor.repeat {
                let start = column;
                column += descriptor.width;
                if descriptor.kind == EditKind::Skip || start >= line.len() {
                    continue;
                }

                let end = column.min(line.len());
                let Some(field) = line.get(start..end) else {
                    return Err(FieldError::NotNumeric {
                        column: start,
                        text: String::from_utf8_lossy(&line.as_bytes()[start..]).into_owned(),
                    });
                };
                if let Some(value) = read_field(field, descriptor, start)? {
                    values.push(value);
                }
            }
        }

        Ok(values)
    }
}

fn read_field(
    field: &str,
    descriptor: &EditDescriptor,
    column: usize,
) -> std::result::Result<Option<f64>, FieldError> {
    let text = field.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if !has_numeric_shape(text, descriptor.kind) {
        return Err(FieldError::NotNumeric {
            column,
            text: text.to_string(),
        });
    }

    let unparseable = || FieldError::Unparseable {
        column,
        text: text.to_string(),
    };

    if descriptor.kind == EditKind::Integer {
        return text
            .parse::<i64>()
            .map(|v| Some(v as f64))
            .map_err(|_| unparseable());
    }

    let normalized = text.replace(['D', 'd', 'e'], "E");
    let (mantissa, exponent) = match normalized.split_once('E') {
        Some((mantissa, exponent)) => (mantissa, exponent),
        None => (normalized.as_str(), "0"),
    };

    let literal = if mantissa.contains('.') {
        normalized.clone()
    } else {
        // No decimal point: the last `d` digits are the fraction
        let exponent: i64 = exponent.parse().map_err(|_| unparseable())?;
        format!("{mantissa}E{}", exponent - descriptor.decimals as i64)
    };

    literal
        .parse::<f64>()
        .map(Some)
        .map_err(|_| unparseable())
}

/// Cheap shape test run before any numeric parsing
///
/// Only digits, signs, one decimal point and an exponent marker are allowed,
/// which rules out words like `inf` or `nan` that a float parser accepts.
fn has_numeric_shape(text: &str, kind: EditKind) -> bool {
    let mut digits = 0;
    let mut dots = 0;
    let mut exponents = 0;
    for (i, c) in text.char_indices() {
        match c {
            '0'..='9' => digits += 1,
            '+' | '-' => {
                let prev = text[..i].chars().next_back();
                if i != 0 && !matches!(prev, Some('E' | 'e' | 'D' | 'd')) {
                    return false;
                }
            }
            '.' if kind != EditKind::Integer && exponents == 0 => dots += 1,
            'E' | 'e' | 'D' | 'd' if kind != EditKind::Integer && digits > 0 => exponents += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1 && exponents <= 1
}

impl FromStr for RecordFormat {
    type Err = AuricError;

    /// Parse a format such as `6E12.3`, `(1X,5F10.2)` or `I5,3E12.4`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| AuricError::InvalidDescriptor {
            descriptor: s.to_string(),
            reason: reason.to_string(),
        };

        let body = s.trim().trim_start_matches('(').trim_end_matches(')');
        let mut descriptors = Vec::new();

        for item in body.split(',').map(str::trim) {
            if item.is_empty() {
                return Err(invalid("empty descriptor"));
            }
            let letter_pos = item
                .find(|c: char| c.is_ascii_alphabetic())
                .ok_or_else(|| invalid("missing edit descriptor letter"))?;
            let repeat = match &item[..letter_pos] {
                "" => 1,
                digits => digits.parse().map_err(|_| invalid("bad repeat count"))?,
            };
            let letter = item[letter_pos..]
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .ok_or_else(|| invalid("missing edit descriptor letter"))?;
            let size = &item[letter_pos + 1..];

            let descriptor = if letter == 'X' {
                if !size.is_empty() {
                    return Err(invalid("X takes its width as a repeat count"));
                }
                EditDescriptor {
                    repeat: 1,
                    kind: EditKind::Skip,
                    width: repeat,
                    decimals: 0,
                }
            } else {
                let kind = match letter {
                    'F' => EditKind::Fixed,
                    'E' | 'D' => EditKind::Exponent,
                    'G' => EditKind::General,
                    'I' => EditKind::Integer,
                    _ => return Err(invalid("unsupported edit descriptor")),
                };
                let (width, decimals) = match size.split_once('.') {
                    Some((w, d)) => (w, d.split(['E', 'e']).next().unwrap_or(d)),
                    None if kind == EditKind::Integer => (size, "0"),
                    None => return Err(invalid("missing decimal count")),
                };
                EditDescriptor {
                    repeat,
                    kind,
                    width: width.parse().map_err(|_| invalid("bad field width"))?,
                    decimals: decimals.parse().map_err(|_| invalid("bad decimal count"))?,
                }
            };

            if descriptor.width == 0 || descriptor.repeat == 0 {
                return Err(invalid("zero width or repeat count"));
            }
            descriptors.push(descriptor);
        }

        Ok(Self {
            source: s.trim().to_string(),
            descriptors,
        })
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
