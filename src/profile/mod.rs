//! Parser for AURIC profile output files
//!
//! Profile files (volume emission rates, line-of-sight intensities, view
//! geometry) have no column headers. Section headings start in the first
//! column and every indented line beneath a heading belongs to it. The parser
//! walks the file once, top to bottom:
//!
//! - [`heading`] classifies the active heading with a fixed rule priority
//! - [`extract`] pulls the values shaped like the active pattern out of a line
//!
//! ## Usage
//!
//! ```rust,no_run
//! use auric_processor::profile::read_profile_file;
//!
//! # fn example() -> auric_processor::error::Result<()> {
//! let parsed = read_profile_file("dayglo.ver")?;
//! for name in parsed.profile_names() {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod extract;
pub mod heading;

#[cfg(test)]
mod tests;

pub use extract::ValuePattern;
pub use heading::{HeadingKind, classify_heading, heading_of};

use crate::constants::OBSERVER_ALTITUDE_MARKER;
use crate::error::{AuricError, Result};
use crate::models::{ParsedProfileSet, Profile};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static FIRST_LINE_ALTITUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".[0-9]+\.[0-9]+").expect("static regex must compile"));

static ZOBS_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"= ([0-9]{3}\.[0-9]{3})").expect("static regex must compile"));

/// Array receiving extracted values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    ZenithAngles,
    Altitudes,
    Profile(usize),
}

#[derive(Debug, Default)]
struct ParseState {
    heading: Option<String>,
    target: Option<Target>,
    pattern: ValuePattern,
    out: ParsedProfileSet,
}

impl ParseState {
    fn process_line(&mut self, line: &str) {
        if let Some(heading) = heading_of(line) {
            self.heading = Some(heading.to_string());
        }
        let Some(heading) = self.heading.as_deref() else {
            return;
        };

        match classify_heading(heading) {
            HeadingKind::ObserverAltitude => {
                if let Some(value) = zobs_value(line) {
                    self.out.observer_altitude = Some(value);
                    return;
                }
            }
            HeadingKind::ZenithSection => {
                self.target = Some(Target::ZenithAngles);
                self.pattern = ValuePattern::PlainDecimal;
            }
            HeadingKind::AltitudeSection => {
                self.target = Some(Target::Altitudes);
                self.pattern = ValuePattern::PlainDecimal;
            }
            HeadingKind::TypeLabel => {
                self.out.type_label = Some(heading.to_string());
            }
            HeadingKind::ProfileName(name) => match self.out.profile_index(&name) {
                Some(index) => {
                    self.target = Some(Target::Profile(index));
                    self.pattern = ValuePattern::Scientific;
                }
                None => {
                    debug!("Found profile '{}'", name);
                    self.out.profiles.push(Profile {
                        name,
                        values: Vec::new(),
                    });
                    return;
                }
            },
            HeadingKind::Unrecognized => {}
        }

        let values = extract::extract_values(self.pattern, line);
        if values.is_empty() {
            return;
        }
        match self.target {
            Some(Target::ZenithAngles) => self.out.zenith_angles.extend(values),
            Some(Target::Altitudes) => self.out.altitudes.extend(values),
            Some(Target::Profile(index)) => self.out.profiles[index].values.extend(values),
            None => {}
        }
    }
}

fn zobs_value(line: &str) -> Option<f64> {
    ZOBS_VALUE_RE
        .captures(line)
        .and_then(|caps| caps[1].parse().ok())
}

/// Parse the lines of a profile output file
pub fn parse_profile_lines<S: AsRef<str>>(lines: &[S]) -> ParsedProfileSet {
    let mut state = ParseState::default();
    let Some((first, rest)) = lines.split_first() else {
        return state.out;
    };

    // The first line describes the size of the data, unless it declares the
    // observer altitude of a view file.
    let first = first.as_ref();
    if first.contains(OBSERVER_ALTITUDE_MARKER) {
        state.out.observer_altitude = FIRST_LINE_ALTITUDE_RE
            .find(first)
            .and_then(|m| m.as_str().trim().parse().ok());
        state.heading = Some(heading::ZENITH_SECTION_HEADING.to_string());
    }

    for line in rest {
        state.process_line(line.as_ref());
    }

    debug!(
        "Parsed {} zenith angles, {} altitudes and {} profiles",
        state.out.zenith_angles.len(),
        state.out.altitudes.len(),
        state.out.profiles.len()
    );
    state.out
}

/// Read and parse a profile output file
pub fn read_profile_file(path: impl AsRef<Path>) -> Result<ParsedProfileSet> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| AuricError::file_access(path, e))?;
    let lines: Vec<&str> = content.lines().collect();
    debug!("Parsing profile file {} ({} lines)", path.display(), lines.len());
    Ok(parse_profile_lines(&lines))
}
