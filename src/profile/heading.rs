//! Heading recognition for profile output files
//!
//! A heading is introduced by any line that starts in the first column. What
//! the heading means is decided by one ordered rule list; the order matters
//! for ambiguous files and must not change.

use regex::Regex;
use std::sync::LazyLock;

/// Heading naming the observer altitude scalar
pub const OBSERVER_ALTITUDE_HEADING: &str = "ZOBS";

/// Heading of the zenith angle section (matched as a substring)
pub const ZENITH_SECTION_HEADING: &str = "Zenith Angles (deg)";

/// Heading of the altitude section (matched as a substring)
pub const ALTITUDE_SECTION_HEADING: &str = "Altitudes (km)";

static TYPE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z][a-z]+").expect("static regex must compile"));

// Wavelength ("1356 A"), transition name ("O+e 832 A", "N2 LBH") or bracketed
// species ("[OI] 6300 A").
static PROFILE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{3,4} A|[A-Z].*[0-9]|\[)").expect("static regex must compile")
});

/// What the active heading says about the lines beneath it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingKind {
    ObserverAltitude,
    ZenithSection,
    AltitudeSection,
    TypeLabel,
    ProfileName(String),
    Unrecognized,
}

/// Heading text introduced by `line`, if the line starts a new heading
///
/// The heading is everything before the first `=`, trimmed. An empty line
/// starts an empty (unrecognized) heading.
pub fn heading_of(line: &str) -> Option<&str> {
    if line.starts_with(' ') {
        return None;
    }
    let end = line.find('=').unwrap_or(line.len());
    Some(line[..end].trim())
}

/// Classify a heading; first matching rule wins
pub fn classify_heading(heading: &str) -> HeadingKind {
    if heading == OBSERVER_ALTITUDE_HEADING {
        HeadingKind::ObserverAltitude
    } else if heading.contains(ZENITH_SECTION_HEADING) {
        HeadingKind::ZenithSection
    } else if heading.contains(ALTITUDE_SECTION_HEADING) {
        HeadingKind::AltitudeSection
    } else if TYPE_LABEL_RE.is_match(heading) {
        HeadingKind::TypeLabel
    } else if PROFILE_NAME_RE.is_match(heading) {
        HeadingKind::ProfileName(heading.to_string())
    } else {
        HeadingKind::Unrecognized
    }
}
