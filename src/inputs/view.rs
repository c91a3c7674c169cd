//! view.inp: observer altitude followed by one zenith angle per line

use crate::constants::OBSERVER_ALTITUDE_MARKER;
use crate::error::{AuricError, Result};
use crate::models::ViewGeometry;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// Parse the text of a view file
pub fn parse_view(path: &Path, content: &str) -> Result<ViewGeometry> {
    let mut lines = content.lines();
    let first = lines
        .next()
        .ok_or_else(|| AuricError::invalid_format(path, "empty view file"))?;
    let observer_altitude = first
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .ok_or_else(|| {
            AuricError::invalid_format(path, format!("no observer altitude in '{first}'"))
        })?;

    let mut zenith_angles = Vec::new();
    for (i, line) in lines.enumerate() {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let angle = text.parse::<f64>().map_err(|_| {
            AuricError::invalid_format(path, format!("line {}: bad zenith angle '{text}'", i + 2))
        })?;
        zenith_angles.push(angle);
    }

    Ok(ViewGeometry {
        observer_altitude,
        zenith_angles,
    })
}

pub fn read_view(path: impl AsRef<Path>) -> Result<ViewGeometry> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| AuricError::file_access(path, e))?;
    parse_view(path, &content)
}

/// Render a view file
pub fn format_view(geometry: &ViewGeometry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}   {}",
        space_signed(geometry.observer_altitude, 11, 4),
        OBSERVER_ALTITUDE_MARKER
    );
    for angle in &geometry.zenith_angles {
        let _ = writeln!(out, "{}", space_signed(*angle, 12, 5));
    }
    out
}

pub fn write_view(path: impl AsRef<Path>, geometry: &ViewGeometry) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, format_view(geometry)).map_err(|e| AuricError::file_access(path, e))?;
    debug!(
        "Wrote {} with {} zenith angles",
        path.display(),
        geometry.zenith_angles.len()
    );
    Ok(())
}

/// Fixed-point with a blank where a `+` sign would go
fn space_signed(value: f64, width: usize, precision: usize) -> String {
    let body = if value.is_sign_negative() {
        format!("{value:.precision$}")
    } else {
        format!(" {value:.precision$}")
    };
    format!("{body:>width$}")
}
