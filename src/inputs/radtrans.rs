//! radtrans.opt: one ON/OFF switch per optically thick transition

use crate::constants::{RADTRANS_BANNER, RADTRANS_KEYS, RADTRANS_RULE};
use crate::error::{AuricError, Result};
use crate::switch::OptionSwitch;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

static OPTION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{3,4}) *= (ON|OFF)").expect("static regex must compile")
});

/// Transition key to switch, in the order keys were first set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadtransOptions {
    entries: Vec<(String, OptionSwitch)>,
}

impl RadtransOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<OptionSwitch> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, switch)| *switch)
    }

    /// Set a switch, keeping the position of an existing key
    pub fn set(&mut self, key: impl Into<String>, switch: impl Into<OptionSwitch>) {
        let key = key.into();
        let switch = switch.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = switch,
            None => self.entries.push((key, switch)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, switch: impl Into<OptionSwitch>) -> Self {
        self.set(key, switch);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, OptionSwitch)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any transition is treated as optically thick
    pub fn any_enabled(&self) -> bool {
        self.entries.iter().any(|(_, switch)| switch.is_on())
    }
}

impl<K: Into<String>> FromIterator<(K, OptionSwitch)> for RadtransOptions {
    fn from_iter<I: IntoIterator<Item = (K, OptionSwitch)>>(iter: I) -> Self {
        let mut options = RadtransOptions::new();
        for (key, switch) in iter {
            options.set(key, switch);
        }
        options
    }
}

impl Serialize for RadtransOptions {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

pub fn parse_radtrans_options(content: &str) -> RadtransOptions {
    content
        .lines()
        .filter_map(|line| OPTION_LINE_RE.captures(line))
        .filter_map(|caps| {
            let switch = caps[2].parse::<OptionSwitch>().ok()?;
            Some((caps[1].to_string(), switch))
        })
        .collect()
}

pub fn read_radtrans_options(path: impl AsRef<Path>) -> Result<RadtransOptions> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| AuricError::file_access(path, e))?;
    let options = parse_radtrans_options(&content);
    debug!("Read {} radtrans switches from {}", options.len(), path.display());
    Ok(options)
}

/// Render a radtrans file; keys missing from `options` are written OFF
pub fn format_radtrans_options(options: &RadtransOptions) -> String {
    for (key, _) in options.iter() {
        if !RADTRANS_KEYS.contains(&key) {
            warn!("Radtrans key '{}' is not a known transition and is not written", key);
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{RADTRANS_BANNER}");
    let _ = writeln!(out, "{RADTRANS_RULE}");
    for key in RADTRANS_KEYS {
        let switch = options.get(key).unwrap_or(OptionSwitch::OFF);
        let _ = writeln!(out, "{:9}{key:<4} = {switch}", "");
    }
    let _ = writeln!(out, "{RADTRANS_RULE}");
    out
}

pub fn write_radtrans_options(path: impl AsRef<Path>, options: &RadtransOptions) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, format_radtrans_options(options))
        .map_err(|e| AuricError::file_access(path, e))
}
