//! Numeric extraction for profile output lines
//!
//! Extraction happens in two explicit steps: a shape test finds the leading
//! run of the line that looks like values of the active pattern, then each
//! token inside that run is parsed. A token that fails to parse ends the run;
//! it is never reinterpreted as anything else.

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static DECIMAL_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[ ]*[0-9]*\.[0-9]*[ ]*)*").expect("static regex must compile")
});

static DECIMAL_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]*\.[0-9]*").expect("static regex must compile"));

static SCIENTIFIC_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[ ]*[0-9]\.[0-9]{3}E[+-][0-9]{2}[ ]*)*").expect("static regex must compile")
});

static SCIENTIFIC_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]\.[0-9]{3}E[+-][0-9]{2}").expect("static regex must compile")
});

/// Value shape expected under the active heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValuePattern {
    /// Matches nothing; active before any section heading is seen
    #[default]
    Nothing,
    /// Plain decimals such as `10.00000` or `100.0`
    PlainDecimal,
    /// Scientific notation with three fraction digits, e.g. `1.234E+02`
    Scientific,
}

impl ValuePattern {
    fn regexes(self) -> Option<(&'static Regex, &'static Regex)> {
        match self {
            ValuePattern::Nothing => None,
            ValuePattern::PlainDecimal => Some((&DECIMAL_RUN_RE, &DECIMAL_TOKEN_RE)),
            ValuePattern::Scientific => Some((&SCIENTIFIC_RUN_RE, &SCIENTIFIC_TOKEN_RE)),
        }
    }
}

/// Leading part of `line` shaped like a run of `pattern` values
pub fn leading_run(pattern: ValuePattern, line: &str) -> &str {
    match pattern.regexes() {
        Some((run, _)) => run.find(line).map_or("", |m| m.as_str()),
        None => "",
    }
}

/// Values of the leading run of `line`, left to right
pub fn extract_values(pattern: ValuePattern, line: &str) -> Vec<f64> {
    let Some((_, token)) = pattern.regexes() else {
        return Vec::new();
    };

    let mut values = Vec::new();
    for m in token.find_iter(leading_run(pattern, line)) {
        match m.as_str().parse::<f64>() {
            Ok(value) => values.push(value),
            Err(_) => {
                trace!("Dropping malformed value '{}' in line '{}'", m.as_str(), line);
                break;
            }
        }
    }
    values
}
