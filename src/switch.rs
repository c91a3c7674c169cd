//! ON/OFF switches used by AURIC option files.
//!
//! A switch can be written as text ("ON", "on", "OFF", "off"), as a boolean or
//! as the integers 1 and 0. All of them normalize to one canonical value that
//! is always written back as "ON" or "OFF".

use crate::error::{AuricError, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const ON_TEXT: &[&str] = &["ON", "on"];
const OFF_TEXT: &[&str] = &["OFF", "off"];

/// Canonical boolean switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OptionSwitch(bool);

impl OptionSwitch {
    pub const ON: OptionSwitch = OptionSwitch(true);
    pub const OFF: OptionSwitch = OptionSwitch(false);

    pub fn is_on(self) -> bool {
        self.0
    }

    fn from_text(text: &str) -> Option<Self> {
        if ON_TEXT.contains(&text) {
            Some(Self::ON)
        } else if OFF_TEXT.contains(&text) {
            Some(Self::OFF)
        } else {
            None
        }
    }

    fn from_int(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::ON),
            0 => Some(Self::OFF),
            _ => None,
        }
    }
}

impl From<bool> for OptionSwitch {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<OptionSwitch> for bool {
    fn from(switch: OptionSwitch) -> Self {
        switch.0
    }
}

impl FromStr for OptionSwitch {
    type Err = AuricError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s).ok_or_else(|| AuricError::InvalidSwitch {
            value: s.to_string(),
        })
    }
}

impl TryFrom<&str> for OptionSwitch {
    type Error = AuricError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl TryFrom<i64> for OptionSwitch {
    type Error = AuricError;

    fn try_from(value: i64) -> Result<Self> {
        Self::from_int(value).ok_or_else(|| AuricError::InvalidSwitch {
            value: value.to_string(),
        })
    }
}

impl PartialEq<bool> for OptionSwitch {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

impl PartialEq<OptionSwitch> for bool {
    fn eq(&self, other: &OptionSwitch) -> bool {
        *self == other.0
    }
}

/// Text that is not a switch representation never compares equal
impl PartialEq<&str> for OptionSwitch {
    fn eq(&self, other: &&str) -> bool {
        Self::from_text(other).is_some_and(|s| s == *self)
    }
}

impl PartialEq<OptionSwitch> for &str {
    fn eq(&self, other: &OptionSwitch) -> bool {
        other == self
    }
}

impl PartialEq<i64> for OptionSwitch {
    fn eq(&self, other: &i64) -> bool {
        Self::from_int(*other).is_some_and(|s| s == *self)
    }
}

impl fmt::Display for OptionSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "ON" } else { "OFF" })
    }
}

impl Serialize for OptionSwitch {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OptionSwitch {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SwitchVisitor)
    }
}

struct SwitchVisitor;

impl Visitor<'_> for SwitchVisitor {
    type Value = OptionSwitch;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("one of \"ON\", \"on\", \"OFF\", \"off\", true, false, 1 or 0")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<OptionSwitch, E> {
        Ok(OptionSwitch::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<OptionSwitch, E> {
        OptionSwitch::from_int(v).ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<OptionSwitch, E> {
        i64::try_from(v)
            .ok()
            .and_then(OptionSwitch::from_int)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<OptionSwitch, E> {
        OptionSwitch::from_text(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}
