// Trigger severity scale

use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Ordinal trigger severity, as carried in the `priority` field.
///
/// Deserializes from a name (`"average"`) or a priority (`3`, `"3"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Severity {
    NotClassified,
    Information,
    Warning,
    Average,
    High,
    Disaster,
}

impl Severity {
    /// Map a wire priority; values above 5 saturate to `Disaster`.
    pub fn from_priority(priority: u8) -> Self {
        match priority {
            0 => Self::NotClassified,
            1 => Self::Information,
            2 => Self::Warning,
            3 => Self::Average,
            4 => Self::High,
            _ => Self::Disaster,
        }
    }

    pub fn priority(self) -> u8 {
        match self {
            Self::NotClassified => 0,
            Self::Information => 1,
            Self::Warning => 2,
            Self::Average => 3,
            Self::High => 4,
            Self::Disaster => 5,
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u8),
            Str(String),
        }
        let priority = match Raw::deserialize(d)? {
            Raw::Num(n) => n,
            Raw::Str(s) => match s.trim().parse::<u8>() {
                Ok(n) => n,
                Err(_) => return Self::from_str(s.trim()).map_err(D::Error::custom),
            },
        };
        if priority > 5 {
            return Err(D::Error::custom(format!("severity {priority} is out of range 0..=5")));
        }
        Ok(Self::from_priority(priority))
    }
}
