//! Client platforms and their policy schemas

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mobile platforms whose policy can be updated remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

/// Which policy fields an update payload must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySchema {
    /// `minimal_actual_version`, `force_update`, `latest_version`, `force_off`
    Full,
    /// `minimal_actual_version`, `force_update`
    Minimal,
}

impl PolicySchema {
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Full => &[
                "minimal_actual_version",
                "force_update",
                "latest_version",
                "force_off",
            ],
            Self::Minimal => &["minimal_actual_version", "force_update"],
        }
    }
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::Android];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }

    pub fn schema(self) -> PolicySchema {
        match self {
            Self::Ios => PolicySchema::Full,
            Self::Android => PolicySchema::Minimal,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; the error carries the rejected name.
impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            _ => Err(s.to_string()),
        }
    }
}

/// Lookup key used by the policy table for any platform name.
pub fn platform_key(name: &str) -> String {
    name.to_ascii_lowercase()
}
