//! Confidentiality levels for attribute-based access.

use std::fmt;
use std::str::FromStr;

use placard_core::Error;
use serde::{Deserialize, Serialize};

/// How sensitive an advertisement is, ordered from least to most.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidentialityLevel {
    /// Anyone may read.
    Public,
    /// Readable inside the organization.
    Internal,
    /// Restricted audience.
    Confidential,
    /// The most restricted audience; new advertisements start here.
    #[default]
    StrictlyConfidential,
}

impl ConfidentialityLevel {
    /// The token attribute holding a user's clearance.
    pub const ATTRIBUTE_NAME: &'static str = "confidentiality_level";

    /// Every level, lowest first.
    pub const ALL: [ConfidentialityLevel; 4] = [
        ConfidentialityLevel::Public,
        ConfidentialityLevel::Internal,
        ConfidentialityLevel::Confidential,
        ConfidentialityLevel::StrictlyConfidential,
    ];

    /// Numeric rank, `0` for [`Public`](Self::Public).
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Canonical name, as carried in token attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidentialityLevel::Public => "PUBLIC",
            ConfidentialityLevel::Internal => "INTERNAL",
            ConfidentialityLevel::Confidential => "CONFIDENTIAL",
            ConfidentialityLevel::StrictlyConfidential => "STRICTLY_CONFIDENTIAL",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            ConfidentialityLevel::Public => "Public",
            ConfidentialityLevel::Internal => "Internal",
            ConfidentialityLevel::Confidential => "Confidential",
            ConfidentialityLevel::StrictlyConfidential => "Strictly confidential",
        }
    }

    /// Canonical names of every level, lowest first.
    pub fn values() -> Vec<&'static str> {
        Self::ALL.iter().map(|level| level.as_str()).collect()
    }

    /// The highest of the given level names, or [`Public`](Self::Public)
    /// when there are none.
    pub fn max_of<S: AsRef<str>>(names: &[S]) -> Result<Self, Error> {
        names
            .iter()
            .map(|name| name.as_ref().parse::<Self>())
            .try_fold(ConfidentialityLevel::Public, |max, level| {
                level.map(|level| max.max(level))
            })
    }
}

impl fmt::Display for ConfidentialityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidentialityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                Error::bad_request_field(
                    Self::ATTRIBUTE_NAME,
                    format!("unknown confidentiality level '{s}'"),
                )
            })
    }
}
