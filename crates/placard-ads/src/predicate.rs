//! Composable advertisement query predicates.
//!
//! Predicates are plain data so a repository can translate them into its
//! own query language; [`AdvertisementSpec::matches`] evaluates them in
//! memory.

use placard_core::Result;
use serde::{Deserialize, Serialize};

use crate::{Advertisement, ConfidentialityLevel};

/// A filter over advertisements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvertisementSpec {
    /// Created by the given unique user name.
    CreatedBy(String),
    /// Confidentiality level at or below the given level.
    ConfidentialityAtMost(ConfidentialityLevel),
    /// Has the given id.
    HasId(i64),
    /// Both predicates hold.
    And(Box<AdvertisementSpec>, Box<AdvertisementSpec>),
    /// Either predicate holds.
    Or(Box<AdvertisementSpec>, Box<AdvertisementSpec>),
}

impl AdvertisementSpec {
    /// Created by `user`.
    pub fn is_created_by(user: impl Into<String>) -> Self {
        AdvertisementSpec::CreatedBy(user.into())
    }

    /// Readable with the highest of the given clearances.
    ///
    /// No clearances means [`ConfidentialityLevel::Public`]; an unknown
    /// level name is a `BadRequest`.
    pub fn confidentiality_is_equal_or_less<S: AsRef<str>>(levels: &[S]) -> Result<Self> {
        Ok(AdvertisementSpec::ConfidentialityAtMost(
            ConfidentialityLevel::max_of(levels)?,
        ))
    }

    /// Has `id`.
    pub fn has_id(id: i64) -> Self {
        AdvertisementSpec::HasId(id)
    }

    /// `self AND other`.
    pub fn and(self, other: AdvertisementSpec) -> Self {
        AdvertisementSpec::And(Box::new(self), Box::new(other))
    }

    /// `self OR other`.
    pub fn or(self, other: AdvertisementSpec) -> Self {
        AdvertisementSpec::Or(Box::new(self), Box::new(other))
    }

    /// Evaluate against one advertisement.
    pub fn matches(&self, ad: &Advertisement) -> bool {
        match self {
            AdvertisementSpec::CreatedBy(user) => &ad.metadata.created_by == user,
            AdvertisementSpec::ConfidentialityAtMost(level) => ad.confidentiality_level <= *level,
            AdvertisementSpec::HasId(id) => ad.id == *id,
            AdvertisementSpec::And(a, b) => a.matches(ad) && b.matches(ad),
            AdvertisementSpec::Or(a, b) => a.matches(ad) || b.matches(ad),
        }
    }
}
