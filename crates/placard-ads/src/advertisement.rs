//! The advertisement entity.

use chrono::{DateTime, Utc};
use placard_acl::ObjectIdentity;
use placard_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::ConfidentialityLevel;

/// Object type of advertisement ACLs.
pub const ADVERTISEMENT_TYPE: &str = "advertisement";

/// Object type of bulletin board ACLs.
pub const BULLETINBOARD_TYPE: &str = "bulletinboard";

/// Technical fields maintained by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Optimistic-locking version, bumped on every update.
    pub version: u64,
    /// When the entity was created.
    pub created_at: DateTime<Utc>,
    /// Unique user name of the creator.
    pub created_by: String,
    /// When the entity was last modified.
    pub modified_at: Option<DateTime<Utc>>,
    /// Unique user name of the last modifier.
    pub modified_by: Option<String>,
}

/// A stored advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    /// Repository-assigned id.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// How to reach the advertiser.
    pub contact: String,
    /// Set once the advertisement is published to a bulletin board.
    pub published: bool,
    /// Sensitivity for attribute-based reads.
    pub confidentiality_level: ConfidentialityLevel,
    /// Version and audit fields.
    pub metadata: EntityMetadata,
}

impl Advertisement {
    /// The ACL identity guarding this advertisement.
    pub fn object_identity(&self) -> Result<ObjectIdentity> {
        advertisement_identity(self.id)
    }
}

/// The ACL identity of advertisement `id`.
pub fn advertisement_identity(id: i64) -> Result<ObjectIdentity> {
    ObjectIdentity::new(ADVERTISEMENT_TYPE, id)
}

/// The ACL identity of bulletin board `name`.
pub fn bulletinboard_identity(name: &str) -> Result<ObjectIdentity> {
    ObjectIdentity::new(BULLETINBOARD_TYPE, name)
}

/// Fields supplied when creating an advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdvertisement {
    /// Headline; must not be blank.
    pub title: String,
    /// Contact; must not be blank.
    pub contact: String,
    /// Defaults to [`ConfidentialityLevel::StrictlyConfidential`].
    #[serde(default)]
    pub confidentiality_level: Option<ConfidentialityLevel>,
}

impl NewAdvertisement {
    /// A new advertisement with the default confidentiality level.
    pub fn new(title: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            contact: contact.into(),
            confidentiality_level: None,
        }
    }

    /// Set the confidentiality level.
    pub fn with_confidentiality(mut self, level: ConfidentialityLevel) -> Self {
        self.confidentiality_level = Some(level);
        self
    }

    /// Reject blank mandatory fields.
    pub fn validate(&self) -> Result<()> {
        validate_text("title", &self.title)?;
        validate_text("contact", &self.contact)
    }
}

/// Replacement fields for an existing advertisement.
///
/// `version` is the version the caller read; a stale one yields `Conflict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisementUpdate {
    /// Must match the id being updated.
    pub id: i64,
    /// New headline.
    pub title: String,
    /// New contact.
    pub contact: String,
    /// New level; unchanged when absent.
    #[serde(default)]
    pub confidentiality_level: Option<ConfidentialityLevel>,
    /// Version the caller based the update on.
    pub version: u64,
}

impl AdvertisementUpdate {
    /// Reject blank mandatory fields.
    pub fn validate(&self) -> Result<()> {
        validate_text("title", &self.title)?;
        validate_text("contact", &self.contact)
    }

    /// Copy the updatable fields onto `ad`.
    pub fn apply_to(&self, ad: &mut Advertisement) {
        ad.title.clone_from(&self.title);
        ad.contact.clone_from(&self.contact);
        if let Some(level) = self.confidentiality_level {
            ad.confidentiality_level = level;
        }
        ad.metadata.version = self.version;
    }
}

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::bad_request_field(
            field,
            format!("{field} must not be blank"),
        ));
    }
    Ok(())
}
