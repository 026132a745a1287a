//! Attribute-based access rules.
//!
//! The attribute variant decides access from the caller's token alone:
//! ownership of an advertisement, or a clearance attribute that covers the
//! advertisement's confidentiality level.

use placard_auth::SecurityContext;
use placard_core::Result;

use crate::{Advertisement, AdvertisementSpec, ConfidentialityLevel};

/// Rules evaluated for one caller.
#[derive(Debug, Clone, Copy)]
pub struct AttributeRules<'a> {
    ctx: &'a SecurityContext,
}

impl<'a> AttributeRules<'a> {
    /// Rules for the caller in `ctx`.
    pub fn new(ctx: &'a SecurityContext) -> Self {
        Self { ctx }
    }

    /// Whether the caller created `ad`.
    pub fn is_created_by(&self, ad: &Advertisement) -> bool {
        ad.metadata.created_by == self.ctx.unique_user_name()
    }

    /// Whether the caller's token attribute `name` contains `value`.
    pub fn has_attribute_value(&self, name: &str, value: &str) -> bool {
        let found = self.ctx.has_attribute_value(name, value);
        log::debug!(
            "Has user attribute {name} = {value} ? {found} ({})",
            self.ctx.unique_user_name()
        );
        found
    }

    /// The caller's clearance: the highest `confidentiality_level` value,
    /// [`ConfidentialityLevel::Public`] without one.
    pub fn clearance(&self) -> Result<ConfidentialityLevel> {
        ConfidentialityLevel::max_of(
            self.ctx
                .attribute_values(ConfidentialityLevel::ATTRIBUTE_NAME),
        )
    }

    /// Advertisements the caller may read: own ones, plus everything at or
    /// below their clearance.
    pub fn readable_filter(&self) -> Result<AdvertisementSpec> {
        Ok(AdvertisementSpec::is_created_by(self.ctx.unique_user_name()).or(
            AdvertisementSpec::confidentiality_is_equal_or_less(
                self.ctx
                    .attribute_values(ConfidentialityLevel::ATTRIBUTE_NAME),
            )?,
        ))
    }

    /// [`readable_filter`](Self::readable_filter) narrowed to one id.
    pub fn readable_by_id(&self, id: i64) -> Result<AdvertisementSpec> {
        Ok(AdvertisementSpec::has_id(id).and(self.readable_filter()?))
    }
}
