//! User attributes that map onto synthetic authority SIDs.

use std::fmt;
use std::str::FromStr;

use placard_acl::Sid;

use crate::AuthError;

/// A token attribute whose values become `ATTR:<NAME>=<value>` SIDs.
///
/// The declaration order is the order in which SIDs are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AclAttribute {
    /// User group membership.
    Group,
    /// Bulletin board membership.
    Bulletinboard,
    /// Office location.
    Location,
}

impl AclAttribute {
    /// Every attribute, in derivation order.
    pub const ALL: [AclAttribute; 3] = [
        AclAttribute::Group,
        AclAttribute::Bulletinboard,
        AclAttribute::Location,
    ];

    /// The claim name, e.g. `group`.
    pub fn attribute_name(self) -> &'static str {
        match self {
            AclAttribute::Group => "group",
            AclAttribute::Bulletinboard => "bulletinboard",
            AclAttribute::Location => "location",
        }
    }

    /// The SID name prefix, e.g. `ATTR:GROUP=`.
    pub fn sid_prefix(self) -> String {
        format!("ATTR:{}=", self.attribute_name().to_uppercase())
    }

    /// The authority SID for one attribute value.
    ///
    /// ```
    /// use placard_auth::AclAttribute;
    ///
    /// let sid = AclAttribute::Group.sid_for_value("UG_MY_GROUP");
    /// assert_eq!(sid.name(), "ATTR:GROUP=UG_MY_GROUP");
    /// ```
    pub fn sid_for_value(self, value: &str) -> Sid {
        Sid::authority(format!("{}{value}", self.sid_prefix()))
    }

    /// Strip this attribute's prefix from a SID name, if it carries it.
    pub fn value_of<'a>(self, sid_name: &'a str) -> Option<&'a str> {
        sid_name
            .strip_prefix(self.sid_prefix().as_str())
            .filter(|value| !value.is_empty())
    }
}

impl fmt::Display for AclAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

impl FromStr for AclAttribute {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.attribute_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AuthError::UnknownAttribute(s.to_string()))
    }
}
