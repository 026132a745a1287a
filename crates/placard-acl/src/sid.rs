//! Security identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A security identifier: who an access control entry applies to.
///
/// A principal and an authority with the same name are different SIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Sid {
    /// A single user, identified by their unique principal name.
    Principal(String),
    /// A granted authority: a group, scope, or synthetic attribute SID
    /// such as `ATTR:GROUP=UG_MY_GROUP`.
    Authority(String),
}

impl Sid {
    /// Creates a principal SID.
    pub fn principal(name: impl Into<String>) -> Self {
        Sid::Principal(name.into())
    }

    /// Creates an authority SID.
    pub fn authority(name: impl Into<String>) -> Self {
        Sid::Authority(name.into())
    }

    /// The principal or authority name.
    pub fn name(&self) -> &str {
        match self {
            Sid::Principal(name) | Sid::Authority(name) => name,
        }
    }

    /// Returns `true` for [`Sid::Principal`].
    pub fn is_principal(&self) -> bool {
        matches!(self, Sid::Principal(_))
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sid::Principal(name) => write!(f, "PrincipalSid[{name}]"),
            Sid::Authority(name) => write!(f, "GrantedAuthoritySid[{name}]"),
        }
    }
}
