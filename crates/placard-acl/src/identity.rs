//! Object identities: the `(type, identifier)` key of a securable object.

use std::fmt;

use placard_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Identifies one securable object instance.
///
/// The identifier is opaque to the ACL engine; numeric ids are kept in their
/// decimal string form so every identity shares one total order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectIdentity {
    object_type: String,
    identifier: String,
}

impl ObjectIdentity {
    /// Creates an object identity, rejecting blank type or identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use placard_acl::ObjectIdentity;
    ///
    /// let oid = ObjectIdentity::new("advertisement", 42).unwrap();
    /// assert_eq!(oid.identifier(), "42");
    /// assert_eq!(oid.to_string(), "advertisement:42");
    /// assert!(ObjectIdentity::new(" ", 1).is_err());
    /// ```
    pub fn new(object_type: impl Into<String>, identifier: impl ToString) -> Result<Self> {
        let object_type = object_type.into();
        let identifier = identifier.to_string();
        if object_type.trim().is_empty() {
            return Err(Error::bad_request_field("type", "object type must not be blank"));
        }
        if identifier.trim().is_empty() {
            return Err(Error::bad_request_field(
                "identifier",
                "object identifier must not be blank",
            ));
        }
        Ok(Self {
            object_type,
            identifier,
        })
    }

    /// The object type, e.g. `advertisement` or `bulletinboard`.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// The opaque identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The identifier parsed as a numeric id, if it is one.
    pub fn numeric_id(&self) -> Option<i64> {
        self.identifier.parse().ok()
    }

    /// Returns `true` if this identity names an object of `object_type`.
    pub fn is_type(&self, object_type: &str) -> bool {
        self.object_type == object_type
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.identifier)
    }
}
