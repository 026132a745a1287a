//! Validated token claims.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::AuthError;

/// The claims of an already validated access token.
///
/// Token decoding and signature checks happen upstream; this type only
/// carries what authorization needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenClaims {
    /// Login name of the user.
    pub user_name: String,
    /// Identity zone origin; part of the unique user name when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Email address, if the token has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Multi-valued user attributes, keyed by attribute name.
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl TokenClaims {
    /// Claims for `user_name` with nothing else set.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    /// Parse claims from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        serde_json::from_str(json).map_err(|e| AuthError::InvalidClaims(e.to_string()))
    }

    /// Set the identity zone origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Add a granted scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Set the values of one attribute, replacing earlier ones.
    pub fn with_attribute<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Values of one attribute; empty when the claim is absent.
    pub fn attribute(&self, name: &str) -> &[String] {
        self.attributes
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the token grants `scope`.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// The user name qualified by origin: `user/<origin>/<name>`, or the
    /// plain name when the token has no origin.
    pub fn unique_user_name(&self) -> String {
        match self.origin.as_deref().filter(|o| !o.trim().is_empty()) {
            Some(origin) => format!("user/{origin}/{}", self.user_name),
            None => self.user_name.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let claims = TokenClaims::from_json(
            r#"{
                "user_name": "alice",
                "origin": "useridp",
                "scopes": ["Display"],
                "attributes": { "group": ["UG_A", "UG_B"] }
            }"#,
        )
        .unwrap();
        assert_eq!(claims.user_name, "alice");
        assert_eq!(claims.attribute("group"), ["UG_A", "UG_B"]);
        assert!(claims.attribute("location").is_empty());
        assert!(claims.has_scope("Display"));
    }

    #[test]
    fn test_from_json_invalid() {
        let err = TokenClaims::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AuthError::InvalidClaims(_)));
    }

    #[test]
    fn test_unique_user_name() {
        assert_eq!(TokenClaims::new("bob").unique_user_name(), "bob");
        assert_eq!(
            TokenClaims::new("bob")
                .with_origin("useridp")
                .unique_user_name(),
            "user/useridp/bob"
        );
        assert_eq!(
            TokenClaims::new("bob").with_origin(" ").unique_user_name(),
            "bob"
        );
    }
}
