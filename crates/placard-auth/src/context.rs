//! The per-request caller identity.

use placard_acl::Sid;

use crate::{AuthError, TokenClaims, derive_sids};

/// An authenticated caller: validated claims plus the SIDs derived from them.
///
/// Built once per request and passed explicitly to every service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    claims: TokenClaims,
    sids: Vec<Sid>,
}

impl SecurityContext {
    /// Build a context, deriving the caller's SIDs.
    pub fn from_claims(claims: TokenClaims) -> Result<Self, AuthError> {
        let sids = derive_sids(&claims)?;
        Ok(Self { claims, sids })
    }

    /// The claims this context was built from.
    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    /// The unique user name (`user/<origin>/<name>` or the plain name).
    pub fn unique_user_name(&self) -> String {
        self.claims.unique_user_name()
    }

    /// Qualify another user's name with this caller's identity zone origin.
    pub fn unique_name_for(&self, user_name: &str) -> String {
        TokenClaims {
            user_name: user_name.to_string(),
            origin: self.claims.origin.clone(),
            ..TokenClaims::default()
        }
        .unique_user_name()
    }

    /// The principal SID, always the first derived SID.
    pub fn principal_sid(&self) -> &Sid {
        // derive_sids never returns an empty set
        &self.sids[0]
    }

    /// Every SID the caller holds, principal first.
    pub fn sids(&self) -> &[Sid] {
        &self.sids
    }

    /// Values of one token attribute.
    pub fn attribute_values(&self, name: &str) -> &[String] {
        self.claims.attribute(name)
    }

    /// Whether the token attribute `name` contains `value`.
    pub fn has_attribute_value(&self, name: &str, value: &str) -> bool {
        self.attribute_values(name).iter().any(|v| v == value)
    }
}
