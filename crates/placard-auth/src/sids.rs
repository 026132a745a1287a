//! Deriving a caller's SIDs from token claims.

use placard_acl::Sid;

use crate::{AclAttribute, AuthError, TokenClaims};

/// Derive the ordered, duplicate-free SID set for a caller.
///
/// The principal SID (the unique user name) comes first, followed by one
/// authority SID per attribute value, attribute by attribute in
/// [`AclAttribute::ALL`] order. Missing attribute claims add nothing.
///
/// ```
/// use placard_acl::Sid;
/// use placard_auth::{derive_sids, TokenClaims};
///
/// let claims = TokenClaims::new("alice").with_attribute("group", ["UG_A"]);
/// let sids = derive_sids(&claims).unwrap();
/// assert_eq!(sids, vec![Sid::principal("alice"), Sid::authority("ATTR:GROUP=UG_A")]);
/// ```
pub fn derive_sids(claims: &TokenClaims) -> Result<Vec<Sid>, AuthError> {
    if claims.user_name.trim().is_empty() {
        return Err(AuthError::MissingPrincipal);
    }

    let mut sids = vec![Sid::principal(claims.unique_user_name())];
    for attribute in AclAttribute::ALL {
        for value in claims.attribute(attribute.attribute_name()) {
            let sid = attribute.sid_for_value(value);
            if !sids.contains(&sid) {
                sids.push(sid);
            }
        }
    }

    log::trace!("Derived {} SIDs for {}", sids.len(), claims.user_name);
    Ok(sids)
}
