//! Auth-specific error types.

/// Errors that can occur while turning token claims into a caller identity.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The claims carry no user name.
    #[error("token missing user name claim")]
    MissingPrincipal,

    /// The claims document could not be parsed.
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// An attribute name that is not one of the ACL attributes.
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
}

impl AuthError {
    /// Whether this error is the caller's fault (vs. a server problem).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingPrincipal
                | AuthError::InvalidClaims(_)
                | AuthError::UnknownAttribute(_)
        )
    }
}

impl From<AuthError> for placard_core::Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingPrincipal => {
                placard_core::Error::access_denied("no authenticated principal")
            }
            AuthError::UnknownAttribute(_) => {
                placard_core::Error::bad_request_field("attribute", err.to_string())
            }
            AuthError::InvalidClaims(_) => placard_core::Error::bad_request(err.to_string()),
        }
    }
}
