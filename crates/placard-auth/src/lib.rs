//! Authentication primitives for Placard.
//!
//! Provides:
//! - [`TokenClaims`]: the claims of an already validated access token
//! - [`AclAttribute`]: user attributes that map to `ATTR:<NAME>=<value>` SIDs
//! - [`derive_sids`]: the caller's ordered SID set
//! - [`SecurityContext`]: per-request caller identity passed to services
//! - [`AuthError`]: auth-specific error types

mod attribute;
mod claims;
mod context;
mod error;
mod sids;

pub use attribute::AclAttribute;
pub use claims::TokenClaims;
pub use context::SecurityContext;
pub use error::AuthError;
pub use sids::derive_sids;
