//! # placard-acl
//!
//! Access control lists for Placard.
//!
//! Provides:
//! - [`Permission`]: READ / WRITE / DELETE / ADMINISTRATION bitmask
//! - [`Sid`], [`ObjectIdentity`], [`AccessControlEntry`], [`Acl`]: the data model
//! - [`PermissionGrantingStrategy`]: first-match evaluation with parent inheritance
//! - [`AuditLogger`]: audit sinks for decisions and modifications
//! - [`AclStore`] / [`InMemoryAclStore`]: ACL persistence
//! - [`AclService`]: grant, revoke, check and hierarchy resolution
//!
//! ```
//! use std::sync::Arc;
//! use placard_acl::{AclService, InMemoryAclStore, ObjectIdentity, Permission, Sid};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let service = AclService::new(Arc::new(InMemoryAclStore::new()));
//! let ad = ObjectIdentity::new("advertisement", 1).unwrap();
//! let alice = Sid::principal("alice");
//!
//! service.grant(&ad, &alice, &[Permission::READ], &alice).await.unwrap();
//! assert!(service.has_permission(&ad, &[alice], &[Permission::READ]).await.unwrap());
//! # });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod acl;
mod audit;
mod entry;
pub mod hierarchy;
mod identity;
mod memory;
mod permission;
mod service;
mod sid;
mod store;
mod strategy;

pub use acl::Acl;
pub use audit::{AuditEvent, AuditKind, AuditLogger, ChannelAuditLogger, LogAuditLogger};
pub use entry::AccessControlEntry;
pub use identity::ObjectIdentity;
pub use memory::{AclSnapshot, InMemoryAclStore};
pub use permission::Permission;
pub use service::AclService;
pub use sid::Sid;
pub use store::AclStore;
pub use strategy::{DefaultPermissionGrantingStrategy, PermissionGrantingStrategy};
