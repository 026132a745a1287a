//! Persistence seam for ACLs.
//!
//! This module defines the `AclStore` trait that all ACL storage backends
//! implement. Every method works on one consistent snapshot of the store:
//! a lineage or a hierarchy resolution never observes a half-applied write.
//!
//! # Backends
//!
//! - [`InMemoryAclStore`](crate::InMemoryAclStore): `RwLock`-guarded map,
//!   serializable to a JSON state file

use async_trait::async_trait;
use placard_core::Result;

use crate::{Acl, ObjectIdentity, Permission, Sid};

/// Abstract ACL storage.
#[async_trait]
pub trait AclStore: Send + Sync {
    /// Read one ACL, `None` when the object has no ACL.
    async fn read_acl(&self, identity: &ObjectIdentity) -> Result<Option<Acl>>;

    /// Read an ACL followed by its ancestors, nearest first.
    ///
    /// Fails with `NotFound` when `identity` has no ACL. A parent that no
    /// longer exists ends the chain.
    async fn read_acl_lineage(&self, identity: &ObjectIdentity) -> Result<Vec<Acl>>;

    /// Create an empty ACL. Fails with `AlreadyExists` if one is present.
    async fn create_acl(&self, identity: ObjectIdentity, owner: Sid) -> Result<Acl>;

    /// Persist a modified ACL and return the stored copy.
    ///
    /// `acl.version()` must equal the stored version, otherwise `Conflict`.
    /// The parent, if set, must exist and must not make the chain cyclic.
    async fn update_acl(&self, acl: &Acl) -> Result<Acl>;

    /// Delete an ACL, and its whole subtree when `delete_children` is set.
    ///
    /// Returns the deleted identities. Fails with `BadRequest` when children
    /// exist and `delete_children` is not set.
    async fn delete_acl(
        &self,
        identity: &ObjectIdentity,
        delete_children: bool,
    ) -> Result<Vec<ObjectIdentity>>;

    /// Identities whose ACL names `identity` as parent.
    async fn find_children(&self, identity: &ObjectIdentity) -> Result<Vec<ObjectIdentity>>;

    /// Identities directly granted any bit of `mask` to any of `sids`.
    async fn find_granted(&self, mask: Permission, sids: &[Sid]) -> Result<Vec<ObjectIdentity>>;

    /// Directly granted identities plus all their descendants.
    async fn resolve_hierarchy(
        &self,
        mask: Permission,
        sids: &[Sid],
    ) -> Result<Vec<ObjectIdentity>>;

    /// Non-principal SID names that start with `prefix` and are longer than it.
    async fn sids_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}
