//! ACL service: the operations the rest of Placard calls.
//!
//! Wraps an [`AclStore`] with grant/revoke bookkeeping, the granting
//! strategy and audit reporting. Writers to one object identity are
//! serialized through a per-identity async mutex, so concurrent grants
//! through the same service never lose entries; the store's version check
//! catches races between services sharing a store. A lock entry lives only
//! while some writer holds or waits for it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};

use placard_core::{Error, Result};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    Acl, AclStore, AuditLogger, DefaultPermissionGrantingStrategy, LogAuditLogger,
    ObjectIdentity, Permission, PermissionGrantingStrategy, Sid,
};

/// High-level ACL operations over a store.
pub struct AclService<S> {
    store: Arc<S>,
    strategy: Arc<dyn PermissionGrantingStrategy>,
    audit: Arc<dyn AuditLogger>,
    administrative_mode: bool,
    locks: LockTable,
}

type LockTable = SyncMutex<HashMap<ObjectIdentity, Arc<Mutex<()>>>>;

/// Exclusive access to one object identity's ACL.
///
/// Dropping the guard releases the identity and removes its table entry
/// when no other writer references it.
struct IdentityGuard<'a> {
    locks: &'a LockTable,
    identity: ObjectIdentity,
    mutex: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdentityGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the table, one here: nobody else is waiting.
        if Arc::strong_count(&self.mutex) == 2 {
            locks.remove(&self.identity);
        }
    }
}

impl<S: AclStore> AclService<S> {
    /// Create a service that audits through the `log` facade.
    ///
    /// Every permission check reports the deciding entry to the audit sink
    /// unless [`with_administrative_mode`](Self::with_administrative_mode)
    /// turns that off.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_audit(store, Arc::new(LogAuditLogger))
    }

    /// Create a service reporting to `audit`, using the default strategy.
    pub fn with_audit(store: Arc<S>, audit: Arc<dyn AuditLogger>) -> Self {
        let strategy = Arc::new(DefaultPermissionGrantingStrategy::new(audit.clone()));
        Self {
            store,
            strategy,
            audit,
            administrative_mode: false,
            locks: SyncMutex::new(HashMap::new()),
        }
    }

    /// Replace the granting strategy.
    pub fn with_strategy(mut self, strategy: Arc<dyn PermissionGrantingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Turn per-check audit events off (`true`) or on (`false`).
    pub fn with_administrative_mode(mut self, administrative_mode: bool) -> Self {
        self.administrative_mode = administrative_mode;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn lock(&self, identity: &ObjectIdentity) -> IdentityGuard<'_> {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(identity.clone()).or_default().clone()
        };
        let guard = mutex.clone().lock_owned().await;
        IdentityGuard {
            locks: &self.locks,
            identity: identity.clone(),
            mutex,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    async fn load(&self, identity: &ObjectIdentity) -> Result<Acl> {
        self.store
            .read_acl(identity)
            .await?
            .ok_or_else(|| Error::not_found("acl", identity))
    }

    /// Append one granting, audited entry per permission for `sid`.
    ///
    /// The ACL is created with `owner` if the object has none yet. Granting
    /// the same permission twice appends a second entry. Every permission
    /// must be a single bit; nothing is stored when one is not.
    pub async fn grant(
        &self,
        identity: &ObjectIdentity,
        sid: &Sid,
        permissions: &[Permission],
        owner: &Sid,
    ) -> Result<Acl> {
        if permissions.is_empty() {
            return Err(Error::bad_request_field(
                "permissions",
                "at least one permission is required",
            ));
        }
        if let Some(bad) = permissions.iter().find(|p| p.bits().count_ones() != 1) {
            return Err(Error::bad_request_field(
                "permissions",
                format!("each permission must be a single bit, got {bad}"),
            ));
        }

        let _guard = self.lock(identity).await;
        let (mut acl, created) = match self.store.read_acl(identity).await? {
            Some(acl) => (acl, false),
            None => match self.store.create_acl(identity.clone(), owner.clone()).await {
                Ok(acl) => (acl, true),
                // Another service sharing the store got there first.
                Err(Error::AlreadyExists { .. }) => (self.load(identity).await?, false),
                Err(e) => return Err(e),
            },
        };

        let first_new = acl.entries().len();
        let appended = permissions.iter().try_for_each(|permission| {
            let index = acl.entries().len();
            acl.insert_ace(index, *permission, sid.clone(), true)?;
            acl.update_auditing(index, true, true)
        });
        let stored = match appended {
            Ok(()) => self.store.update_acl(&acl).await,
            Err(e) => Err(e),
        };
        let stored = match stored {
            Ok(stored) => stored,
            Err(e) => {
                if created {
                    self.discard_empty(identity).await;
                }
                return Err(e);
            }
        };
        for ace in &stored.entries()[first_new..] {
            self.audit.log_grant_permission(identity, ace);
        }
        log::debug!(
            "Granted {} to {sid} on {identity}",
            Permission::combine(permissions)
        );
        Ok(stored)
    }

    /// Drop an ACL this service created for a grant that then failed.
    async fn discard_empty(&self, identity: &ObjectIdentity) {
        if let Err(e) = self.store.delete_acl(identity, false).await {
            log::warn!("Could not remove empty ACL for {identity}: {e}");
        }
    }

    /// Remove every granting entry for `sid` holding one of `permissions`.
    ///
    /// Denying entries are left alone.
    pub async fn revoke(
        &self,
        identity: &ObjectIdentity,
        sid: &Sid,
        permissions: &[Permission],
    ) -> Result<Acl> {
        if permissions.is_empty() {
            return Err(Error::bad_request_field(
                "permissions",
                "at least one permission is required",
            ));
        }

        let _guard = self.lock(identity).await;
        let mut acl = self.load(identity).await?;
        let removed = acl.remove_granting(sid, permissions);
        let stored = self.store.update_acl(&acl).await?;

        for ace in &removed {
            self.audit.log_remove_permission(identity, ace);
        }
        log::debug!(
            "Revoked {} from {sid} on {identity} ({} entries removed)",
            Permission::combine(permissions),
            removed.len()
        );
        Ok(stored)
    }

    /// Decide whether any of `sids` holds any of `permissions` on `identity`.
    ///
    /// `Ok(false)` means an entry explicitly denied; a missing ACL is
    /// `NotFound` and no applicable entry is `AccessDenied`.
    pub async fn is_granted(
        &self,
        identity: &ObjectIdentity,
        permissions: &[Permission],
        sids: &[Sid],
    ) -> Result<bool> {
        let lineage = self.store.read_acl_lineage(identity).await?;
        self.strategy
            .is_granted(&lineage, permissions, sids, self.administrative_mode)
    }

    /// Boolean form of [`is_granted`](Self::is_granted) for callers that
    /// only need yes or no. Always evaluates in administrative mode.
    pub async fn has_permission(
        &self,
        identity: &ObjectIdentity,
        sids: &[Sid],
        permissions: &[Permission],
    ) -> Result<bool> {
        let lineage = match self.store.read_acl_lineage(identity).await {
            Ok(lineage) => lineage,
            Err(Error::NotFound { .. }) => return Ok(false),
            Err(e) => return Err(e),
        };
        match self.strategy.is_granted(&lineage, permissions, sids, true) {
            Ok(granted) => Ok(granted),
            Err(Error::AccessDenied { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fail with `AccessDenied` unless the request is granted.
    ///
    /// A missing ACL is reported as `AccessDenied` too, so callers cannot
    /// probe for objects they have no rights on.
    pub async fn require(
        &self,
        identity: &ObjectIdentity,
        permissions: &[Permission],
        sids: &[Sid],
    ) -> Result<()> {
        match self.is_granted(identity, permissions, sids).await {
            Ok(true) => Ok(()),
            Ok(false) | Err(Error::NotFound { .. }) | Err(Error::AccessDenied { .. }) => {
                log::warn!(
                    "Denied {} on {identity}",
                    Permission::combine(permissions)
                );
                Err(Error::access_denied(format!(
                    "{} required on {identity}",
                    Permission::combine(permissions)
                )))
            }
            Err(e) => Err(e),
        }
    }

    /// Make `parent` the parent of `identity`. Both ACLs must exist.
    pub async fn set_parent(
        &self,
        identity: &ObjectIdentity,
        parent: &ObjectIdentity,
    ) -> Result<Acl> {
        let _guard = self.lock(identity).await;
        let mut acl = self.load(identity).await?;
        self.load(parent).await?;

        acl.set_parent(Some(parent.clone()))?;
        let stored = self.store.update_acl(&acl).await?;
        log::debug!("Set parent of {identity} to {parent}");
        Ok(stored)
    }

    /// Turn parent inheritance on or off for `identity`.
    pub async fn set_entries_inheriting(
        &self,
        identity: &ObjectIdentity,
        entries_inheriting: bool,
    ) -> Result<Acl> {
        let _guard = self.lock(identity).await;
        let mut acl = self.load(identity).await?;
        acl.set_entries_inheriting(entries_inheriting);
        self.store.update_acl(&acl).await
    }

    /// Read an ACL, failing with `NotFound` when absent.
    pub async fn read_acl(&self, identity: &ObjectIdentity) -> Result<Acl> {
        self.load(identity).await
    }

    /// Delete an ACL (and its subtree when `delete_children` is set).
    pub async fn delete_acl(
        &self,
        identity: &ObjectIdentity,
        delete_children: bool,
    ) -> Result<Vec<ObjectIdentity>> {
        let _guard = self.lock(identity).await;
        let deleted = self.store.delete_acl(identity, delete_children).await?;
        log::debug!("Deleted {} ACLs under {identity}", deleted.len());
        Ok(deleted)
    }

    /// Direct children of `identity`.
    pub async fn find_children(&self, identity: &ObjectIdentity) -> Result<Vec<ObjectIdentity>> {
        self.store.find_children(identity).await
    }

    /// Objects directly granted any bit of `mask` to `sids`, without
    /// following the hierarchy.
    pub async fn find_by_permission(
        &self,
        mask: Permission,
        sids: &[Sid],
    ) -> Result<Vec<ObjectIdentity>> {
        self.store.find_granted(mask, sids).await
    }

    /// Every object reachable with `mask`, directly or through an ancestor.
    pub async fn resolve_hierarchy(
        &self,
        mask: Permission,
        sids: &[Sid],
    ) -> Result<Vec<ObjectIdentity>> {
        let resolved = self.store.resolve_hierarchy(mask, sids).await?;
        log::debug!(
            "Resolved {} objects for {mask} across {} SIDs",
            resolved.len(),
            sids.len()
        );
        Ok(resolved)
    }

    /// Non-principal SID names starting with `prefix`.
    pub async fn sids_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        self.store.sids_with_prefix(prefix).await
    }
}
