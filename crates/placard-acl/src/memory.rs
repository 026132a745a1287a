//! In-memory ACL store.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use async_trait::async_trait;
use placard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::hierarchy::{self, ChildIndex};
use crate::{Acl, AclStore, ObjectIdentity, Permission, Sid};

/// Serializable contents of an [`InMemoryAclStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclSnapshot {
    /// Every ACL, in identity order.
    pub acls: Vec<Acl>,
}

/// ACL store backed by a `BTreeMap` behind a tokio `RwLock`.
///
/// Reads that span several ACLs (lineages, hierarchy resolution) hold one
/// read guard for their whole duration, so they always see a consistent
/// snapshot. Writes take the write guard and check versions.
#[derive(Debug, Default)]
pub struct InMemoryAclStore {
    acls: RwLock<BTreeMap<ObjectIdentity, Acl>>,
}

impl InMemoryAclStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(snapshot: AclSnapshot) -> Result<Self> {
        let mut acls = BTreeMap::new();
        for acl in snapshot.acls {
            let identity = acl.identity().clone();
            if acls.insert(identity.clone(), acl).is_some() {
                return Err(Error::already_exists("acl", identity));
            }
        }
        Ok(Self {
            acls: RwLock::new(acls),
        })
    }

    /// Copy the current contents out.
    pub async fn snapshot(&self) -> AclSnapshot {
        let acls = self.acls.read().await;
        AclSnapshot {
            acls: acls.values().cloned().collect(),
        }
    }

    /// Load a store from a JSON state file; a missing file yields an empty
    /// store.
    pub fn load_state_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No ACL state at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let snapshot: AclSnapshot = serde_json::from_str(&json)?;
        log::debug!(
            "Loaded {} ACLs from {}",
            snapshot.acls.len(),
            path.display()
        );
        Self::from_snapshot(snapshot)
    }

    /// Write the store to a JSON state file, creating parent directories.
    pub async fn save_state_file(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot().await;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
            }
        }

        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json).map_err(|e| Error::io_with_path(e, path))?;

        log::debug!("Saved {} ACLs to {}", snapshot.acls.len(), path.display());
        Ok(())
    }
}

/// Whether pointing `identity` at `parent` would close a loop.
fn creates_cycle(
    acls: &BTreeMap<ObjectIdentity, Acl>,
    identity: &ObjectIdentity,
    parent: &ObjectIdentity,
) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(parent);
    while let Some(oid) = current {
        if oid == identity {
            return true;
        }
        if !seen.insert(oid) {
            // Existing data already loops; refuse to extend it.
            return true;
        }
        current = acls.get(oid).and_then(Acl::parent);
    }
    false
}

#[async_trait]
impl AclStore for InMemoryAclStore {
    async fn read_acl(&self, identity: &ObjectIdentity) -> Result<Option<Acl>> {
        let acls = self.acls.read().await;
        Ok(acls.get(identity).cloned())
    }

    async fn read_acl_lineage(&self, identity: &ObjectIdentity) -> Result<Vec<Acl>> {
        let acls = self.acls.read().await;
        let head = acls
            .get(identity)
            .ok_or_else(|| Error::not_found("acl", identity))?;

        let mut seen = HashSet::new();
        seen.insert(head.identity());
        let mut lineage = vec![head.clone()];
        let mut next = head.parent();

        while let Some(parent) = next {
            if !seen.insert(parent) {
                log::warn!("ACL parent chain of {identity} loops at {parent}");
                break;
            }
            let Some(acl) = acls.get(parent) else {
                log::debug!("ACL parent {parent} of {identity} no longer exists");
                break;
            };
            lineage.push(acl.clone());
            next = acl.parent();
        }

        Ok(lineage)
    }

    async fn create_acl(&self, identity: ObjectIdentity, owner: Sid) -> Result<Acl> {
        let mut acls = self.acls.write().await;
        if acls.contains_key(&identity) {
            return Err(Error::already_exists("acl", identity));
        }
        let acl = Acl::new(identity.clone(), owner);
        acls.insert(identity, acl.clone());
        Ok(acl)
    }

    async fn update_acl(&self, acl: &Acl) -> Result<Acl> {
        let mut acls = self.acls.write().await;
        let identity = acl.identity();

        let stored_version = acls
            .get(identity)
            .map(Acl::version)
            .ok_or_else(|| Error::not_found("acl", identity))?;
        if stored_version != acl.version() {
            return Err(Error::conflict(
                "acl",
                identity,
                acl.version(),
                stored_version,
            ));
        }

        if let Some(parent) = acl.parent() {
            if !acls.contains_key(parent) {
                return Err(Error::not_found("acl", parent));
            }
            if creates_cycle(&acls, identity, parent) {
                return Err(Error::bad_request_field(
                    "parent",
                    format!("setting {parent} as parent of {identity} creates a cycle"),
                ));
            }
        }

        let mut updated = acl.clone();
        updated.set_version(stored_version + 1);
        acls.insert(identity.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete_acl(
        &self,
        identity: &ObjectIdentity,
        delete_children: bool,
    ) -> Result<Vec<ObjectIdentity>> {
        let mut acls = self.acls.write().await;
        if !acls.contains_key(identity) {
            return Err(Error::not_found("acl", identity));
        }

        let index = ChildIndex::from_acls(acls.values());
        if !delete_children && !index.children_of(identity).is_empty() {
            return Err(Error::bad_request(format!(
                "{identity} has child ACLs; delete them first or delete recursively"
            )));
        }

        let subtree = hierarchy::accessible_closure([identity.clone()], &index);
        for oid in &subtree {
            acls.remove(oid);
        }
        Ok(subtree)
    }

    async fn find_children(&self, identity: &ObjectIdentity) -> Result<Vec<ObjectIdentity>> {
        let acls = self.acls.read().await;
        let children: BTreeSet<ObjectIdentity> = acls
            .values()
            .filter(|acl| acl.parent() == Some(identity))
            .map(|acl| acl.identity().clone())
            .collect();
        Ok(children.into_iter().collect())
    }

    async fn find_granted(&self, mask: Permission, sids: &[Sid]) -> Result<Vec<ObjectIdentity>> {
        let acls = self.acls.read().await;
        Ok(hierarchy::direct_grants(acls.values(), mask, sids))
    }

    async fn resolve_hierarchy(
        &self,
        mask: Permission,
        sids: &[Sid],
    ) -> Result<Vec<ObjectIdentity>> {
        let acls = self.acls.read().await;
        Ok(hierarchy::resolve(acls.values(), mask, sids))
    }

    async fn sids_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let acls = self.acls.read().await;
        let names: BTreeSet<String> = acls
            .values()
            .flat_map(|acl| acl.entries().iter().map(|ace| ace.sid()))
            .filter(|sid| !sid.is_principal())
            .map(Sid::name)
            .filter(|name| name.len() > prefix.len() && name.starts_with(prefix))
            .map(str::to_string)
            .collect();
        Ok(names.into_iter().collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn oid(t: &str, id: impl ToString) -> ObjectIdentity {
        ObjectIdentity::new(t, id).unwrap()
    }

    async fn create(store: &InMemoryAclStore, identity: &ObjectIdentity) -> Acl {
        store
            .create_acl(identity.clone(), Sid::principal("owner"))
            .await
            .unwrap()
    }

    async fn link(store: &InMemoryAclStore, child: &ObjectIdentity, parent: &ObjectIdentity) {
        let mut acl = store.read_acl(child).await.unwrap().unwrap();
        acl.set_parent(Some(parent.clone())).unwrap();
        store.update_acl(&acl).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_and_read() {
        let store = InMemoryAclStore::new();
        let ad = oid("advertisement", 1);
        create(&store, &ad).await;

        assert!(store.read_acl(&ad).await.unwrap().is_some());
        assert!(store.read_acl(&oid("advertisement", 2)).await.unwrap().is_none());

        let err = store
            .create_acl(ad.clone(), Sid::principal("other"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_update_bumps_version_and_rejects_stale() {
        let store = InMemoryAclStore::new();
        let ad = oid("advertisement", 1);
        let stale = create(&store, &ad).await;

        let mut fresh = stale.clone();
        fresh
            .insert_ace(0, Permission::READ, Sid::principal("u"), true)
            .unwrap();
        let stored = store.update_acl(&fresh).await.unwrap();
        assert_eq!(stored.version(), 1);

        let err = store.update_acl(&stale).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Conflict {
                expected: 0,
                found: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_update_requires_existing_parent() {
        let store = InMemoryAclStore::new();
        let ad = oid("advertisement", 1);
        let mut acl = create(&store, &ad).await;
        acl.set_parent(Some(oid("bulletinboard", "missing"))).unwrap();

        let err = store.update_acl(&acl).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_rejects_cycle() {
        let store = InMemoryAclStore::new();
        let a = oid("node", "a");
        let b = oid("node", "b");
        let c = oid("node", "c");
        for identity in [&a, &b, &c] {
            create(&store, identity).await;
        }
        link(&store, &b, &a).await;
        link(&store, &c, &b).await;

        let mut root = store.read_acl(&a).await.unwrap().unwrap();
        root.set_parent(Some(c.clone())).unwrap();
        let err = store.update_acl(&root).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_lineage_nearest_first() {
        let store = InMemoryAclStore::new();
        let location = oid("location", "WDF");
        let board = oid("bulletinboard", "B");
        let ad = oid("advertisement", 1);
        for identity in [&location, &board, &ad] {
            create(&store, identity).await;
        }
        link(&store, &board, &location).await;
        link(&store, &ad, &board).await;

        let lineage = store.read_acl_lineage(&ad).await.unwrap();
        let ids: Vec<_> = lineage.iter().map(|acl| acl.identity().clone()).collect();
        assert_eq!(ids, vec![ad, board, location]);

        let err = store
            .read_acl_lineage(&oid("advertisement", 9))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_with_children() {
        let store = InMemoryAclStore::new();
        let board = oid("bulletinboard", "B");
        let ad = oid("advertisement", 1);
        create(&store, &board).await;
        create(&store, &ad).await;
        link(&store, &ad, &board).await;

        assert_eq!(store.find_children(&board).await.unwrap(), vec![ad.clone()]);

        let err = store.delete_acl(&board, false).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest { .. }));

        let deleted = store.delete_acl(&board, true).await.unwrap();
        assert_eq!(deleted, vec![ad.clone(), board.clone()]);
        assert!(store.read_acl(&ad).await.unwrap().is_none());

        assert!(store.delete_acl(&board, true).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_sids_with_prefix_skips_principals_and_bare_prefix() {
        let store = InMemoryAclStore::new();
        let ad = oid("advertisement", 1);
        let mut acl = create(&store, &ad).await;
        for sid in [
            Sid::authority("ATTR:GROUP=UG_A"),
            Sid::authority("ATTR:GROUP=UG_B"),
            Sid::authority("ATTR:GROUP="),
            Sid::authority("ATTR:LOCATION=WDF"),
            Sid::principal("ATTR:GROUP=sneaky"),
        ] {
            let index = acl.entries().len();
            acl.insert_ace(index, Permission::READ, sid, true).unwrap();
        }
        store.update_acl(&acl).await.unwrap();

        let names = store.sids_with_prefix("ATTR:GROUP=").await.unwrap();
        assert_eq!(names, vec!["ATTR:GROUP=UG_A", "ATTR:GROUP=UG_B"]);
    }

    #[tokio::test]
    async fn test_state_file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = InMemoryAclStore::new();
        let ad = oid("advertisement", 1);
        let mut acl = create(&store, &ad).await;
        acl.insert_ace(0, Permission::WRITE, Sid::principal("u"), true)
            .unwrap();
        store.update_acl(&acl).await.unwrap();
        store.save_state_file(&path).await.unwrap();

        let loaded = InMemoryAclStore::load_state_file(&path).unwrap();
        assert_eq!(loaded.snapshot().await, store.snapshot().await);

        let empty = InMemoryAclStore::load_state_file(&dir.path().join("none.json")).unwrap();
        assert!(empty.snapshot().await.acls.is_empty());
    }

    #[test]
    fn test_snapshot_with_duplicates_rejected() {
        let acl = Acl::new(oid("advertisement", 1), Sid::principal("owner"));
        let snapshot = AclSnapshot {
            acls: vec![acl.clone(), acl],
        };
        assert!(InMemoryAclStore::from_snapshot(snapshot).is_err());
    }
}
