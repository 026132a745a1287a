//! Access control lists.

use placard_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::{AccessControlEntry, ObjectIdentity, Permission, Sid};

/// The ordered permission entries for one object identity.
///
/// Entry order matters: the first entry that applies to a `(permission, SID)`
/// pair decides it. The parent is held by identity only; many ACLs may share
/// one parent and the parent never owns its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    identity: ObjectIdentity,
    owner: Sid,
    entries: Vec<AccessControlEntry>,
    parent: Option<ObjectIdentity>,
    entries_inheriting: bool,
    version: u64,
    next_entry_id: u64,
}

impl Acl {
    /// Creates an empty ACL that inherits entries from its (future) parent.
    pub fn new(identity: ObjectIdentity, owner: Sid) -> Self {
        Self {
            identity,
            owner,
            entries: Vec::new(),
            parent: None,
            entries_inheriting: true,
            version: 0,
            next_entry_id: 1,
        }
    }

    /// The object this ACL protects.
    pub fn identity(&self) -> &ObjectIdentity {
        &self.identity
    }

    /// The owner SID recorded at creation.
    pub fn owner(&self) -> &Sid {
        &self.owner
    }

    /// Entries in evaluation order; an entry's index is its ordinal.
    pub fn entries(&self) -> &[AccessControlEntry] {
        &self.entries
    }

    /// The parent ACL's identity, if any.
    pub fn parent(&self) -> Option<&ObjectIdentity> {
        self.parent.as_ref()
    }

    /// Whether evaluation falls through to the parent when no entry matches.
    pub fn is_entries_inheriting(&self) -> bool {
        self.entries_inheriting
    }

    /// Stored version; bumped by the store on every successful update.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sets the stored version. Only [`AclStore`](crate::AclStore)
    /// implementations should call this.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Inserts a new entry at `index`, shifting later entries down.
    pub fn insert_ace(
        &mut self,
        index: usize,
        permission: Permission,
        sid: Sid,
        granting: bool,
    ) -> Result<&AccessControlEntry> {
        if index > self.entries.len() {
            return Err(Error::bad_request_field(
                "index",
                format!(
                    "index {index} is out of range for {} entries",
                    self.entries.len()
                ),
            ));
        }
        if permission.bits().count_ones() != 1 {
            return Err(Error::bad_request_field(
                "permission",
                format!("an entry holds exactly one permission bit, got {permission}"),
            ));
        }

        let ace = AccessControlEntry::new(self.next_entry_id, sid, permission, granting);
        self.next_entry_id += 1;
        self.entries.insert(index, ace);
        Ok(&self.entries[index])
    }

    /// Removes the entry at `index`; later entries move up one ordinal.
    pub fn delete_ace(&mut self, index: usize) -> Result<AccessControlEntry> {
        if index >= self.entries.len() {
            return Err(Error::not_found("entry", format!("{}#{index}", self.identity)));
        }
        Ok(self.entries.remove(index))
    }

    /// Sets the audit flags of the entry at `index`.
    pub fn update_auditing(
        &mut self,
        index: usize,
        audit_success: bool,
        audit_failure: bool,
    ) -> Result<()> {
        let len = self.entries.len();
        let ace = self.entries.get_mut(index).ok_or_else(|| {
            Error::bad_request_field("index", format!("no entry {index} of {len}"))
        })?;
        ace.set_auditing(audit_success, audit_failure);
        Ok(())
    }

    /// Removes every granting entry for `sid` whose permission is one of
    /// `permissions`, keeping the remaining entries in order.
    pub fn remove_granting(
        &mut self,
        sid: &Sid,
        permissions: &[Permission],
    ) -> Vec<AccessControlEntry> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|ace| {
                ace.is_granting() && ace.sid() == sid && permissions.contains(&ace.permission())
            });
        self.entries = kept;
        removed
    }

    /// Points this ACL at a new parent (or detaches it with `None`).
    ///
    /// Only the direct self-reference is rejected here; deeper cycles are
    /// checked by the store, which can see the whole chain.
    pub fn set_parent(&mut self, parent: Option<ObjectIdentity>) -> Result<()> {
        if parent.as_ref() == Some(&self.identity) {
            return Err(Error::bad_request_field(
                "parent",
                format!("{} cannot be its own parent", self.identity),
            ));
        }
        self.parent = parent;
        Ok(())
    }

    /// Turns parent inheritance on or off.
    pub fn set_entries_inheriting(&mut self, entries_inheriting: bool) {
        self.entries_inheriting = entries_inheriting;
    }
}
