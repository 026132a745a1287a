//! Access control entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Permission, Sid};

/// A single `(SID, permission, grant/deny)` record inside an [`Acl`](crate::Acl).
///
/// An entry's ordinal is its position in the owning ACL; entries are only
/// created through the ACL so ordinals stay contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlEntry {
    id: u64,
    sid: Sid,
    permission: Permission,
    granting: bool,
    audit_success: bool,
    audit_failure: bool,
}

impl AccessControlEntry {
    pub(crate) fn new(id: u64, sid: Sid, permission: Permission, granting: bool) -> Self {
        Self {
            id,
            sid,
            permission,
            granting,
            audit_success: false,
            audit_failure: false,
        }
    }

    /// Entry id, unique within its ACL.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The SID this entry applies to.
    pub fn sid(&self) -> &Sid {
        &self.sid
    }

    /// The permission bit this entry grants or denies.
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// `true` to allow, `false` to explicitly deny.
    pub fn is_granting(&self) -> bool {
        self.granting
    }

    /// Whether granted decisions made by this entry are audited.
    pub fn is_audit_success(&self) -> bool {
        self.audit_success
    }

    /// Whether denied decisions made by this entry are audited.
    pub fn is_audit_failure(&self) -> bool {
        self.audit_failure
    }

    pub(crate) fn set_auditing(&mut self, audit_success: bool, audit_failure: bool) {
        self.audit_success = audit_success;
        self.audit_failure = audit_failure;
    }

    /// Whether this entry decides a request for `requested` by `sid`.
    pub fn applies_to(&self, sid: &Sid, requested: Permission) -> bool {
        &self.sid == sid && self.permission.intersects(requested)
    }
}

impl fmt::Display for AccessControlEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccessControlEntry[id: {}; granting: {}; sid: {}; permission: {}; auditSuccess: {}; auditFailure: {}]",
            self.id,
            self.granting,
            self.sid,
            self.permission,
            self.audit_success,
            self.audit_failure
        )
    }
}
