//! Permission granting strategy.
//!
//! Decides whether a set of SIDs holds any of a set of requested permissions
//! on an ACL, walking up the parent chain while ACLs inherit entries.

use std::sync::Arc;

use placard_core::{Error, Result};

use crate::{AccessControlEntry, Acl, AuditLogger, Permission, Sid};

/// Evaluates permission requests against an ACL and its ancestors.
pub trait PermissionGrantingStrategy: Send + Sync {
    /// Decide a permission request.
    ///
    /// `lineage[0]` is the ACL being checked; each following element is the
    /// parent of the one before it, as loaded from one consistent snapshot.
    ///
    /// Returns `Ok(true)` when an entry grants, `Ok(false)` when an entry
    /// explicitly denies, and [`Error::AccessDenied`] when no entry anywhere
    /// in the consulted chain applies.
    fn is_granted(
        &self,
        lineage: &[Acl],
        requested: &[Permission],
        sids: &[Sid],
        administrative_mode: bool,
    ) -> Result<bool>;
}

/// First-match strategy with audit reporting.
///
/// For each requested permission, each SID is tried in order against the
/// entries in order. The first entry that applies decides that permission:
/// a granting entry grants the whole request immediately, a denying entry is
/// remembered and the next permission is tried. If only denials were found
/// the request is denied; if nothing applied and the ACL inherits, the parent
/// is asked the same question.
#[derive(Clone)]
pub struct DefaultPermissionGrantingStrategy {
    audit: Arc<dyn AuditLogger>,
}

impl DefaultPermissionGrantingStrategy {
    /// Create a strategy reporting to the given audit sink.
    pub fn new(audit: Arc<dyn AuditLogger>) -> Self {
        Self { audit }
    }

    /// Decide against a single ACL; `None` means no entry applied.
    fn decide(
        &self,
        acl: &Acl,
        requested: &[Permission],
        sids: &[Sid],
        administrative_mode: bool,
    ) -> Option<bool> {
        let mut first_rejection: Option<&AccessControlEntry> = None;

        for permission in requested {
            for sid in sids {
                let Some(ace) = acl
                    .entries()
                    .iter()
                    .find(|ace| ace.applies_to(sid, *permission))
                else {
                    continue;
                };

                if ace.is_granting() {
                    if !administrative_mode {
                        self.audit.log_if_needed(true, acl.identity(), ace);
                    }
                    return Some(true);
                }

                first_rejection.get_or_insert(ace);
                // A deny decides this permission; move on to the next one.
                break;
            }
        }

        let rejection = first_rejection?;
        if !administrative_mode {
            self.audit.log_if_needed(false, acl.identity(), rejection);
        }
        Some(false)
    }
}

impl PermissionGrantingStrategy for DefaultPermissionGrantingStrategy {
    fn is_granted(
        &self,
        lineage: &[Acl],
        requested: &[Permission],
        sids: &[Sid],
        administrative_mode: bool,
    ) -> Result<bool> {
        let Some(target) = lineage.first() else {
            return Err(Error::bad_request("cannot evaluate an empty ACL lineage"));
        };

        for (depth, acl) in lineage.iter().enumerate() {
            if let Some(decision) = self.decide(acl, requested, sids, administrative_mode) {
                log::debug!(
                    "{} {} on {} (decided at depth {depth})",
                    if decision { "Granted" } else { "Denied" },
                    Permission::combine(requested),
                    target.identity()
                );
                return Ok(decision);
            }

            if !acl.is_entries_inheriting() {
                break;
            }
            match (acl.parent(), lineage.get(depth + 1)) {
                (Some(parent), Some(next)) if next.identity() == parent => {}
                _ => break,
            }
        }

        Err(Error::access_denied(format!(
            "no matching ACE for {} on {}",
            Permission::combine(requested),
            target.identity()
        )))
    }
}
