//! Audit sinks for ACL decisions and modifications.
//!
//! Every method is fire-and-forget: sinks return nothing, so a failing sink
//! can never change a permission decision.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::{AccessControlEntry, ObjectIdentity};

/// Receives audit events about ACL entries.
pub trait AuditLogger: Send + Sync {
    /// Called for the entry that decided a permission check.
    ///
    /// Implementations must honour the entry's `audit_success` /
    /// `audit_failure` flags.
    fn log_if_needed(&self, granted: bool, identity: &ObjectIdentity, ace: &AccessControlEntry);

    /// Called after an entry was added by a grant.
    fn log_grant_permission(&self, identity: &ObjectIdentity, ace: &AccessControlEntry);

    /// Called after an entry was removed by a revoke.
    fn log_remove_permission(&self, identity: &ObjectIdentity, ace: &AccessControlEntry);
}

/// Writes audit events through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAuditLogger;

impl AuditLogger for LogAuditLogger {
    fn log_if_needed(&self, granted: bool, identity: &ObjectIdentity, ace: &AccessControlEntry) {
        if granted && ace.is_audit_success() {
            log::info!("GRANTED due to ACE on {identity}: {ace}");
        }
        if !granted && ace.is_audit_failure() {
            log::warn!("DENIED due to ACE on {identity}: {ace}");
        }
    }

    fn log_grant_permission(&self, identity: &ObjectIdentity, ace: &AccessControlEntry) {
        log::info!("CREATED ACE on {identity}: {ace}");
    }

    fn log_remove_permission(&self, identity: &ObjectIdentity, ace: &AccessControlEntry) {
        log::info!("REMOVED ACE on {identity}: {ace}");
    }
}

/// What happened to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// The entry granted a permission check.
    Granted,
    /// The entry denied a permission check.
    Denied,
    /// The entry was created.
    Created,
    /// The entry was removed.
    Removed,
}

/// One audit record, as forwarded by [`ChannelAuditLogger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    /// What happened.
    pub kind: AuditKind,
    /// The ACL's object.
    pub identity: ObjectIdentity,
    /// The entry involved.
    pub entry: AccessControlEntry,
}

/// Forwards audit events over an unbounded channel without blocking.
///
/// If the receiver is gone, events are dropped.
#[derive(Debug, Clone)]
pub struct ChannelAuditLogger {
    tx: mpsc::UnboundedSender<AuditEvent>,
}

impl ChannelAuditLogger {
    /// Creates a logger and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AuditEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, kind: AuditKind, identity: &ObjectIdentity, ace: &AccessControlEntry) {
        let event = AuditEvent {
            kind,
            identity: identity.clone(),
            entry: ace.clone(),
        };
        if self.tx.send(event).is_err() {
            log::debug!("Audit receiver closed, dropping {kind:?} event for {identity}");
        }
    }
}

impl AuditLogger for ChannelAuditLogger {
    fn log_if_needed(&self, granted: bool, identity: &ObjectIdentity, ace: &AccessControlEntry) {
        if granted && ace.is_audit_success() {
            self.send(AuditKind::Granted, identity, ace);
        }
        if !granted && ace.is_audit_failure() {
            self.send(AuditKind::Denied, identity, ace);
        }
    }

    fn log_grant_permission(&self, identity: &ObjectIdentity, ace: &AccessControlEntry) {
        self.send(AuditKind::Created, identity, ace);
    }

    fn log_remove_permission(&self, identity: &ObjectIdentity, ace: &AccessControlEntry) {
        self.send(AuditKind::Removed, identity, ace);
    }
}
