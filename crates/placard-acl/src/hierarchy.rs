//! Hierarchical accessible-object resolution.
//!
//! Answers "which objects can these SIDs reach with this permission, directly
//! or through an ancestor?" in two steps:
//!
//! 1. **Seeds**: objects whose ACL holds a granting entry for one of the
//!    SIDs with a permission bit in the requested mask.
//! 2. **Closure**: every object whose parent chain reaches a seed, found by
//!    breadth-first parent-to-child expansion until no new object appears.
//!
//! The traversal owns its visited set, so each object is reported once even
//! when several ancestors are granted, and corrupt (cyclic) parent data
//! cannot make it loop.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::{Acl, ObjectIdentity, Permission, Sid};

/// Parent-to-children adjacency built from a snapshot of ACLs.
#[derive(Debug, Default, Clone)]
pub struct ChildIndex {
    children: HashMap<ObjectIdentity, Vec<ObjectIdentity>>,
}

impl ChildIndex {
    /// Build the index from every ACL's parent link.
    pub fn from_acls<'a>(acls: impl IntoIterator<Item = &'a Acl>) -> Self {
        let mut children: HashMap<ObjectIdentity, Vec<ObjectIdentity>> = HashMap::new();
        for acl in acls {
            if let Some(parent) = acl.parent() {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(acl.identity().clone());
            }
        }
        for list in children.values_mut() {
            list.sort();
        }
        Self { children }
    }

    /// Direct children of `parent`, in identity order.
    pub fn children_of(&self, parent: &ObjectIdentity) -> &[ObjectIdentity] {
        self.children
            .get(parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Objects directly granted `mask` to any of `sids`, in identity order.
pub fn direct_grants<'a>(
    acls: impl IntoIterator<Item = &'a Acl>,
    mask: Permission,
    sids: &[Sid],
) -> Vec<ObjectIdentity> {
    let seeds: BTreeSet<ObjectIdentity> = acls
        .into_iter()
        .filter(|acl| {
            acl.entries().iter().any(|ace| {
                ace.is_granting() && ace.permission().intersects(mask) && sids.contains(ace.sid())
            })
        })
        .map(|acl| acl.identity().clone())
        .collect();
    seeds.into_iter().collect()
}

/// Seeds plus all of their transitive descendants, each exactly once, in
/// identity order.
pub fn accessible_closure(
    seeds: impl IntoIterator<Item = ObjectIdentity>,
    index: &ChildIndex,
) -> Vec<ObjectIdentity> {
    let mut visited: HashSet<ObjectIdentity> = HashSet::new();
    let mut queue: VecDeque<ObjectIdentity> = VecDeque::new();

    for seed in seeds {
        if visited.insert(seed.clone()) {
            queue.push_back(seed);
        }
    }

    while let Some(current) = queue.pop_front() {
        for child in index.children_of(&current) {
            if visited.insert(child.clone()) {
                queue.push_back(child.clone());
            }
        }
    }

    let ordered: BTreeSet<ObjectIdentity> = visited.into_iter().collect();
    ordered.into_iter().collect()
}

/// Convenience: seeds and closure computed over one snapshot of ACLs.
pub fn resolve<'a>(
    acls: impl IntoIterator<Item = &'a Acl> + Clone,
    mask: Permission,
    sids: &[Sid],
) -> Vec<ObjectIdentity> {
    let index = ChildIndex::from_acls(acls.clone());
    accessible_closure(direct_grants(acls, mask, sids), &index)
}
