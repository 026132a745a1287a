//! Handler functions for `placard acl` commands.
//!
//! Every command loads the ACL state file named by `store.state_file`,
//! runs one [`AclService`] operation and prints the result as JSON.
//! Commands that change ACLs write the state file back afterwards.

use std::path::Path;
use std::sync::Arc;

use placard_acl::{Acl, AclService, InMemoryAclStore, ObjectIdentity, Permission, Sid};
use placard_ads::{Page, PageRequest};
use placard_auth::{AclAttribute, SecurityContext, TokenClaims};
use placard_core::{Error, PlacardConfig, Result};
use serde::Serialize;

use crate::cli::{AclAction, ObjectArgs, SidArgs};

/// Outcome of `placard acl check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// An entry granted the request.
    Granted,
    /// An entry explicitly denied the request.
    Denied,
    /// No entry in the ACL or its ancestors applied.
    NoMatchingEntry,
}

/// Printed result of `placard acl check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// The object that was checked, as `type:id`.
    pub object: String,
    /// Requested permission codes.
    pub permissions: String,
    /// The caller's unique user name.
    pub caller: String,
    /// The decision.
    pub decision: Decision,
}

// ============================================================================
// Command dispatch
// ============================================================================

/// Run one ACL subcommand against the state file named in `config`.
pub async fn handle_acl_command(config: &PlacardConfig, action: AclAction) -> Result<()> {
    let service = open(config)?;
    match action {
        AclAction::Grant {
            object,
            sid,
            permissions,
            owner,
        } => {
            let acl = cmd_acl_grant(&service, &object, &sid, &permissions, owner.as_deref()).await?;
            save(&service, config).await?;
            print_json(&acl)
        }
        AclAction::Revoke {
            object,
            sid,
            permissions,
        } => {
            let acl = cmd_acl_revoke(&service, &object, &sid, &permissions).await?;
            save(&service, config).await?;
            print_json(&acl)
        }
        AclAction::Check {
            object,
            claims,
            permissions,
        } => {
            let ctx = load_context(Path::new(&claims))?;
            print_json(&cmd_acl_check(&service, &object, &ctx, &permissions).await?)
        }
        AclAction::Accessible {
            claims,
            permissions,
            page,
            size,
        } => {
            let ctx = load_context(Path::new(&claims))?;
            let request = PageRequest::new(page, size.unwrap_or(config.acl.default_page_size));
            print_json(&cmd_acl_accessible(&service, &ctx, &permissions, request).await?)
        }
        AclAction::Parent {
            object,
            parent_type,
            parent_id,
        } => {
            let parent = ObjectIdentity::new(parent_type, parent_id)?;
            let acl = cmd_acl_parent(&service, &object, &parent).await?;
            save(&service, config).await?;
            print_json(&acl)
        }
        AclAction::Show { object } => {
            print_json(&service.read_acl(&identity(&object)?).await?)
        }
        AclAction::Attributes { attribute } => {
            print_json(&cmd_acl_attributes(&service, &attribute).await?)
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Grant `codes` on `object` to `sid`, creating the ACL if needed.
pub async fn cmd_acl_grant(
    service: &AclService<InMemoryAclStore>,
    object: &ObjectArgs,
    sid: &SidArgs,
    codes: &str,
    owner: Option<&str>,
) -> Result<Acl> {
    let identity = identity(object)?;
    let sid = to_sid(sid);
    let owner = owner.map(Sid::principal).unwrap_or_else(|| sid.clone());
    service
        .grant(&identity, &sid, &parse_permissions(codes)?, &owner)
        .await
}

/// Remove the granting entries of `sid` for `codes` on `object`.
pub async fn cmd_acl_revoke(
    service: &AclService<InMemoryAclStore>,
    object: &ObjectArgs,
    sid: &SidArgs,
    codes: &str,
) -> Result<Acl> {
    service
        .revoke(&identity(object)?, &to_sid(sid), &parse_permissions(codes)?)
        .await
}

/// Decide whether the caller in `ctx` holds any of `codes` on `object`.
///
/// A missing ACL is an error; a request nothing applies to is reported as
/// [`Decision::NoMatchingEntry`].
pub async fn cmd_acl_check(
    service: &AclService<InMemoryAclStore>,
    object: &ObjectArgs,
    ctx: &SecurityContext,
    codes: &str,
) -> Result<CheckReport> {
    let identity = identity(object)?;
    let permissions = parse_permissions(codes)?;
    let decision = match service.is_granted(&identity, &permissions, ctx.sids()).await {
        Ok(true) => Decision::Granted,
        Ok(false) => Decision::Denied,
        Err(Error::AccessDenied { .. }) => Decision::NoMatchingEntry,
        Err(e) => return Err(e),
    };
    Ok(CheckReport {
        object: identity.to_string(),
        permissions: Permission::combine(&permissions).codes(),
        caller: ctx.unique_user_name(),
        decision,
    })
}

/// Every object the caller in `ctx` reaches with any of `codes`, directly or
/// through an ancestor ACL, as `type:id` strings.
pub async fn cmd_acl_accessible(
    service: &AclService<InMemoryAclStore>,
    ctx: &SecurityContext,
    codes: &str,
    request: PageRequest,
) -> Result<Page<String>> {
    let mask = Permission::combine(&parse_permissions(codes)?);
    let objects = service
        .resolve_hierarchy(mask, ctx.sids())
        .await?
        .iter()
        .map(ToString::to_string)
        .collect();
    Ok(Page::of(objects, request))
}

/// Make `parent` the parent of `object`.
pub async fn cmd_acl_parent(
    service: &AclService<InMemoryAclStore>,
    object: &ObjectArgs,
    parent: &ObjectIdentity,
) -> Result<Acl> {
    service.set_parent(&identity(object)?, parent).await
}

/// Values granted for `attribute` anywhere in the store.
pub async fn cmd_acl_attributes(
    service: &AclService<InMemoryAclStore>,
    attribute: &str,
) -> Result<Vec<String>> {
    let attribute: AclAttribute = attribute.parse()?;
    let names = service.sids_with_prefix(&attribute.sid_prefix()).await?;
    Ok(names
        .iter()
        .filter_map(|name| attribute.value_of(name))
        .map(str::to_string)
        .collect())
}

// ============================================================================
// Helpers
// ============================================================================

/// Open the state file from `config` behind an [`AclService`].
pub fn open(config: &PlacardConfig) -> Result<AclService<InMemoryAclStore>> {
    let store = InMemoryAclStore::load_state_file(&config.store.state_file)?;
    Ok(AclService::new(Arc::new(store)).with_administrative_mode(config.acl.administrative_mode))
}

/// Write the service's ACLs back to the state file from `config`.
pub async fn save(service: &AclService<InMemoryAclStore>, config: &PlacardConfig) -> Result<()> {
    service
        .store()
        .save_state_file(&config.store.state_file)
        .await?;
    log::debug!("Wrote ACL state to {}", config.store.state_file.display());
    Ok(())
}

/// Read validated token claims from a JSON file and derive the caller's SIDs.
pub fn load_context(path: &Path) -> Result<SecurityContext> {
    let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let claims = TokenClaims::from_json(&json)?;
    Ok(SecurityContext::from_claims(claims)?)
}

/// Parse permission codes, rejecting anything outside `RWDA`.
pub fn parse_permissions(codes: &str) -> Result<Vec<Permission>> {
    if let Some(bad) = codes.chars().find(|c| Permission::from_code(*c).is_none()) {
        return Err(Error::bad_request_field(
            "permissions",
            format!("unknown permission code '{bad}', expected any of RWDA"),
        ));
    }
    let permissions = Permission::parse_codes(codes);
    if permissions.is_empty() {
        return Err(Error::bad_request_field(
            "permissions",
            "at least one permission is required",
        ));
    }
    Ok(permissions)
}

fn identity(object: &ObjectArgs) -> Result<ObjectIdentity> {
    ObjectIdentity::new(object.object_type.clone(), &object.id)
}

fn to_sid(sid: &SidArgs) -> Sid {
    if sid.authority {
        Sid::authority(sid.sid.clone())
    } else {
        Sid::principal(sid.sid.clone())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
