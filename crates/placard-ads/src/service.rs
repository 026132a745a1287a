//! ACL-secured advertisement service.
//!
//! Every operation takes the caller's [`SecurityContext`] explicitly and
//! checks the advertisement's ACL before touching the repository:
//!
//! | Operation | Requires |
//! |-----------|----------|
//! | `find_by_id` | READ |
//! | `update` | WRITE |
//! | `grant_permissions`, `remove_permissions`, `grant_permissions_to_group`, `delete_by_id` | ADMINISTRATION |
//! | `publish_to_bulletin_board` | ADMINISTRATION on the ad, READ on the board |

use std::sync::Arc;

use placard_acl::{AclService, AclStore, ObjectIdentity, Permission, Sid};
use placard_auth::{AclAttribute, SecurityContext};
use placard_core::{Error, Result};

use crate::{
    ADVERTISEMENT_TYPE, Advertisement, AdvertisementRepository, AdvertisementUpdate,
    NewAdvertisement, Page, PageRequest, advertisement_identity, bulletinboard_identity,
};

/// Permissions the creator receives on a new advertisement.
const OWNER_PERMISSIONS: [Permission; 3] = [
    Permission::READ,
    Permission::WRITE,
    Permission::ADMINISTRATION,
];

/// Advertisement operations guarded by per-object ACLs.
pub struct AdvertisementService<R, S> {
    repository: Arc<R>,
    acl: Arc<AclService<S>>,
}

impl<R, S> AdvertisementService<R, S>
where
    R: AdvertisementRepository,
    S: AclStore,
{
    /// Create a service over a repository and an ACL service.
    pub fn new(repository: Arc<R>, acl: Arc<AclService<S>>) -> Self {
        Self { repository, acl }
    }

    /// The ACL service used for checks and grants.
    pub fn acl(&self) -> &Arc<AclService<S>> {
        &self.acl
    }

    /// Store a new advertisement and give its creator READ, WRITE and
    /// ADMINISTRATION.
    pub async fn create(
        &self,
        ctx: &SecurityContext,
        new: NewAdvertisement,
    ) -> Result<Advertisement> {
        let ad = self
            .repository
            .insert(new, &ctx.unique_user_name())
            .await?;
        let identity = ad.object_identity()?;
        let owner = ctx.principal_sid();

        if let Err(e) = self
            .acl
            .grant(&identity, owner, &OWNER_PERMISSIONS, owner)
            .await
        {
            // Without an ACL nobody could reach the advertisement again.
            self.repository.delete(ad.id).await?;
            return Err(e);
        }

        log::debug!(
            "Granted {} on {identity} to owner {}",
            Permission::combine(&OWNER_PERMISSIONS),
            owner.name()
        );
        Ok(ad)
    }

    /// Read one advertisement. Requires READ.
    pub async fn find_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<Advertisement> {
        self.require(ctx, id, Permission::READ).await?;
        self.load(id).await
    }

    /// Advertisements directly readable by the caller, newest first.
    pub async fn find_all(
        &self,
        ctx: &SecurityContext,
        request: PageRequest,
    ) -> Result<Page<Advertisement>> {
        let identities = self
            .acl
            .find_by_permission(Permission::READ, ctx.sids())
            .await?;
        let ads = self.load_newest_first(&identities).await?;
        Ok(Page::of(ads, request))
    }

    /// Published advertisements readable by the caller directly or through
    /// a bulletin board (or any other ancestor), newest first.
    pub async fn find_all_published(
        &self,
        ctx: &SecurityContext,
        request: PageRequest,
    ) -> Result<Page<Advertisement>> {
        let identities = self
            .acl
            .resolve_hierarchy(Permission::READ, ctx.sids())
            .await?;
        let ads = self
            .load_newest_first(&identities)
            .await?
            .into_iter()
            .filter(|ad| ad.published)
            .collect();
        Ok(Page::of(ads, request))
    }

    /// Replace an advertisement. Requires WRITE.
    pub async fn update(
        &self,
        ctx: &SecurityContext,
        id: i64,
        update: AdvertisementUpdate,
    ) -> Result<Advertisement> {
        if update.id != id {
            return Err(Error::bad_request_field(
                "id",
                format!("id {} in body does not match {id}", update.id),
            ));
        }
        update.validate()?;
        self.require(ctx, id, Permission::WRITE).await?;

        let mut ad = self.load(id).await?;
        update.apply_to(&mut ad);
        self.repository.update(&ad, &ctx.unique_user_name()).await
    }

    /// Grant `permissions` to another user. Requires ADMINISTRATION.
    ///
    /// `user_name` is qualified with the caller's identity zone origin.
    pub async fn grant_permissions(
        &self,
        ctx: &SecurityContext,
        id: i64,
        user_name: &str,
        permissions: &[Permission],
    ) -> Result<()> {
        let identity = self.require(ctx, id, Permission::ADMINISTRATION).await?;
        let sid = Sid::principal(ctx.unique_name_for(user_name));
        self.acl
            .grant(&identity, &sid, permissions, ctx.principal_sid())
            .await?;
        Ok(())
    }

    /// Revoke `permissions` from another user. Requires ADMINISTRATION.
    pub async fn remove_permissions(
        &self,
        ctx: &SecurityContext,
        id: i64,
        user_name: &str,
        permissions: &[Permission],
    ) -> Result<()> {
        let identity = self.require(ctx, id, Permission::ADMINISTRATION).await?;
        let sid = Sid::principal(ctx.unique_name_for(user_name));
        self.acl.revoke(&identity, &sid, permissions).await?;
        Ok(())
    }

    /// Grant `permissions` to every member of user group `group`.
    /// Requires ADMINISTRATION.
    pub async fn grant_permissions_to_group(
        &self,
        ctx: &SecurityContext,
        id: i64,
        group: &str,
        permissions: &[Permission],
    ) -> Result<()> {
        let identity = self.require(ctx, id, Permission::ADMINISTRATION).await?;
        let sid = AclAttribute::Group.sid_for_value(group);
        self.acl
            .grant(&identity, &sid, permissions, ctx.principal_sid())
            .await?;
        Ok(())
    }

    /// Publish an advertisement to bulletin board `board`.
    ///
    /// Requires ADMINISTRATION on the advertisement and READ on the board.
    /// The board becomes the advertisement ACL's parent, so the board's
    /// readers can read the advertisement too.
    pub async fn publish_to_bulletin_board(
        &self,
        ctx: &SecurityContext,
        id: i64,
        board: &str,
    ) -> Result<Advertisement> {
        let identity = self.require(ctx, id, Permission::ADMINISTRATION).await?;
        let board_identity = bulletinboard_identity(board)?;
        self.acl
            .require(&board_identity, &[Permission::READ], ctx.sids())
            .await?;

        let mut ad = self.load(id).await?;
        self.acl.set_parent(&identity, &board_identity).await?;
        ad.published = true;
        let stored = self
            .repository
            .update(&ad, &ctx.unique_user_name())
            .await?;

        log::debug!("Published advertisement {id} to {board_identity}");
        Ok(stored)
    }

    /// Delete an advertisement and its ACL. Requires ADMINISTRATION.
    pub async fn delete_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<()> {
        let identity = self.require(ctx, id, Permission::ADMINISTRATION).await?;
        if !self.repository.delete(id).await? {
            return Err(Error::not_found("advertisement", id));
        }
        self.acl.delete_acl(&identity, true).await?;
        Ok(())
    }

    /// Every value of `attribute` that some ACL entry was granted to.
    pub async fn attribute_values(&self, attribute: AclAttribute) -> Result<Vec<String>> {
        let names = self.acl.sids_with_prefix(&attribute.sid_prefix()).await?;
        Ok(names
            .iter()
            .filter_map(|name| attribute.value_of(name))
            .map(str::to_string)
            .collect())
    }

    /// Names of every ACL attribute.
    pub fn attributes(&self) -> Vec<&'static str> {
        AclAttribute::ALL
            .iter()
            .map(|attribute| attribute.attribute_name())
            .collect()
    }

    async fn require(
        &self,
        ctx: &SecurityContext,
        id: i64,
        permission: Permission,
    ) -> Result<ObjectIdentity> {
        let identity = advertisement_identity(id)?;
        self.acl
            .require(&identity, &[permission], ctx.sids())
            .await?;
        Ok(identity)
    }

    async fn load(&self, id: i64) -> Result<Advertisement> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("advertisement", id))
    }

    async fn load_newest_first(&self, identities: &[ObjectIdentity]) -> Result<Vec<Advertisement>> {
        let mut ids: Vec<i64> = identities
            .iter()
            .filter(|identity| identity.is_type(ADVERTISEMENT_TYPE))
            .filter_map(ObjectIdentity::numeric_id)
            .collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids.dedup();
        self.repository.find_by_ids(&ids).await
    }
}
