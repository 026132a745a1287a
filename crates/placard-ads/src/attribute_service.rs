//! Advertisement operations guarded by attribute rules instead of ACLs.

use std::sync::Arc;

use placard_auth::SecurityContext;
use placard_core::{Error, Result};

use crate::{
    Advertisement, AdvertisementRepository, AdvertisementSpec, AdvertisementUpdate,
    AttributeRules, ConfidentialityLevel, NewAdvertisement, Page, PageRequest,
};

/// Attribute-based advertisement service.
///
/// Reads are filtered by [`AttributeRules::readable_filter`]; writes are
/// limited to the creator.
pub struct AttributeAdvertisementService<R> {
    repository: Arc<R>,
}

impl<R: AdvertisementRepository> AttributeAdvertisementService<R> {
    /// Create a service over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Store a new advertisement owned by the caller.
    pub async fn create(
        &self,
        ctx: &SecurityContext,
        new: NewAdvertisement,
    ) -> Result<Advertisement> {
        let ad = self
            .repository
            .insert(new, &ctx.unique_user_name())
            .await?;
        log::debug!("Created advertisement {} for {}", ad.id, ad.metadata.created_by);
        Ok(ad)
    }

    /// Read one advertisement the caller may see.
    ///
    /// Advertisements hidden by the rules are reported as `NotFound`.
    pub async fn find_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<Advertisement> {
        let spec = AttributeRules::new(ctx).readable_by_id(id)?;
        self.repository
            .find_matching(&spec)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found("advertisement", id))
    }

    /// One page of the advertisements the caller may see, in id order.
    pub async fn find_page(
        &self,
        ctx: &SecurityContext,
        request: PageRequest,
    ) -> Result<Page<Advertisement>> {
        let spec = AttributeRules::new(ctx).readable_filter()?;
        let ads = self.repository.find_matching(&spec).await?;
        Ok(Page::of(ads, request))
    }

    /// Advertisements at exactly `level`; the caller's
    /// `confidentiality_level` attribute must contain that level.
    pub async fn find_by_confidentiality(
        &self,
        ctx: &SecurityContext,
        level: ConfidentialityLevel,
        request: PageRequest,
    ) -> Result<Page<Advertisement>> {
        if !AttributeRules::new(ctx)
            .has_attribute_value(ConfidentialityLevel::ATTRIBUTE_NAME, level.as_str())
        {
            return Err(Error::access_denied(format!(
                "attribute {} = {level} required",
                ConfidentialityLevel::ATTRIBUTE_NAME
            )));
        }

        let at_most = self
            .repository
            .find_matching(&AdvertisementSpec::ConfidentialityAtMost(level))
            .await?;
        let exact = at_most
            .into_iter()
            .filter(|ad| ad.confidentiality_level == level)
            .collect();
        Ok(Page::of(exact, request))
    }

    /// Replace an advertisement the caller created.
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

        let mut ad = self.owned(ctx, id).await?;
        update.apply_to(&mut ad);
        self.repository.update(&ad, &ctx.unique_user_name()).await
    }

    /// Delete an advertisement the caller created.
    pub async fn delete_by_id(&self, ctx: &SecurityContext, id: i64) -> Result<()> {
        self.owned(ctx, id).await?;
        self.repository.delete(id).await?;
        Ok(())
    }

    async fn owned(&self, ctx: &SecurityContext, id: i64) -> Result<Advertisement> {
        let ad = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("advertisement", id))?;
        if !AttributeRules::new(ctx).is_created_by(&ad) {
            return Err(Error::access_denied(format!(
                "advertisement {id} was not created by {}",
                ctx.unique_user_name()
            )));
        }
        Ok(ad)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::InMemoryAdvertisementRepository;
    use placard_auth::TokenClaims;

    fn ctx(user: &str, levels: &[&str]) -> SecurityContext {
        SecurityContext::from_claims(
            TokenClaims::new(user)
                .with_attribute(ConfidentialityLevel::ATTRIBUTE_NAME, levels.iter().copied()),
        )
        .unwrap()
    }

    async fn seeded() -> AttributeAdvertisementService<InMemoryAdvertisementRepository> {
        let service =
            AttributeAdvertisementService::new(Arc::new(InMemoryAdvertisementRepository::new()));
        let alice = ctx("alice", &[]);
        for level in ConfidentialityLevel::ALL {
            service
                .create(
                    &alice,
                    NewAdvertisement::new(level.description(), "alice@example.com")
                        .with_confidentiality(level),
                )
                .await
                .unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_reads_follow_clearance() {
        let service = seeded().await;
        let bob = ctx("bob", &["INTERNAL"]);

        let page = service.find_page(&bob, PageRequest::first()).await.unwrap();
        let ids: Vec<_> = page.content.iter().map(|ad| ad.id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(service.find_by_id(&bob, 2).await.unwrap().id, 2);
        assert!(service.find_by_id(&bob, 3).await.unwrap_err().is_not_found());

        let alice = ctx("alice", &[]);
        let page = service.find_page(&alice, PageRequest::first()).await.unwrap();
        assert_eq!(page.total_elements, 4);
    }

    #[tokio::test]
    async fn test_find_by_confidentiality_requires_attribute() {
        let service = seeded().await;
        let bob = ctx("bob", &["INTERNAL"]);

        let page = service
            .find_by_confidentiality(&bob, ConfidentialityLevel::Internal, PageRequest::first())
            .await
            .unwrap();
        assert_eq!(page.content.len(), 1);

        let err = service
            .find_by_confidentiality(&bob, ConfidentialityLevel::Public, PageRequest::first())
            .await
            .unwrap_err();
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn test_only_creator_writes() {
        let service = seeded().await;
        let alice = ctx("alice", &[]);
        let bob = ctx("bob", &["STRICTLY_CONFIDENTIAL"]);

        let update = AdvertisementUpdate {
            id: 1,
            title: "Updated".to_string(),
            contact: "alice@example.com".to_string(),
            confidentiality_level: None,
            version: 0,
        };
        assert!(
            service
                .update(&bob, 1, update.clone())
                .await
                .unwrap_err()
                .is_access_denied()
        );
        let err = service.update(&alice, 2, update.clone()).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest { .. }));

        let updated = service.update(&alice, 1, update).await.unwrap();
        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.metadata.version, 1);

        assert!(service.delete_by_id(&bob, 1).await.unwrap_err().is_access_denied());
        service.delete_by_id(&alice, 1).await.unwrap();
        assert!(service.delete_by_id(&alice, 1).await.unwrap_err().is_not_found());
    }
}
