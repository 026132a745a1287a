//! Common test utilities and harness for advertisement integration tests.

use std::sync::Arc;

use placard_acl::{AclService, InMemoryAclStore, Permission};
use placard_ads::{
    AdvertisementService, InMemoryAdvertisementRepository, NewAdvertisement,
    bulletinboard_identity,
};
use placard_auth::{AclAttribute, SecurityContext, TokenClaims};

/// Identity zone origin used by every test user.
pub const ORIGIN: &str = "useridp";

/// Test harness wiring the advertisement service to in-memory stores.
pub struct TestHarness {
    /// The service under test.
    pub service: AdvertisementService<InMemoryAdvertisementRepository, InMemoryAclStore>,
    /// The ACL service shared with `service`.
    pub acl: Arc<AclService<InMemoryAclStore>>,
}

impl TestHarness {
    /// Creates a harness with empty stores.
    pub fn new() -> Self {
        let acl = Arc::new(AclService::new(Arc::new(InMemoryAclStore::new())));
        let service = AdvertisementService::new(
            Arc::new(InMemoryAdvertisementRepository::new()),
            acl.clone(),
        );
        Self { service, acl }
    }

    /// Creates a bulletin board ACL readable by members of `group`.
    pub async fn board(&self, name: &str, group: &str) {
        let admin = placard_acl::Sid::principal("board-admin");
        self.acl
            .grant(
                &bulletinboard_identity(name).unwrap(),
                &AclAttribute::Group.sid_for_value(group),
                &[Permission::READ],
                &admin,
            )
            .await
            .expect("board ACL should be created");
    }

    /// Creates an advertisement owned by `owner`, returning its id.
    pub async fn ad(&self, owner: &SecurityContext, title: &str) -> i64 {
        self.service
            .create(owner, NewAdvertisement::new(title, "contact@example.com"))
            .await
            .expect("advertisement should be created")
            .id
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A caller with no attributes.
pub fn user(name: &str) -> SecurityContext {
    SecurityContext::from_claims(TokenClaims::new(name).with_origin(ORIGIN)).unwrap()
}

/// A caller belonging to the given user groups.
pub fn member(name: &str, groups: &[&str]) -> SecurityContext {
    SecurityContext::from_claims(
        TokenClaims::new(name)
            .with_origin(ORIGIN)
            .with_attribute(AclAttribute::Group.attribute_name(), groups.iter().copied()),
    )
    .unwrap()
}
