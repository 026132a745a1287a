//! Integration tests for the advertisement lifecycle under ACLs.

use placard_acl::Permission;
use placard_ads::{AdvertisementUpdate, NewAdvertisement, PageRequest, advertisement_identity};
use placard_core::Error;

use crate::common::{TestHarness, user};

#[tokio::test]
async fn test_creator_receives_owner_permissions() {
    let harness = TestHarness::new();
    let alice = user("alice");
    let id = harness.ad(&alice, "Bike").await;

    let acl = harness
        .acl
        .read_acl(&advertisement_identity(id).unwrap())
        .await
        .unwrap();
    let granted: Vec<_> = acl.entries().iter().map(|ace| ace.permission()).collect();
    assert_eq!(
        granted,
        vec![Permission::READ, Permission::WRITE, Permission::ADMINISTRATION]
    );
    assert_eq!(acl.owner().name(), "user/useridp/alice");

    let ad = harness.service.find_by_id(&alice, id).await.unwrap();
    assert_eq!(ad.title, "Bike");
    assert_eq!(ad.metadata.created_by, "user/useridp/alice");
}

#[tokio::test]
async fn test_blank_title_is_rejected_without_acl() {
    let harness = TestHarness::new();
    let alice = user("alice");
    let err = harness
        .service
        .create(&alice, NewAdvertisement::new("  ", "contact"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadRequest { .. }));
    assert!(
        harness
            .acl
            .find_by_permission(Permission::READ, alice.sids())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_other_users_are_denied() {
    let harness = TestHarness::new();
    let id = harness.ad(&user("alice"), "Bike").await;
    let bob = user("bob");

    let err = harness.service.find_by_id(&bob, id).await.unwrap_err();
    assert!(err.is_access_denied());

    // An id without an ACL looks the same as one the caller cannot read.
    let err = harness.service.find_by_id(&bob, 999).await.unwrap_err();
    assert!(err.is_access_denied());
}

#[tokio::test]
async fn test_update_checks_write_and_version() {
    let harness = TestHarness::new();
    let alice = user("alice");
    let id = harness.ad(&alice, "Bike").await;

    let update = AdvertisementUpdate {
        id,
        title: "Red bike".to_string(),
        contact: "contact@example.com".to_string(),
        confidentiality_level: None,
        version: 0,
    };

    let err = harness
        .service
        .update(&user("bob"), id, update.clone())
        .await
        .unwrap_err();
    assert!(err.is_access_denied());

    let err = harness
        .service
        .update(&alice, id + 1, update.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadRequest { .. }));

    let updated = harness
        .service
        .update(&alice, id, update.clone())
        .await
        .unwrap();
    assert_eq!(updated.title, "Red bike");
    assert_eq!(updated.metadata.version, 1);
    assert_eq!(
        updated.metadata.modified_by.as_deref(),
        Some("user/useridp/alice")
    );

    // Same stale version again.
    let err = harness.service.update(&alice, id, update).await.unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
}

#[tokio::test]
async fn test_delete_removes_entity_and_acl() {
    let harness = TestHarness::new();
    let alice = user("alice");
    let id = harness.ad(&alice, "Bike").await;

    let err = harness
        .service
        .delete_by_id(&user("bob"), id)
        .await
        .unwrap_err();
    assert!(err.is_access_denied());

    harness.service.delete_by_id(&alice, id).await.unwrap();
    let err = harness
        .acl
        .read_acl(&advertisement_identity(id).unwrap())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(
        harness
            .service
            .find_all(&alice, PageRequest::first())
            .await
            .unwrap()
            .content
            .is_empty()
    );
}

#[tokio::test]
async fn test_find_all_lists_own_ads_newest_first() {
    let harness = TestHarness::new();
    let alice = user("alice");
    let bob = user("bob");
    let first = harness.ad(&alice, "First").await;
    harness.ad(&bob, "Bob's").await;
    let third = harness.ad(&alice, "Third").await;

    let page = harness
        .service
        .find_all(&alice, PageRequest::first())
        .await
        .unwrap();
    let ids: Vec<_> = page.content.iter().map(|ad| ad.id).collect();
    assert_eq!(ids, vec![third, first]);

    let page = harness
        .service
        .find_all(&alice, PageRequest::new(1, 1))
        .await
        .unwrap();
    assert_eq!(page.content[0].id, first);
    assert_eq!(page.total_pages(), 2);
}
