//! Integration tests for sharing advertisements with users and groups.

use placard_acl::Permission;
use placard_ads::PageRequest;
use placard_auth::AclAttribute;

use crate::common::{TestHarness, member, user};

#[tokio::test]
async fn test_grant_and_revoke_for_user() {
    let harness = TestHarness::new();
    let alice = user("alice");
    let bob = user("bob");
    let id = harness.ad(&alice, "Bike").await;

    harness
        .service
        .grant_permissions(&alice, id, "bob", &[Permission::READ])
        .await
        .unwrap();
    assert_eq!(harness.service.find_by_id(&bob, id).await.unwrap().id, id);

    harness
        .service
        .remove_permissions(&alice, id, "bob", &[Permission::READ])
        .await
        .unwrap();
    assert!(
        harness
            .service
            .find_by_id(&bob, id)
            .await
            .unwrap_err()
            .is_access_denied()
    );
}

#[tokio::test]
async fn test_sharing_requires_administration() {
    let harness = TestHarness::new();
    let alice = user("alice");
    let bob = user("bob");
    let id = harness.ad(&alice, "Bike").await;

    harness
        .service
        .grant_permissions(&alice, id, "bob", &[Permission::READ, Permission::WRITE])
        .await
        .unwrap();

    let err = harness
        .service
        .grant_permissions(&bob, id, "carol", &[Permission::READ])
        .await
        .unwrap_err();
    assert!(err.is_access_denied());

    let err = harness
        .service
        .grant_permissions_to_group(&bob, id, "UG_A", &[Permission::READ])
        .await
        .unwrap_err();
    assert!(err.is_access_denied());
}

#[tokio::test]
async fn test_group_grant_reaches_members() {
    let harness = TestHarness::new();
    let alice = user("alice");
    let id = harness.ad(&alice, "Bike").await;

    harness
        .service
        .grant_permissions_to_group(&alice, id, "UG_A", &[Permission::READ])
        .await
        .unwrap();

    let carol = member("carol", &["UG_A"]);
    let dave = member("dave", &["UG_B"]);
    assert!(harness.service.find_by_id(&carol, id).await.is_ok());
    assert!(harness.service.find_by_id(&dave, id).await.is_err());

    let page = harness
        .service
        .find_all(&carol, PageRequest::first())
        .await
        .unwrap();
    assert_eq!(page.total_elements, 1);
}

#[tokio::test]
async fn test_attribute_finder_lists_granted_values() {
    let harness = TestHarness::new();
    let alice = user("alice");
    let id = harness.ad(&alice, "Bike").await;
    for group in ["UG_B", "UG_A", "UG_B"] {
        harness
            .service
            .grant_permissions_to_group(&alice, id, group, &[Permission::READ])
            .await
            .unwrap();
    }
    harness.board("DE", "UG_C").await;

    assert_eq!(
        harness
            .service
            .attribute_values(AclAttribute::Group)
            .await
            .unwrap(),
        vec!["UG_A", "UG_B", "UG_C"]
    );
    assert!(
        harness
            .service
            .attribute_values(AclAttribute::Location)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        harness.service.attributes(),
        vec!["group", "bulletinboard", "location"]
    );
}
