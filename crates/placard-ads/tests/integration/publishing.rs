//! Integration tests for publishing to bulletin boards and hierarchical reads.

use placard_acl::Permission;
use placard_ads::{PageRequest, advertisement_identity, bulletinboard_identity};

use crate::common::{TestHarness, member, user};

#[tokio::test]
async fn test_board_readers_see_published_ads() {
    let harness = TestHarness::new();
    harness.board("DE", "UG_DE").await;

    let alice = member("alice", &["UG_DE"]);
    let first = harness.ad(&alice, "Bike").await;
    let second = harness.ad(&alice, "Car").await;
    let unpublished = harness.ad(&alice, "Draft").await;
    for id in [first, second] {
        let ad = harness
            .service
            .publish_to_bulletin_board(&alice, id, "DE")
            .await
            .unwrap();
        assert!(ad.published);
    }

    let reader = member("reader", &["UG_DE"]);
    let page = harness
        .service
        .find_all_published(&reader, PageRequest::first())
        .await
        .unwrap();
    let ids: Vec<_> = page.content.iter().map(|ad| ad.id).collect();
    assert_eq!(ids, vec![second, first]);

    // Inherited READ works for single reads too, but not for unpublished ads.
    assert!(harness.service.find_by_id(&reader, first).await.is_ok());
    assert!(
        harness
            .service
            .find_by_id(&reader, unpublished)
            .await
            .unwrap_err()
            .is_access_denied()
    );

    // Direct listing does not follow the hierarchy.
    let direct = harness
        .service
        .find_all(&reader, PageRequest::first())
        .await
        .unwrap();
    assert!(direct.content.is_empty());

    let outsider = member("outsider", &["UG_FR"]);
    let page = harness
        .service
        .find_all_published(&outsider, PageRequest::first())
        .await
        .unwrap();
    assert!(page.content.is_empty());
}

#[tokio::test]
async fn test_publish_requires_board_read() {
    let harness = TestHarness::new();
    harness.board("DE", "UG_DE").await;

    let alice = user("alice");
    let id = harness.ad(&alice, "Bike").await;

    let err = harness
        .service
        .publish_to_bulletin_board(&alice, id, "DE")
        .await
        .unwrap_err();
    assert!(err.is_access_denied());

    let err = harness
        .service
        .publish_to_bulletin_board(&alice, id, "NOWHERE")
        .await
        .unwrap_err();
    assert!(err.is_access_denied());

    let ad = harness.service.find_by_id(&alice, id).await.unwrap();
    assert!(!ad.published);
}

#[tokio::test]
async fn test_publish_links_acl_parent() {
    let harness = TestHarness::new();
    harness.board("DE", "UG_DE").await;
    let alice = member("alice", &["UG_DE"]);
    let id = harness.ad(&alice, "Bike").await;

    harness
        .service
        .publish_to_bulletin_board(&alice, id, "DE")
        .await
        .unwrap();

    let board = bulletinboard_identity("DE").unwrap();
    let acl = harness
        .acl
        .read_acl(&advertisement_identity(id).unwrap())
        .await
        .unwrap();
    assert_eq!(acl.parent(), Some(&board));
    assert_eq!(
        harness.acl.find_children(&board).await.unwrap(),
        vec![advertisement_identity(id).unwrap()]
    );

    // Turning inheritance off hides the ad from board readers again.
    harness
        .acl
        .set_entries_inheriting(&advertisement_identity(id).unwrap(), false)
        .await
        .unwrap();
    let reader = member("reader", &["UG_DE"]);
    assert!(harness.service.find_by_id(&reader, id).await.is_err());
    assert!(
        harness
            .acl
            .has_permission(
                &advertisement_identity(id).unwrap(),
                alice.sids(),
                &[Permission::ADMINISTRATION]
            )
            .await
            .unwrap()
    );
}
