//! Team name resolution through the membership database
//!
//! Run with: cargo test -p integration-tests --test team_name_tests

use integration_tests::*;
use rolesync_core::{DomainError, PageId};
use rolesync_service::ServiceError;

#[tokio::test]
async fn test_first_lookup_fetches_page_and_caches_property_id() {
    let world = TestWorld::new();
    let engine = world.start().await;
    let teams = engine.team_names();
    assert!(teams.cached_property_id().is_none());

    let name = teams
        .resolve(world.database.as_ref(), &PageId::new(SOFTWARE_TEAM))
        .await
        .unwrap();

    assert_eq!(name, "Software Team");
    assert_eq!(
        teams.cached_property_id().as_deref(),
        Some(TEAM_NAME_PROPERTY_ID)
    );
    assert_eq!(
        world.database.calls(),
        vec![DatabaseCall::RetrievePage(PageId::new(SOFTWARE_TEAM))]
    );
}

#[tokio::test]
async fn test_later_lookups_use_property_endpoint() {
    let world = TestWorld::new();
    let engine = world.start().await;
    let teams = engine.team_names();

    teams
        .resolve(world.database.as_ref(), &PageId::new(SOFTWARE_TEAM))
        .await
        .unwrap();
    world.database.clear_calls();

    let name = teams
        .resolve(world.database.as_ref(), &PageId::new(ROBOTICS_TEAM))
        .await
        .unwrap();

    assert_eq!(name, "Robotics Team");
    assert_eq!(
        world.database.calls(),
        vec![DatabaseCall::RetrieveProperty {
            page_id: PageId::new(ROBOTICS_TEAM),
            property_id: TEAM_NAME_PROPERTY_ID.to_string(),
        }]
    );
}

#[tokio::test]
async fn test_missing_cached_property_falls_back_to_page() {
    let world = TestWorld::new();
    let engine = world.start().await;
    let teams = engine.team_names();

    teams
        .resolve(world.database.as_ref(), &PageId::new(SOFTWARE_TEAM))
        .await
        .unwrap();
    world.database.put_page(team_page_with_property_id(
        ROBOTICS_TEAM,
        "Robotics Team",
        "renamed",
    ));
    world.database.clear_calls();

    let name = teams
        .resolve(world.database.as_ref(), &PageId::new(ROBOTICS_TEAM))
        .await
        .unwrap();

    assert_eq!(name, "Robotics Team");
    assert_eq!(world.database.calls().len(), 2);
    assert!(matches!(
        world.database.calls()[1],
        DatabaseCall::RetrievePage(_)
    ));
    assert_eq!(teams.cached_property_id().as_deref(), Some("renamed"));
}

#[tokio::test]
async fn test_dashed_and_plain_ids_refer_to_same_team() {
    let world = TestWorld::new();
    world.database.put_page(team_page(
        "0f1e2d3c4b5a69788796a5b4c3d2e1f0",
        "Outreach Team",
    ));
    let engine = world.start().await;

    let name = engine
        .team_names()
        .resolve(
            world.database.as_ref(),
            &PageId::new("0F1E2D3C-4B5A-6978-8796-A5B4C3D2E1F0"),
        )
        .await
        .unwrap();

    assert_eq!(name, "Outreach Team");
}

#[tokio::test]
async fn test_empty_team_name_is_a_schema_error() {
    let world = TestWorld::new();
    world
        .database
        .put_page(team_page_with_property_id("team-blank", "", "title"));
    let engine = world.start().await;

    let err = engine
        .team_names()
        .resolve(world.database.as_ref(), &PageId::new("team-blank"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::MalformedProperty(_))
    ));
}

#[tokio::test]
async fn test_unknown_team_page_fails() {
    let world = TestWorld::new();
    let engine = world.start().await;

    let err = engine
        .team_names()
        .resolve(world.database.as_ref(), &PageId::new("team-gone"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_fast_path_remote_error_does_not_fall_back() {
    let world = TestWorld::new();
    let engine = world.start().await;
    let teams = engine.team_names();

    teams
        .resolve(world.database.as_ref(), &PageId::new(SOFTWARE_TEAM))
        .await
        .unwrap();
    world.database.clear_calls();
    world
        .database
        .fail_next_property_item(DomainError::RateLimited { service: "notion" });

    let err = teams
        .resolve(world.database.as_ref(), &PageId::new(ROBOTICS_TEAM))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::RateLimited { .. })
    ));
    assert_eq!(
        world.database.calls(),
        vec![DatabaseCall::RetrieveProperty {
            page_id: PageId::new(ROBOTICS_TEAM),
            property_id: TEAM_NAME_PROPERTY_ID.to_string(),
        }]
    );
    assert_eq!(
        teams.cached_property_id().as_deref(),
        Some(TEAM_NAME_PROPERTY_ID)
    );
}

#[tokio::test]
async fn test_non_title_property_item_is_a_type_mismatch() {
    let world = TestWorld::new();
    world
        .database
        .put_page(team_page_with_select_at("team-ops", TEAM_NAME_PROPERTY_ID));
    let engine = world.start().await;
    let teams = engine.team_names();

    teams
        .resolve(world.database.as_ref(), &PageId::new(SOFTWARE_TEAM))
        .await
        .unwrap();
    world.database.clear_calls();

    let err = teams
        .resolve(world.database.as_ref(), &PageId::new("team-ops"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::PropertyTypeMismatch { expected: "title", .. })
    ));
    assert!(world
        .database
        .calls()
        .iter()
        .all(|call| !matches!(call, DatabaseCall::RetrievePage(_))));
}
