//! Single-record reconciliation against the in-memory guild
//!
//! Run with: cargo test -p integration-tests --test reconcile_tests

use integration_tests::*;
use rolesync_service::{RecordResolver, ServiceError};

// ============================================================================
// Target Role Resolution
// ============================================================================

async fn resolve(world: &TestWorld, record: &RecordBuilder) -> Vec<rolesync_core::Snowflake> {
    let engine = world.start().await;
    let target = RecordResolver::new(engine.context(), engine.roles(), engine.team_names())
        .resolve(&record.record())
        .await
        .expect("resolution should succeed");
    sorted(target.into_vec())
}

#[tokio::test]
async fn test_resolve_team_and_leadership_example() {
    let world = TestWorld::new();
    let record = RecordBuilder::new("rec-alice")
        .handle("@Alice")
        .teams(&[SOFTWARE_TEAM])
        .positions(&["Lead Engineer"]);

    // "Lead Engineer" is not a role name, so only the leadership role comes from it
    assert_eq!(
        resolve(&world, &record).await,
        vec![SOFTWARE_ROLE, TECH_LEAD_ROLE]
    );
}

#[tokio::test]
async fn test_active_status_contributes_nothing() {
    let world = TestWorld::new();
    assert!(resolve(&world, &RecordBuilder::new("r1")).await.is_empty());
    assert!(resolve(&world, &RecordBuilder::new("r2").no_status())
        .await
        .is_empty());
}

#[tokio::test]
async fn test_other_status_names_its_role() {
    let world = TestWorld::new();
    let record = RecordBuilder::new("r1").status("Alumni");
    assert_eq!(resolve(&world, &record).await, vec![ALUMNI_ROLE]);

    let record = RecordBuilder::new("r2").status("On Leave");
    assert!(resolve(&world, &record).await.is_empty());
}

#[tokio::test]
async fn test_team_suffix_stripped_from_teams_and_positions() {
    let world = TestWorld::new();
    let record = RecordBuilder::new("r1")
        .teams(&[ROBOTICS_TEAM])
        .positions(&["Robotics Team"]);
    assert_eq!(resolve(&world, &record).await, vec![ROBOTICS_ROLE]);
}

#[tokio::test]
async fn test_individual_contributor_never_contributes() {
    let world = TestWorld::new();
    let record = RecordBuilder::new("r1").positions(&["Individual Contributor"]);
    assert!(resolve(&world, &record).await.is_empty());
}

#[tokio::test]
async fn test_leadership_role_independent_of_named_role() {
    let world = TestWorld::new();

    // Matches the pattern and is also a role name: one role, added once
    let record = RecordBuilder::new("r1").positions(&["Technical Lead"]);
    assert_eq!(resolve(&world, &record).await, vec![TECH_LEAD_ROLE]);

    let record = RecordBuilder::new("r2").positions(&["Project Lead", "Project Manager"]);
    assert_eq!(
        resolve(&world, &record).await,
        vec![PROJECT_MANAGER_ROLE, TECH_LEAD_ROLE]
    );
}

// ============================================================================
// Reconcile
// ============================================================================

#[tokio::test]
async fn test_reconcile_applies_target_roles() {
    let world = TestWorld::new();
    world.platform.add_member(member(ALICE, "alice", vec![]));
    let engine = world.start().await;

    let record = RecordBuilder::new("rec-alice")
        .handle("@Alice")
        .teams(&[SOFTWARE_TEAM])
        .positions(&["Lead Engineer"]);
    let matched = engine.reconcile(&record.record(), false).await.unwrap();

    assert_eq!(matched.map(|m| m.user_id), Some(ALICE));
    assert_eq!(
        sorted(world.platform.roles_of(ALICE)),
        vec![SOFTWARE_ROLE, TECH_LEAD_ROLE]
    );
    assert_eq!(world.platform.mutations().len(), 1);
    assert!(world.platform.searches().is_empty());
}

#[tokio::test]
async fn test_reconcile_removes_stale_roles() {
    let world = TestWorld::new();
    world
        .platform
        .add_member(member(ALICE, "alice", vec![ROBOTICS_ROLE, ALUMNI_ROLE]));
    let engine = world.start().await;

    let record = RecordBuilder::new("rec-alice")
        .handle("alice")
        .teams(&[SOFTWARE_TEAM]);
    engine.reconcile(&record.record(), false).await.unwrap();

    assert_eq!(world.platform.roles_of(ALICE), vec![SOFTWARE_ROLE]);
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let world = TestWorld::new();
    world.platform.add_member(member(ALICE, "alice", vec![]));
    let engine = world.start().await;

    let record = RecordBuilder::new("rec-alice")
        .handle("@alice")
        .teams(&[SOFTWARE_TEAM, ROBOTICS_TEAM]);
    engine.reconcile(&record.record(), false).await.unwrap();
    let after_first = sorted(world.platform.roles_of(ALICE));
    world.platform.clear_calls();

    engine.reconcile(&record.record(), false).await.unwrap();

    assert_eq!(sorted(world.platform.roles_of(ALICE)), after_first);
    assert!(world.platform.mutations().is_empty());
}

#[tokio::test]
async fn test_reconcile_preserves_unmanaged_roles() {
    let world = TestWorld::new();
    world.platform.add_member(member(
        ALICE,
        "alice",
        vec![ADMIN_ROLE, BOT_ROLE, BOOSTER_ROLE, UNKNOWN_ROLE, ALUMNI_ROLE],
    ));
    let engine = world.start().await;

    let record = RecordBuilder::new("rec-alice")
        .handle("alice")
        .teams(&[SOFTWARE_TEAM]);
    engine.reconcile(&record.record(), false).await.unwrap();

    assert_eq!(
        sorted(world.platform.roles_of(ALICE)),
        vec![BOOSTER_ROLE, SOFTWARE_ROLE, BOT_ROLE, ADMIN_ROLE, UNKNOWN_ROLE]
    );
}

#[tokio::test]
async fn test_reconcile_rereads_member_before_writing() {
    let world = TestWorld::new();
    world.platform.add_member(member(ALICE, "alice", vec![]));
    let engine = world.start().await;

    // Granted after the roster snapshot was taken
    world.platform.set_roles(ALICE, vec![ADMIN_ROLE]);

    let record = RecordBuilder::new("rec-alice")
        .handle("alice")
        .teams(&[SOFTWARE_TEAM]);
    engine.reconcile(&record.record(), false).await.unwrap();

    assert_eq!(
        sorted(world.platform.roles_of(ALICE)),
        vec![SOFTWARE_ROLE, ADMIN_ROLE]
    );
}

#[tokio::test]
async fn test_dry_run_makes_no_changes() {
    let world = TestWorld::new();
    world
        .platform
        .add_member(member(ALICE, "alice", vec![ALUMNI_ROLE]));
    let engine = world.start().await;

    let record = RecordBuilder::new("rec-alice")
        .handle("alice")
        .teams(&[SOFTWARE_TEAM]);
    let matched = engine.reconcile(&record.record(), true).await.unwrap();

    assert_eq!(matched.map(|m| m.user_id), Some(ALICE));
    assert_eq!(world.platform.roles_of(ALICE), vec![ALUMNI_ROLE]);
    assert!(world.platform.mutations().is_empty());
}

#[tokio::test]
async fn test_blank_handle_is_skipped() {
    let world = TestWorld::new();
    let engine = world.start().await;

    for record in [
        RecordBuilder::new("r1"),
        RecordBuilder::new("r2").handle("   "),
        RecordBuilder::new("r3").handle("@"),
    ] {
        let matched = engine.reconcile(&record.record(), false).await.unwrap();
        assert!(matched.is_none());
    }
    assert!(world.platform.calls().is_empty());
}

#[tokio::test]
async fn test_member_outside_snapshot_found_by_search() {
    let world = TestWorld::new();
    let engine = world.start().await;
    world.platform.add_member(member(BOB, "Bob", vec![]));

    let record = RecordBuilder::new("rec-bob")
        .handle("@BOB")
        .teams(&[ROBOTICS_TEAM]);
    let matched = engine.reconcile(&record.record(), false).await.unwrap();
    assert_eq!(matched.map(|m| m.user_id), Some(BOB));
    assert_eq!(world.platform.searches(), vec!["bob".to_string()]);
    assert_eq!(world.platform.roles_of(BOB), vec![ROBOTICS_ROLE]);

    // Search hits join the roster
    world.platform.clear_calls();
    engine.reconcile(&record.record(), true).await.unwrap();
    assert!(world.platform.searches().is_empty());
}

#[tokio::test]
async fn test_search_requires_exact_username() {
    let world = TestWorld::new();
    let engine = world.start().await;
    world.platform.add_member(member(CAROL, "caroline", vec![]));

    let record = RecordBuilder::new("rec-carol").handle("carol");
    let matched = engine.reconcile(&record.record(), false).await.unwrap();

    assert!(matched.is_none());
    assert_eq!(world.platform.searches(), vec!["carol".to_string()]);
    assert!(world.platform.mutations().is_empty());
}

#[tokio::test]
async fn test_bot_without_roles_is_an_error() {
    let world = TestWorld::new();
    world.platform.add_member(member(ALICE, "alice", vec![]));
    let engine = world.start().await;
    world.platform.set_roles(BOT_USER_ID, vec![]);

    let record = RecordBuilder::new("rec-alice")
        .handle("alice")
        .teams(&[SOFTWARE_TEAM]);
    let err = engine.reconcile(&record.record(), false).await.unwrap_err();

    assert!(matches!(err, ServiceError::BotHasNoRoles));
    assert!(world.platform.mutations().is_empty());
}

#[tokio::test]
async fn test_unreachable_team_aborts_record() {
    let world = TestWorld::new();
    world
        .platform
        .add_member(member(ALICE, "alice", vec![ALUMNI_ROLE]));
    let engine = world.start().await;

    let record = RecordBuilder::new("rec-alice")
        .handle("alice")
        .teams(&["team-deleted"]);
    let err = engine.reconcile(&record.record(), false).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(world.platform.roles_of(ALICE), vec![ALUMNI_ROLE]);
    assert!(world.platform.mutations().is_empty());
}
