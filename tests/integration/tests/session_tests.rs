//! Unit-of-work integration tests
//!
//! Run with: cargo test -p integration-tests --test session_tests

use std::time::Duration;

use integration_tests::{audit_at, check_test_env, save_members, system_audit, TestDb};
use roster_core::entities::{Member, Team};
use roster_core::error::DomainError;
use roster_core::query::LockMode;
use roster_core::traits::{CrudRepository, MemberRepository, TeamRepository};
use roster_core::value_objects::TeamId;
use roster_db::{PgSession, PgTeamRepository};

#[tokio::test]
async fn test_persist_and_first_level_cache() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();

    let team_id = session.persist_team(Team::new("teamA")).await.unwrap();
    let team = session.find_team(team_id).await.unwrap().unwrap().clone();
    let id = session
        .persist_member(Member::new("member1", 10).with_team(&team))
        .await
        .unwrap();

    let first: *const Member = session.find_member(id).await.unwrap().unwrap();
    let second: *const Member = session.find_member(id).await.unwrap().unwrap();
    assert!(std::ptr::eq(first, second));

    let member = session.find_member(id).await.unwrap().unwrap();
    assert_eq!(member.team_id, Some(team_id));
    assert_eq!(member.audit.created_by.as_deref(), Some("fixture"));

    session.commit().await.unwrap();
    db.cleanup().await;
}

#[tokio::test]
async fn test_dirty_checking_on_flush() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let saved = save_members(&repo, &[("member1", 10)]).await.unwrap();
    let id = saved[0].id.unwrap();

    let mut session = PgSession::begin(&db.pool, audit_at("editor", 3)).await.unwrap();
    session.member_mut(id).await.unwrap().unwrap().set_username("renamed");
    assert!(!session.is_read_only(id));

    // nothing else changed, one statement
    assert_eq!(session.flush().await.unwrap(), 1);
    assert_eq!(session.flush().await.unwrap(), 0);
    session.commit().await.unwrap();

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.username, "renamed");
    assert_eq!(stored.audit.last_modified_by.as_deref(), Some("editor"));
    assert_eq!(stored.audit.created_by.as_deref(), Some("fixture"));

    db.cleanup().await;
}

#[tokio::test]
async fn test_team_rename_is_flushed() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let teams = PgTeamRepository::new(db.pool.clone());
    let team = teams.save(Team::new("teamA"), &system_audit()).await.unwrap();
    let id = team.id.unwrap();

    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    session.team_mut(id).await.unwrap().unwrap().rename("teamZ");
    assert_eq!(session.find_team(id).await.unwrap().unwrap().name, "teamZ");

    assert_eq!(session.flush().await.unwrap(), 1);
    assert_eq!(session.flush().await.unwrap(), 0);
    session.commit().await.unwrap();

    let stored = teams.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "teamZ");
    assert!(teams.find_by_name("teamA").await.unwrap().is_none());

    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    assert!(session.team_mut(TeamId::new(id.into_inner() + 1000)).await.unwrap().is_none());
    session.rollback().await.unwrap();

    db.cleanup().await;
}

#[tokio::test]
async fn test_commit_flushes_and_rollback_discards() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let saved = save_members(&repo, &[("member1", 10)]).await.unwrap();
    let id = saved[0].id.unwrap();

    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    session.member_mut(id).await.unwrap().unwrap().age = 11;
    session.persist_member(Member::named("ghost")).await.unwrap();
    session.rollback().await.unwrap();

    assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().age, 10);
    assert!(repo.find_list_by_username("ghost").await.unwrap().is_empty());

    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    session.member_mut(id).await.unwrap().unwrap().age = 12;
    session.commit().await.unwrap();

    assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().age, 12);

    db.cleanup().await;
}

#[tokio::test]
async fn test_read_only_members_are_never_flushed() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let saved = save_members(&repo, &[("member1", 10)]).await.unwrap();
    let id = saved[0].id.unwrap();

    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    let loaded = session.find_read_only_member_by_username("member1").await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(session.is_managed(id));
    assert!(session.is_read_only(id));

    session.member_mut(id).await.unwrap().unwrap().set_username("member2");
    assert_eq!(session.flush().await.unwrap(), 0);
    session.commit().await.unwrap();

    assert_eq!(repo.find_by_id(id).await.unwrap().unwrap().username, "member1");

    db.cleanup().await;
}

#[tokio::test]
async fn test_bulk_update_leaves_managed_members_stale() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let saved = save_members(
        &repo,
        &[("member1", 10), ("member2", 19), ("member3", 20), ("member4", 21), ("member5", 40)],
    )
    .await
    .unwrap();
    let id5 = saved[4].id.unwrap();

    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    assert_eq!(session.find_member(id5).await.unwrap().unwrap().age, 40);

    let affected = session.bulk_age_plus(20).await.unwrap();
    assert_eq!(affected, 3);

    // the identity map still holds the old state
    assert_eq!(session.find_member(id5).await.unwrap().unwrap().age, 40);
    let reloaded = session.find_by_username_and_age_greater_than("member5", 0).await.unwrap();
    assert_eq!(reloaded[0].age, 40);

    session.clear();
    assert!(!session.is_managed(id5));
    assert_eq!(session.find_member(id5).await.unwrap().unwrap().age, 41);

    session.commit().await.unwrap();
    db.cleanup().await;
}

#[tokio::test]
async fn test_bulk_update_and_clear() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let saved = save_members(&repo, &[("member1", 30), ("member2", 40)]).await.unwrap();
    let id1 = saved[0].id.unwrap();
    let id2 = saved[1].id.unwrap();

    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    session.member_mut(id1).await.unwrap().unwrap().set_username("renamed");
    session.find_member(id2).await.unwrap();

    assert_eq!(session.bulk_age_plus_and_clear(35).await.unwrap(), 1);
    assert_eq!(session.managed_members(), 0);

    // the pending rename was flushed before the map was cleared
    assert_eq!(session.find_member(id1).await.unwrap().unwrap().username, "renamed");
    assert_eq!(session.find_member(id2).await.unwrap().unwrap().age, 41);

    session.commit().await.unwrap();
    db.cleanup().await;
}

#[tokio::test]
async fn test_repository_bulk_update_does_not_refresh_loaded_values() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    save_members(&repo, &[("member5", 40)]).await.unwrap();

    let before = repo.find_member_by_username("member5").await.unwrap().unwrap();
    repo.bulk_age_plus(20).await.unwrap();
    let after = repo.find_member_by_username("member5").await.unwrap().unwrap();

    assert_eq!(before.age, 40);
    assert_eq!(after.age, 41);

    db.cleanup().await;
}

#[tokio::test]
async fn test_entity_manager_style_queries() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    save_members(
        &repo,
        &[("member1", 10), ("member2", 10), ("member3", 10), ("member4", 10), ("member5", 10)],
    )
    .await
    .unwrap();

    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    let members = session.find_members_by_page(10, 0, 3).await.unwrap();
    let names: Vec<_> = members.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(names, vec!["member5", "member4", "member3"]);
    assert_eq!(session.total_count(10).await.unwrap(), 5);
    assert_eq!(session.managed_members(), 3);

    session.commit().await.unwrap();
    db.cleanup().await;
}

#[tokio::test]
async fn test_remove_member() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let saved = save_members(&repo, &[("member1", 10)]).await.unwrap();
    let id = saved[0].id.unwrap();

    let mut session = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    session.find_member(id).await.unwrap();
    session.remove_member(id).await.unwrap();
    assert!(!session.is_managed(id));
    assert!(session.find_member(id).await.unwrap().is_none());

    let err = session.remove_member(id).await.unwrap_err();
    assert!(matches!(err, DomainError::MemberNotFound(_)));

    session.commit().await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 0);

    db.cleanup().await;
}

#[tokio::test]
async fn test_pessimistic_write_lock_blocks_other_writers() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    save_members(&repo, &[("member1", 10)]).await.unwrap();

    let mut holder = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    let locked = holder
        .find_lock_member_by_username("member1", LockMode::PessimisticWrite)
        .await
        .unwrap();
    assert_eq!(locked.len(), 1);

    // a second writer cannot take the row while the first session holds it
    let other_pool = db.another_pool().await.unwrap();
    let mut contender = PgSession::begin(&other_pool, system_audit()).await.unwrap();
    let attempt = tokio::time::timeout(
        Duration::from_millis(300),
        contender.find_lock_member_by_username("member1", LockMode::PessimisticWrite),
    )
    .await;
    assert!(attempt.is_err(), "lock should still be held");
    drop(contender);

    holder.commit().await.unwrap();

    let mut contender = PgSession::begin(&other_pool, system_audit()).await.unwrap();
    let locked = contender
        .find_lock_member_by_username("member1", LockMode::PessimisticWrite)
        .await
        .unwrap();
    assert_eq!(locked.len(), 1);
    contender.commit().await.unwrap();

    other_pool.close().await;
    db.cleanup().await;
}

#[tokio::test]
async fn test_shared_locks_do_not_conflict() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    save_members(&repo, &[("member1", 10)]).await.unwrap();

    let mut first = PgSession::begin(&db.pool, system_audit()).await.unwrap();
    let mut second = PgSession::begin(&db.pool, system_audit()).await.unwrap();

    first
        .find_lock_member_by_username("member1", LockMode::PessimisticRead)
        .await
        .unwrap();
    let shared = tokio::time::timeout(
        Duration::from_secs(2),
        second.find_lock_member_by_username("member1", LockMode::PessimisticRead),
    )
    .await;
    assert!(shared.is_ok(), "shared locks should not wait on each other");

    first.rollback().await.unwrap();
    second.rollback().await.unwrap();
    db.cleanup().await;
}
