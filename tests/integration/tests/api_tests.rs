//! API integration tests
//!
//! Requests are driven through the router in-process with
//! `tower::ServiceExt::oneshot`; no port is bound.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use axum::http::StatusCode;
use integration_tests::{
    assert_json, assert_status, check_test_env, save_members, setup_team_members,
    CreateMemberBody, MemberBody, PageBody, TestApp, TestDb,
};
use roster_api::seed::{seed_sample_members, SAMPLE_MEMBERS};
use roster_core::traits::CrudRepository;
use roster_db::PgTeamRepository;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let app = TestApp::start(&db).await.unwrap();

    let response = app.get("/health").await.unwrap();
    assert_status(&response, StatusCode::OK).unwrap();

    let response = app.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(&response, StatusCode::OK).unwrap();
    assert_eq!(body["database"], true);

    db.cleanup().await;
}

// ============================================================================
// Member Tests
// ============================================================================

#[tokio::test]
async fn test_get_member_username() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let saved = save_members(&repo, &[("member1", 10)]).await.unwrap();
    let id = saved[0].id.unwrap();
    let app = TestApp::start(&db).await.unwrap();

    let response = app.get(&format!("/members/{id}")).await.unwrap();
    assert_status(&response, StatusCode::OK).unwrap();
    assert_eq!(response.text(), "member1");
    assert!(response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("text/plain")));

    db.cleanup().await;
}

#[tokio::test]
async fn test_get_member_errors() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let app = TestApp::start(&db).await.unwrap();

    let response = app.get("/members/999").await.unwrap();
    let body: serde_json::Value = assert_json(&response, StatusCode::NOT_FOUND).unwrap();
    assert_eq!(body["error"]["code"], "UNKNOWN_MEMBER");

    let response = app.get("/members/abc").await.unwrap();
    assert_status(&response, StatusCode::BAD_REQUEST).unwrap();

    db.cleanup().await;
}

#[tokio::test]
async fn test_list_members_defaults() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let audit = roster_core::AuditContext::new("seed");
    assert_eq!(
        seed_sample_members(&repo, &audit).await.unwrap(),
        SAMPLE_MEMBERS as usize
    );
    // a second run leaves a populated table alone
    assert_eq!(seed_sample_members(&repo, &audit).await.unwrap(), 0);
    let app = TestApp::start(&db).await.unwrap();

    let response = app.get("/members").await.unwrap();
    let page: PageBody<MemberBody> = assert_json(&response, StatusCode::OK).unwrap();

    assert_eq!(page.size, 5);
    assert_eq!(page.number, 0);
    assert_eq!(page.total_elements, 100);
    assert_eq!(page.total_pages, 20);
    assert!(page.first);
    assert!(!page.last);
    assert!(page.has_next);
    assert_eq!(page.previous, None);
    assert_eq!(page.next, Some(1));

    // username ascending, compared as text
    let names: Vec<_> = page.content.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(names, vec!["member 0", "member 1", "member 10", "member 11", "member 12"]);

    db.cleanup().await;
}

#[tokio::test]
async fn test_list_members_paging_and_sort() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let teams = PgTeamRepository::new(db.pool.clone());
    setup_team_members(&teams, &repo).await.unwrap();
    let app = TestApp::start(&db).await.unwrap();

    let response = app.get("/members?page=1&size=3&sort=age,desc").await.unwrap();
    let page: PageBody<MemberBody> = assert_json(&response, StatusCode::OK).unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].username, "member1");
    assert_eq!(page.content[0].team_name.as_deref(), Some("teamA"));
    assert!(page.last);
    assert_eq!(page.previous, Some(0));
    assert_eq!(page.next, None);

    let response = app.get("/members?sort=team.name,desc;username").await.unwrap();
    let page: PageBody<MemberBody> = assert_json(&response, StatusCode::OK).unwrap();
    assert_eq!(page.content[0].username, "member3");

    let response = app.get("/members?sort=password").await.unwrap();
    let body: serde_json::Value = assert_json(&response, StatusCode::BAD_REQUEST).unwrap();
    assert_eq!(body["error"]["code"], "INVALID_SORT");

    let response = app.get("/members?size=1000").await.unwrap();
    let page: PageBody<MemberBody> = assert_json(&response, StatusCode::OK).unwrap();
    assert_eq!(page.size, 100);

    db.cleanup().await;
}

#[tokio::test]
async fn test_create_member_records_actor() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let app = TestApp::start(&db).await.unwrap();

    let response = app
        .post("/members", &CreateMemberBody::new("created", 33), Some("alice"))
        .await
        .unwrap();
    let created: MemberBody = assert_json(&response, StatusCode::CREATED).unwrap();
    assert_eq!(created.username, "created");
    assert!(created.team_name.is_none());

    let stored = repo
        .find_by_id(roster_core::MemberId::new(created.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.age, 33);
    assert_eq!(stored.audit.created_by.as_deref(), Some("alice"));

    // without the header the configured default auditor is used
    let response = app
        .post("/members", &CreateMemberBody::new("anonymous", 1), None)
        .await
        .unwrap();
    let created: MemberBody = assert_json(&response, StatusCode::CREATED).unwrap();
    let stored = repo
        .find_by_id(roster_core::MemberId::new(created.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.audit.created_by.as_deref(), Some("test-system"));

    db.cleanup().await;
}

#[tokio::test]
async fn test_create_member_in_team() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let teams = PgTeamRepository::new(db.pool.clone());
    let fixture = setup_team_members(&teams, &repo).await.unwrap();
    let app = TestApp::start(&db).await.unwrap();

    let mut body = CreateMemberBody::new("newcomer", 5);
    body.team_id = fixture.team_b.id.map(roster_core::TeamId::into_inner);
    let response = app.post("/members", &body, Some("bob")).await.unwrap();
    let created: MemberBody = assert_json(&response, StatusCode::CREATED).unwrap();
    assert_eq!(created.team_name.as_deref(), Some("teamB"));

    let mut body = CreateMemberBody::new("lost", 5);
    body.team_id = Some(9999);
    let response = app.post("/members", &body, Some("bob")).await.unwrap();
    let error: serde_json::Value = assert_json(&response, StatusCode::NOT_FOUND).unwrap();
    assert_eq!(error["error"]["code"], "UNKNOWN_TEAM");

    db.cleanup().await;
}

#[tokio::test]
async fn test_create_member_validation() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let app = TestApp::start(&db).await.unwrap();

    let response = app
        .post("/members", &CreateMemberBody::new("", 10), None)
        .await
        .unwrap();
    let body: serde_json::Value = assert_json(&response, StatusCode::BAD_REQUEST).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let response = app
        .post("/members", &serde_json::json!({ "age": 3 }), None)
        .await
        .unwrap();
    assert_status(&response, StatusCode::BAD_REQUEST).unwrap();

    db.cleanup().await;
}
