//! Paging and slicing integration tests
//!
//! Run with: cargo test -p integration-tests --test paging_tests

use integration_tests::{check_test_env, save_members, setup_team_members, TestDb};
use roster_core::query::{MemberField, PageRequest, Sort};
use roster_core::traits::{MemberRepository, PagingRepository, SpecificationExecutor};
use roster_core::query::member_spec;
use roster_db::{PgMemberQueryRepository, PgMemberRepository, PgTeamRepository};

/// member1..member5 aged 10, plus member6 aged 20
async fn seed_ages(repo: &PgMemberRepository) {
    save_members(
        repo,
        &[
            ("member1", 10),
            ("member2", 10),
            ("member3", 10),
            ("member4", 10),
            ("member5", 10),
            ("member6", 20),
        ],
    )
    .await
    .unwrap();
}

fn by_username_desc(page: u32, size: u32) -> PageRequest<MemberField> {
    PageRequest::sorted(page, size, Sort::desc(MemberField::Username))
}

#[tokio::test]
async fn test_paging() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    seed_ages(&repo).await;

    let page = repo.find_by_age(10, &by_username_desc(0, 3)).await.unwrap();

    let names: Vec<_> = page.content().iter().map(|m| m.username.as_str()).collect();
    assert_eq!(names, vec!["member5", "member4", "member3"]);
    assert_eq!(page.total_elements(), 5);
    assert_eq!(page.number(), 0);
    assert_eq!(page.total_pages(), 2);
    assert!(page.is_first());
    assert!(page.has_next());

    let second = repo.find_by_age(10, &by_username_desc(1, 3)).await.unwrap();
    assert_eq!(second.number_of_elements(), 2);
    assert_eq!(second.total_elements(), 5);
    assert!(second.is_last());
    assert!(!second.has_next());

    db.cleanup().await;
}

#[tokio::test]
async fn test_paging_seven_members() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let rows: Vec<(String, i32)> = (1..=7).map(|i| (format!("member{i}"), 10)).collect();
    let rows: Vec<(&str, i32)> = rows.iter().map(|(name, age)| (name.as_str(), *age)).collect();
    save_members(&repo, &rows).await.unwrap();

    let page = repo.find_by_age(10, &by_username_desc(0, 3)).await.unwrap();
    let names: Vec<_> = page.content().iter().map(|m| m.username.as_str()).collect();
    assert_eq!(names, vec!["member7", "member6", "member5"]);
    assert_eq!(page.number_of_elements(), 3);
    assert_eq!(page.total_elements(), 7);
    assert_eq!(page.total_pages(), 3);
    assert!(page.is_first());
    assert!(page.has_next());

    let last = repo.find_by_age(10, &by_username_desc(2, 3)).await.unwrap();
    assert_eq!(last.number_of_elements(), 1);
    assert_eq!(last.content()[0].username, "member1");
    assert_eq!(last.total_elements(), 7);
    assert!(!last.is_first());
    assert!(last.is_last());
    assert!(!last.has_next());

    db.cleanup().await;
}

#[tokio::test]
async fn test_page_past_the_end() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    seed_ages(&repo).await;

    let page = repo.find_by_age(10, &by_username_desc(5, 3)).await.unwrap();
    assert!(page.content().is_empty());
    assert_eq!(page.total_elements(), 5);
    assert!(page.is_last());

    let empty = repo.find_by_age(99, &by_username_desc(0, 3)).await.unwrap();
    assert_eq!(empty.total_elements(), 0);
    assert_eq!(empty.total_pages(), 0);

    db.cleanup().await;
}

#[tokio::test]
async fn test_slice_has_no_total() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    seed_ages(&repo).await;

    let slice = repo.find_slice_by_age(10, &by_username_desc(0, 3)).await.unwrap();
    assert_eq!(slice.number_of_elements(), 3);
    assert!(slice.has_next());
    assert!(slice.is_first());

    let last = repo.find_slice_by_age(10, &by_username_desc(1, 3)).await.unwrap();
    assert_eq!(last.number_of_elements(), 2);
    assert!(!last.has_next());

    // exactly one full page left
    let exact = repo.find_slice_by_age(10, &by_username_desc(0, 5)).await.unwrap();
    assert_eq!(exact.number_of_elements(), 5);
    assert!(!exact.has_next());

    db.cleanup().await;
}

#[tokio::test]
async fn test_list_by_age_and_mapping() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    seed_ages(&repo).await;

    let list = repo.find_list_by_age(10, &by_username_desc(0, 3)).await.unwrap();
    assert_eq!(list.len(), 3);

    let page = repo
        .find_by_age(10, &by_username_desc(0, 3))
        .await
        .unwrap()
        .map(|member| roster_core::MemberDto::from(&member));
    assert_eq!(page.content()[0].username, "member5");
    assert_eq!(page.total_elements(), 5);

    db.cleanup().await;
}

#[tokio::test]
async fn test_detached_count_query() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    seed_ages(&repo).await;

    let joined = repo
        .find_by_age_detach_count_query(10, &by_username_desc(0, 3))
        .await
        .unwrap();
    let plain = repo.find_by_age(10, &by_username_desc(0, 3)).await.unwrap();

    assert_eq!(joined.total_elements(), plain.total_elements());
    assert_eq!(joined.content(), plain.content());

    db.cleanup().await;
}

#[tokio::test]
async fn test_paged_specifications() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    seed_ages(&repo).await;

    let all = repo.find_all_paged(&PageRequest::of(0, 4)).await.unwrap();
    assert_eq!(all.total_elements(), 6);
    assert_eq!(all.number_of_elements(), 4);

    let spec = member_spec::age_greater_than(15);
    let page = repo
        .find_all_by_spec_paged(&spec, &PageRequest::of(0, 4))
        .await
        .unwrap();
    assert_eq!(page.total_elements(), 1);
    assert_eq!(page.content()[0].username, "member6");

    db.cleanup().await;
}

#[tokio::test]
async fn test_native_projection_page() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let teams = PgTeamRepository::new(db.pool.clone());
    setup_team_members(&teams, &repo).await.unwrap();
    save_members(&repo, &[("loner", 50)]).await.unwrap();

    let page = repo.find_by_native_projection(&PageRequest::of(0, 3)).await.unwrap();
    assert_eq!(page.number_of_elements(), 3);
    assert_eq!(page.total_elements(), 5);
    assert_eq!(page.content()[0].username, "member1");
    assert_eq!(page.content()[0].team_name.as_deref(), Some("teamA"));

    let last = repo.find_by_native_projection(&PageRequest::of(1, 3)).await.unwrap();
    assert_eq!(last.content()[1].username, "loner");
    assert_eq!(last.content()[1].team_name, None);

    db.cleanup().await;
}

#[tokio::test]
async fn test_query_repository_summaries() {
    if !check_test_env() {
        return;
    }
    let db = TestDb::new().await.unwrap();
    let repo = db.member_repository().await.unwrap();
    let teams = PgTeamRepository::new(db.pool.clone());
    setup_team_members(&teams, &repo).await.unwrap();
    save_members(&repo, &[("loner", 50)]).await.unwrap();

    let queries = PgMemberQueryRepository::new(db.pool.clone());
    assert_eq!(queries.find_all_members().await.unwrap().len(), 5);

    let request = PageRequest::sorted(0, 2, Sort::asc(MemberField::Username));
    let page = queries.find_member_summaries(&request).await.unwrap();
    assert_eq!(page.total_elements(), 5);
    assert_eq!(page.content()[0].username, "loner");
    assert_eq!(page.content()[0].team_name, None);
    assert_eq!(page.content()[1].team_name.as_deref(), Some("teamA"));

    db.cleanup().await;
}
