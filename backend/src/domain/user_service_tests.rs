//! Tests for account management.

use std::sync::Arc;

use rstest::{fixture, rstest};
use zeroize::Zeroizing;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::auth::verify_password;
use crate::domain::ports::MockUserRepository;
use crate::outbound::memory::InMemoryUserRepository;
use crate::test_support::{MutableClock, TEST_BCRYPT_COST, fixed_now, stored_user};

struct Harness {
    service: UserService,
    repo: Arc<InMemoryUserRepository>,
    clock: Arc<MutableClock>,
}

#[fixture]
fn harness() -> Harness {
    let repo = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(MutableClock::default());
    Harness {
        service: UserService::new(
            repo.clone(),
            PasswordHasher::new(TEST_BCRYPT_COST),
            clock.clone(),
        ),
        repo,
        clock,
    }
}

fn with_mock(repo: MockUserRepository) -> UserService {
    UserService::new(
        Arc::new(repo),
        PasswordHasher::new(TEST_BCRYPT_COST),
        Arc::new(MutableClock::default()),
    )
}

fn create_request(email: &str) -> CreateUser {
    CreateUser {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: email.to_owned(),
        password: Zeroizing::new("secret".to_owned()),
        address: "London".to_owned(),
    }
}

#[rstest]
#[tokio::test]
async fn create_hashes_the_password_and_grants_admin(harness: Harness) {
    let user = harness
        .service
        .create(create_request(" ada@example.com "))
        .await
        .expect("create");

    assert_eq!(user.email(), "ada@example.com");
    assert_eq!(user.user_role().as_str(), Role::ADMIN);
    assert_eq!(user.created_at(), fixed_now());
    assert_ne!(user.password_hash().as_str(), "secret");
    assert!(verify_password(user.password_hash(), "secret").expect("verify"));

    let stored = harness.repo.find_by_id(user.user_id()).await.expect("lookup");
    assert_eq!(stored, Some(user));
}

#[rstest]
#[case(CreateUser { first_name: String::new(), ..create_request("a@b.com") }, "FirstName is required")]
#[case(create_request(""), "Email is required")]
#[case(create_request("nope"), "Email is not valid email")]
#[case(CreateUser { password: Zeroizing::new(String::new()), ..create_request("a@b.com") }, "Password is required")]
#[tokio::test]
async fn create_reports_the_first_violation(
    harness: Harness,
    #[case] request: CreateUser,
    #[case] message: &str,
) {
    let err = harness.service.create(request).await.expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), message);
    assert_eq!(harness.repo.count().await.expect("count"), 0);
}

#[rstest]
#[tokio::test]
async fn create_rejects_a_taken_email(harness: Harness) {
    harness
        .service
        .create(create_request("ada@example.com"))
        .await
        .expect("first");

    let err = harness
        .service
        .create(create_request("ada@example.com"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Email is already taken");
}

#[rstest]
#[tokio::test]
async fn create_maps_a_racing_duplicate_to_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_email_exists().return_once(|_| Ok(false));
    repo.expect_insert()
        .return_once(|user| Err(UserPersistenceError::duplicate_email(user.email())));

    let err = with_mock(repo)
        .create(create_request("ada@example.com"))
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_surfaces_an_unreachable_store() {
    let mut repo = MockUserRepository::new();
    repo.expect_email_exists()
        .return_once(|_| Err(UserPersistenceError::connection("refused")));
    repo.expect_insert().never();

    let err = with_mock(repo)
        .create(create_request("ada@example.com"))
        .await
        .expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn update_changes_only_supplied_fields(harness: Harness) {
    let original = stored_user("ada@example.com", "secret");
    harness.repo.insert(&original).await.expect("seed");
    harness.clock.advance_seconds(60);

    let updated = harness
        .service
        .update(
            original.user_id(),
            UpdateUser {
                email: Some("countess@example.com".to_owned()),
                ..UpdateUser::default()
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.email(), "countess@example.com");
    assert_eq!(updated.first_name(), original.first_name());
    assert_eq!(updated.password_hash(), original.password_hash());
    assert_eq!(updated.created_at(), original.created_at());
    assert_eq!(updated.updated_at(), fixed_now() + chrono::TimeDelta::seconds(60));
}

#[rstest]
#[tokio::test]
async fn update_validates_the_new_email(harness: Harness) {
    let original = stored_user("ada@example.com", "secret");
    harness.repo.insert(&original).await.expect("seed");

    let err = harness
        .service
        .update(
            original.user_id(),
            UpdateUser {
                email: Some("not-an-email".to_owned()),
                ..UpdateUser::default()
            },
        )
        .await
        .expect_err("invalid");
    assert_eq!(err.message(), "Email is not valid email");
}

#[rstest]
#[tokio::test]
async fn update_to_another_accounts_email_conflicts(harness: Harness) {
    let ada = stored_user("ada@example.com", "secret");
    let grace = stored_user("grace@example.com", "secret");
    harness.repo.insert(&ada).await.expect("seed");
    harness.repo.insert(&grace).await.expect("seed");

    let err = harness
        .service
        .update(
            grace.user_id(),
            UpdateUser {
                email: Some("ada@example.com".to_owned()),
                ..UpdateUser::default()
            },
        )
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn missing_users_are_not_found(harness: Harness) {
    let id = UserId::random();
    let get = harness.service.get(&id).await.expect_err("get");
    let update = harness
        .service
        .update(&id, UpdateUser::default())
        .await
        .expect_err("update");
    let delete = harness.service.delete(&id).await.expect_err("delete");

    for err in [get, update, delete] {
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "user not found");
    }
}

#[rstest]
#[tokio::test]
async fn delete_removes_the_account(harness: Harness) {
    let ada = stored_user("ada@example.com", "secret");
    harness.repo.insert(&ada).await.expect("seed");

    let removed = harness.service.delete(ada.user_id()).await.expect("delete");
    assert_eq!(removed, ada);
    assert!(harness.repo.find_by_id(ada.user_id()).await.expect("lookup").is_none());
}

#[rstest]
#[tokio::test]
async fn list_returns_the_requested_window(harness: Harness) {
    for email in ["a@x.io", "b@x.io", "c@x.io"] {
        harness
            .repo
            .insert(&stored_user(email, "pw"))
            .await
            .expect("seed");
    }

    let page = harness.service.list(1, 1).await.expect("list");
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].email(), "b@x.io");
    assert_eq!(harness.service.count().await.expect("count"), 3);
}

#[rstest]
#[tokio::test]
async fn query_failures_are_internal() {
    let mut repo = MockUserRepository::new();
    repo.expect_list()
        .return_once(|_, _| Err(UserPersistenceError::query("syntax error")));

    let err = with_mock(repo).list(0, 10).await.expect_err("failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
