//! End-to-end flow over the real services and the in-memory store.
//!
//! An admin logs in, manages accounts through `/users`, and the newly
//! created account can log in with its own password.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use keystone::domain::TRACE_ID_HEADER;
use keystone::domain::UserService;
use keystone::domain::auth::{
    AuthenticationService, PasswordHasher, SigningKey, TokenIssuer, TokenVerifier,
};
use keystone::domain::ports::{CreateUser, UserDirectory, UserRepository};
use keystone::inbound::http::build_app;
use keystone::inbound::http::state::HttpState;
use keystone::outbound::memory::InMemoryUserRepository;

const ADMIN_EMAIL: &str = "root@example.com";
const ADMIN_PASSWORD: &str = "correct horse";

async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let key = SigningKey::new("integration-signing-key").expect("key");
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let issuer = TokenIssuer::new(&key, 1, clock.clone()).expect("issuer");
    let verifier = TokenVerifier::new(&key, clock.clone());
    let directory = Arc::new(UserService::new(users.clone(), PasswordHasher::new(4), clock));
    directory
        .create(CreateUser {
            first_name: "Root".to_owned(),
            email: ADMIN_EMAIL.to_owned(),
            password: Zeroizing::new(ADMIN_PASSWORD.to_owned()),
            ..CreateUser::default()
        })
        .await
        .expect("seed admin");
    let login_service = Arc::new(AuthenticationService::new(users, issuer));
    test::init_service(build_app(HttpState::new(login_service, directory), verifier)).await
}

async fn send<S>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

async fn login<S>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await
}

async fn admin_bearer<S>(app: &S) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "access granted");
    let token = body["data"]["token"].as_str().expect("token");
    format!("Bearer {token}")
}

#[rstest]
#[actix_web::test]
async fn admin_manages_accounts_end_to_end() {
    let app = app().await;
    let bearer = admin_bearer(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/users")
            .insert_header((AUTHORIZATION, bearer.clone()))
            .set_json(json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "password": "engine",
                "address": "London"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "user created");
    assert!(body["data"].get("password_hash").is_none());
    let id = body["data"]["id"].as_str().expect("id").to_owned();

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/users?per_page=1&page=2")
            .insert_header((AUTHORIZATION, bearer.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 2);
    assert_eq!(body["data"]["pageCount"], 2);
    assert_eq!(body["data"]["items"][0]["email"], "ada@example.com");

    let (status, body) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/users/{id}"))
            .insert_header((AUTHORIZATION, bearer.clone()))
            .set_json(json!({ "address": "Marylebone" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["address"], "Marylebone");
    assert_eq!(body["data"]["first_name"], "Ada");

    let (status, body) = login(&app, "ada@example.com", "engine").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());

    let (status, _) = send(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/users/{id}"))
            .insert_header((AUTHORIZATION, bearer.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .insert_header((AUTHORIZATION, bearer)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[case(ADMIN_EMAIL, "wrong")]
#[case("nobody@example.com", ADMIN_PASSWORD)]
#[actix_web::test]
async fn bad_credentials_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
    let app = app().await;
    let (status, body) = login(&app, email, password).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
    assert!(body.get("data").is_none());
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_rejected() {
    let app = app().await;
    let bearer = admin_bearer(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/users")
            .insert_header((AUTHORIZATION, bearer))
            .set_json(json!({
                "first_name": "Again",
                "email": ADMIN_EMAIL,
                "password": "pw"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is already taken");
}

#[rstest]
#[actix_web::test]
async fn user_routes_require_a_token() {
    let app = app().await;
    let (status, body) = send(&app, test::TestRequest::get().uri("/users")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "missing or malformed jwt");
}
