//! Test helpers for inbound HTTP components.
//!
//! [`init_app`] assembles the production route table around mocked ports,
//! with a token verifier pinned to [`crate::test_support::fixed_now`].

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use serde_json::Value;

use crate::domain::auth::{SigningKey, TokenIssuer, TokenVerifier};
use crate::domain::ports::{MockLoginService, MockUserDirectory};
use crate::inbound::http::state::HttpState;
use crate::test_support::{MutableClock, StaticIdentity};

const TEST_SIGNING_KEY: &str = "http-test-signing-key";

/// Subject id embedded in [`bearer`] tokens.
pub const TEST_SUBJECT: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn signing_key() -> SigningKey {
    SigningKey::new(TEST_SIGNING_KEY).expect("test key")
}

fn verifier() -> TokenVerifier {
    TokenVerifier::new(&signing_key(), Arc::new(MutableClock::default()))
}

/// `Authorization` header value for a token carrying `role`.
pub fn bearer(role: &str) -> String {
    let issuer = TokenIssuer::new(&signing_key(), 72, Arc::new(MutableClock::default()))
        .expect("test issuer");
    let token = issuer
        .issue(&StaticIdentity::new(TEST_SUBJECT, "ada@example.com", role))
        .expect("test token");
    format!("Bearer {token}")
}

/// Initialise the full route table over the given mocks.
pub async fn init_app(
    login: MockLoginService,
    users: MockUserDirectory,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let state = HttpState::new(Arc::new(login), Arc::new(users));
    test::init_service(super::build_app(state, verifier())).await
}

/// POST a JSON body without credentials.
pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

/// Send `req` with an admin bearer token attached.
pub async fn call_as_admin<S>(app: &S, req: test::TestRequest) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = req.insert_header((AUTHORIZATION, bearer("admin")));
    test::call_service(app, req.to_request()).await
}
