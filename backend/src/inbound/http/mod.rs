//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] registers the login and user routes with their gates and
//! extractor settings; [`build_app`] adds the application-wide middleware.

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, get, web};

use crate::domain::auth::TokenVerifier;
use crate::domain::{Error, Role};
use crate::middleware::Trace;

pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod login;
pub mod pagination;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
use state::HttpState;

/// Body of `GET /`.
pub fn version_banner() -> String {
    format!("API Version: {}", env!("CARGO_PKG_VERSION"))
}

/// Report the running version.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Version banner", body = String)),
    tags = ["meta"],
    security(())
)]
#[get("/")]
pub async fn version() -> HttpResponse {
    HttpResponse::Ok().body(version_banner())
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed request body: {err}")).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed query string: {err}")).into()
    })
}

/// Register the API routes and their shared state.
///
/// `/users` is wrapped by [`auth::RequireLogin`] and then
/// [`auth::RequireRole`] for `admin`, so a bad token is rejected before the
/// role is looked at.
pub fn configure(
    state: HttpState,
    verifier: TokenVerifier,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(query_config())
            .service(version)
            .service(login::login)
            .service(
                web::scope("/users")
                    .wrap(auth::RequireRole::new(Role::ADMIN))
                    .wrap(auth::RequireLogin::new(verifier))
                    .service(users::list_users)
                    .service(users::create_user)
                    .service(users::get_user)
                    .service(users::update_user)
                    .service(users::delete_user),
            );
    }
}

/// Application with the API routes behind the [`Trace`] middleware.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use keystone::domain::auth::{SigningKey, TokenVerifier};
/// use keystone::inbound::http::{build_app, state::HttpState};
/// use mockable::DefaultClock;
///
/// fn app(state: HttpState) {
///     let key = SigningKey::new("dev-only-key").expect("key");
///     let _app = build_app(state, TokenVerifier::new(&key, Arc::new(DefaultClock)));
/// }
/// ```
pub fn build_app(
    state: HttpState,
    verifier: TokenVerifier,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .configure(configure(state, verifier))
        .wrap(Trace)
}
