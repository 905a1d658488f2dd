//! Bearer-token gates for protected routes.
//!
//! [`RequireLogin`] verifies the `Authorization: Bearer <jwt>` header and
//! stores the decoded [`Claims`] in request extensions, where handlers read
//! them through `web::ReqData<Claims>`. [`RequireRole`] checks those claims
//! and must therefore be registered inside `RequireLogin`:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use actix_web::{App, HttpResponse, web};
//! use keystone::domain::auth::{SigningKey, TokenVerifier};
//! use keystone::inbound::http::auth::{RequireLogin, RequireRole};
//! use mockable::DefaultClock;
//!
//! let key = SigningKey::new("dev-only-key").expect("key");
//! let verifier = TokenVerifier::new(&key, Arc::new(DefaultClock));
//! // `wrap` order: the last wrapper runs first.
//! let app = App::new().service(
//!     web::scope("/users")
//!         .wrap(RequireRole::new("admin"))
//!         .wrap(RequireLogin::new(verifier))
//!         .route("", web::get().to(HttpResponse::Ok)),
//! );
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpMessage, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::info;

use crate::domain::Error;
use crate::domain::auth::{Claims, TokenVerifier};

/// Message for an absent or non-Bearer `Authorization` header.
pub const MISSING_TOKEN: &str = "missing or malformed jwt";
/// Message for a token that fails signature, format or expiry checks.
pub const INVALID_TOKEN: &str = "invalid or expired jwt";

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    MissingToken,
    InvalidToken,
    RoleMismatch,
}

impl Rejection {
    // Built inside the response future so the trace id in scope is captured.
    fn into_error(self) -> Error {
        match self {
            Self::MissingToken => Error::invalid_request(MISSING_TOKEN),
            Self::InvalidToken => Error::unauthorized(INVALID_TOKEN),
            Self::RoleMismatch => Error::unauthorized(""),
        }
    }
}

fn reject<B: 'static>(
    req: ServiceRequest,
    rejection: Rejection,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, actix_web::Error>> {
    Box::pin(async move {
        let response = rejection.into_error().error_response();
        Ok(req.into_response(response).map_into_right_body())
    })
}

fn bearer_claims(req: &ServiceRequest, verifier: &TokenVerifier) -> Result<Claims, Rejection> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(Rejection::MissingToken)?;
    verifier.verify(token).map_err(|err| {
        info!(path = req.path(), error = %err, "bearer token rejected");
        Rejection::InvalidToken
    })
}

/// Middleware factory requiring a valid bearer token.
#[derive(Clone)]
pub struct RequireLogin {
    verifier: Arc<TokenVerifier>,
}

impl RequireLogin {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireLogin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireLoginMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireLoginMiddleware {
            service,
            verifier: self.verifier.clone(),
        }))
    }
}

/// Service produced by [`RequireLogin`].
pub struct RequireLoginMiddleware<S> {
    service: S,
    verifier: Arc<TokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for RequireLoginMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match bearer_claims(&req, &self.verifier) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(rejection) => reject(req, rejection),
        }
    }
}

/// Middleware factory requiring the verified claims to carry one role.
///
/// Rejections are `401` with an empty message; the wrapped handler never runs.
#[derive(Debug, Clone)]
pub struct RequireRole {
    role: Arc<str>,
}

impl RequireRole {
    pub fn new(role: &str) -> Self {
        Self { role: role.into() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service,
            role: self.role.clone(),
        }))
    }
}

/// Service produced by [`RequireRole`].
pub struct RequireRoleMiddleware<S> {
    service: S,
    role: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let granted = match req.extensions().get::<Claims>() {
            Some(claims) if claims.role == *self.role => true,
            Some(claims) => {
                info!(
                    user = claims.username.as_str(),
                    role = claims.role.as_str(),
                    required = &*self.role,
                    "role check failed"
                );
                false
            }
            None => false,
        };
        if !granted {
            return reject(req, Rejection::RoleMismatch);
        }
        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
