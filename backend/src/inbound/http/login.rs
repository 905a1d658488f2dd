//! Login endpoint.
//!
//! ```text
//! POST /login {"email":"ada@example.com","password":"secret"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::LoginCredentials;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Success message for `POST /login`.
pub const ACCESS_GRANTED: &str = "access granted";

/// Login request body. Missing fields decode as empty strings so the
/// validator, not the JSON extractor, reports them.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "secret")]
    pub password: String,
}

/// Signed bearer token handed back on success.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Exchange an email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access granted", body = Envelope<TokenResponse>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security(())
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let credentials = LoginCredentials::new(&request.email, &request.password);
    let token = state.login.login(&credentials).await?;
    Ok(Envelope::new(TokenResponse { token })
        .with_message(ACCESS_GRANTED)
        .ok())
}
