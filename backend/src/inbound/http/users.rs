//! User management handlers.
//!
//! ```text
//! GET    /users?page=1&per_page=100
//! GET    /users/{id}
//! POST   /users        {"first_name":"Ada","email":"ada@example.com","password":"secret"}
//! PUT    /users/{id}   {"email":"countess@example.com"}
//! DELETE /users/{id}
//! ```
//!
//! Every route sits behind the bearer and `admin` role gates; handlers only
//! see requests that passed both.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::auth::Claims;
use crate::domain::ports::{CreateUser, UpdateUser};
use crate::domain::{Error, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::pagination::{PageQuery, Pages, Paginated};
use crate::inbound::http::state::HttpState;

/// Body for `POST /users`. Absent fields decode as empty strings.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CreateUserRequest {
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
    #[schema(example = "12 St James's Square, London")]
    pub address: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            password: Zeroizing::new(value.password),
            address: value.address,
        }
    }
}

/// Body for `PUT /users/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "countess@example.com")]
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            address: value.address,
        }
    }
}

fn parse_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User", body = Envelope<User>),
        (status = 400, description = "Invalid id or missing token", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let user = state.users.get(&id).await?;
    Ok(Envelope::new(user).ok())
}

/// List users a page at a time.
#[utoipa::path(
    get,
    path = "/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of users", body = Envelope<Paginated<User>>),
        (status = 400, description = "Missing token", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 503, description = "User store unavailable", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let total = state.users.count().await?;
    let pages = Pages::resolve(&query, total);
    let users = state.users.list(pages.offset(), pages.limit()).await?;
    Ok(Envelope::new(pages.wrap(users)).ok())
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = Envelope<User>),
        (status = 400, description = "Validation failure", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 409, description = "Email taken concurrently", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("")]
pub async fn create_user(
    state: web::Data<HttpState>,
    claims: web::ReqData<Claims>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.users.create(payload.into_inner().into()).await?;
    info!(actor = claims.username.as_str(), user_id = %user.user_id(), "user created");
    Ok(Envelope::new(user)
        .with_message("user created")
        .respond(StatusCode::CREATED))
}

/// Apply a partial update.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User UUID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = Envelope<User>),
        (status = 400, description = "Validation failure", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Not found", body = ErrorEnvelope),
        (status = 409, description = "Email already taken", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let user = state.users.update(&id, payload.into_inner().into()).await?;
    info!(actor = claims.username.as_str(), user_id = %id, "user updated");
    Ok(Envelope::new(user).ok())
}

/// Delete an account, returning what was removed.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User deleted", body = Envelope<User>),
        (status = 400, description = "Invalid id or missing token", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let user = state.users.delete(&id).await?;
    info!(actor = claims.username.as_str(), user_id = %id, "user deleted");
    Ok(Envelope::new(user).with_message("user deleted").ok())
}
