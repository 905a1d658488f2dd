//! Success envelope shared by every JSON endpoint.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message used when a handler does not supply one.
pub const DEFAULT_MESSAGE: &str = "success";

/// `{status, message, data}` wrapper around a successful payload.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use keystone::inbound::http::envelope::Envelope;
///
/// let response = Envelope::new(vec![1, 2, 3])
///     .with_message("user created")
///     .respond(StatusCode::CREATED);
/// assert_eq!(response.status(), StatusCode::CREATED);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    #[schema(example = 200)]
    pub status: u16,
    #[schema(example = "success")]
    pub message: String,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: DEFAULT_MESSAGE.to_owned(),
            data,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Render with `status`, keeping the body's `status` field in step.
    pub fn respond(mut self, status: StatusCode) -> HttpResponse {
        self.status = status.as_u16();
        HttpResponse::build(status).json(self)
    }

    /// Render as `200 OK`.
    pub fn ok(self) -> HttpResponse {
        self.respond(StatusCode::OK)
    }
}
