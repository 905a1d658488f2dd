//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the request and response
//! schemas, and a bearer security scheme applied to all operations except
//! login, health probes and the version banner. The document is served by
//! Swagger UI in debug builds and printed by the `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ErrorCode, User};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::login::{LoginRequest, TokenResponse};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};

/// Name of the bearer scheme in `components.securitySchemes`.
pub const BEARER_SCHEME: &str = "BearerAuth";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("HS256 token issued by POST /login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Keystone API",
        description = "Email/password login issuing bearer tokens, and admin-only user management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::version,
        crate::inbound::http::login::login,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        ErrorCode,
        ErrorEnvelope,
        LoginRequest,
        TokenResponse,
        CreateUserRequest,
        UpdateUserRequest,
    )),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "Account management; admin role required"),
        (name = "health", description = "Endpoints for health checks"),
        (name = "meta", description = "Service metadata")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    fn user_schema_omits_the_password_hash() {
        let fields = object_fields("User");
        assert!(fields.iter().any(|f| f == "email"));
        assert!(fields.iter().any(|f| f == "role"));
        assert!(!fields.iter().any(|f| f == "password_hash"));
    }

    #[rstest]
    fn error_schema_uses_wire_names() {
        let fields = object_fields("ErrorEnvelope");
        for expected in ["status", "code", "message", "traceId", "details"] {
            assert!(fields.iter().any(|f| f == expected), "missing {expected}");
        }
    }

    #[rstest]
    #[case("/login", false)]
    #[case("/users", true)]
    #[case("/users/{id}", true)]
    fn bearer_scheme_covers_user_routes_only(#[case] path: &str, #[case] secured: bool) {
        let doc = ApiDoc::openapi();
        assert!(
            doc.components
                .as_ref()
                .expect("components")
                .security_schemes
                .contains_key(BEARER_SCHEME)
        );
        let item = doc.paths.paths.get(path).expect("path documented");
        let operation = item
            .get
            .as_ref()
            .or(item.post.as_ref())
            .expect("operation");
        let overridden_empty = operation
            .security
            .as_ref()
            .is_some_and(|reqs| reqs.iter().all(|req| {
                serde_json::to_value(req).map(|v| v == serde_json::json!({})).unwrap_or(false)
            }));
        assert_eq!(!overridden_empty, secured);
    }
}
