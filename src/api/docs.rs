//! OpenAPI document and Swagger UI.

use axum::Router;
use utoipa::{
    openapi::{
        security::{ApiKey, ApiKeyValue, SecurityScheme},
        server::Server,
    },
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers;

/// Path of the generated OpenAPI JSON.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";
/// Path of the Swagger UI.
pub const SWAGGER_PATH: &str = "/docs";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kill Switch API",
        description = "Remotely toggle whether a client application renders"
    ),
    paths(
        handlers::health,
        handlers::check_app_status,
        handlers::toggle_app_status,
    ),
    components(schemas(
        handlers::HealthResponse,
        handlers::StatusResponse,
        handlers::ToggleResponse,
        handlers::ErrorResponse,
    )),
    modifiers(&ApiKeyAddon),
    tags(
        (name = "Kill Switch", description = "Read and toggle the render flag"),
        (name = "Observability", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct ApiKeyAddon;

impl Modify for ApiKeyAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("apiKey"))),
            );
        }
    }
}

/// Generated document advertising `base_url` as the server.
pub fn openapi(base_url: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(base_url)]);
    doc
}

/// Serve Swagger UI and the OpenAPI JSON alongside `router`.
pub fn mount_docs(router: Router, base_url: &str) -> Router {
    router.merge(SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_PATH, openapi(base_url)))
}
