//! HTTP API module for the kill switch, health, metrics and docs endpoints.

pub mod docs;
pub mod handlers;
pub mod routes;

pub use docs::{mount_docs, openapi, ApiDoc};
pub use handlers::AppState;
pub use routes::create_router;
