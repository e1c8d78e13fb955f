//! Axum-based HTTP server: routes, handlers, validation and authentication.

pub mod auth;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod validate;

pub use auth::{auth_middleware, AuthError, BearerAuth, Claims};
pub use handlers::{
    compile_file_handler, compile_handler, health_handler, invalid_endpoint_handler, ApiError,
    AppState, CompileSuccessResponse, ErrorResponse,
};
pub use openapi::{openapi_document, openapi_handler};
pub use routes::{create_router, RouterConfig};
pub use validate::{validate_compile_request, CompileRequest};
