//! Router configuration for the bundler service.
//!
//! This module defines the HTTP routes and applies middleware for
//! authentication and CORS.
//!
//! # Route Structure
//!
//! ```text
//! POST /compile        - Compile JSON-encoded source (protected when auth is on)
//! POST /compile-file   - Compile an uploaded file (protected when auth is on)
//! GET  /health         - Health check (public)
//! GET  /openapi.json   - API description (public)
//! *                    - JSON 404
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ts_bundler::engine::{CompilerService, EsbuildEngine};
//! use ts_bundler::server::routes::{create_router, RouterConfig};
//!
//! let compiler = CompilerService::new(EsbuildEngine::with_defaults());
//! let config = RouterConfig::without_auth();
//! let router = create_router(compiler, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::engine::{CompileEngine, CompilerService};

use super::auth::{auth_middleware, BearerAuth};
use super::handlers::{
    compile_file_handler, compile_handler, health_handler, invalid_endpoint_handler, AppState,
};
use super::openapi::openapi_handler;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Expected issuer of bearer tokens
    pub jwt_issuer: String,

    /// RS256 public key PEM for verifying bearer tokens
    pub jwt_public_key: String,

    /// Whether the compile routes require authentication
    pub auth_enabled: bool,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Optional path prefix the whole API is served under
    pub route_prefix: Option<String>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a configuration with bearer-token authentication enabled.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Routes are served at the root
    /// - Tracing is enabled
    pub fn new(jwt_issuer: impl Into<String>, jwt_public_key: impl Into<String>) -> Self {
        Self {
            jwt_issuer: jwt_issuer.into(),
            jwt_public_key: jwt_public_key.into(),
            auth_enabled: true,
            cors_origins: None, // Allow any origin by default
            route_prefix: None,
            enable_tracing: true,
        }
    }

    /// Create a configuration with authentication disabled (the default
    /// deployment mode).
    pub fn without_auth() -> Self {
        Self {
            jwt_issuer: String::new(),
            jwt_public_key: String::new(),
            auth_enabled: false,
            cors_origins: None,
            route_prefix: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Serve the whole API under the given path prefix.
    pub fn with_route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = Some(prefix.into());
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Compile routes (JSON and file upload), auth-gated when enabled
/// - Public routes (health check, API description)
/// - A JSON 404 fallback for everything else
/// - CORS on every response, including preflight requests
/// - Request tracing (optional)
pub fn create_router<E>(compiler: CompilerService<E>, config: RouterConfig) -> Router
where
    E: CompileEngine + 'static,
{
    let app_state = AppState::new(compiler);

    // Compile routes, gated by the bearer-token middleware when enabled
    let compile_routes = Router::new()
        .route("/compile", post(compile_handler::<E>))
        .route("/compile-file", post(compile_file_handler::<E>))
        .with_state(app_state);

    let compile_routes = if config.auth_enabled {
        let auth = BearerAuth::new(&config.jwt_issuer, &config.jwt_public_key);
        compile_routes.layer(middleware::from_fn_with_state(auth, auth_middleware))
    } else {
        compile_routes
    };

    // Public routes (no auth required). Method mismatches on known paths
    // get the same JSON 404 as unknown paths.
    let routes = Router::new()
        .merge(compile_routes)
        .route("/health", get(health_handler))
        .route("/openapi.json", get(openapi_handler))
        .method_not_allowed_fallback(invalid_endpoint_handler);

    // Mount everything under the prefix when one is configured
    let routes = match config.route_prefix {
        Some(ref prefix) => Router::new().nest(prefix, routes),
        None => routes,
    };

    let router = routes
        .fallback(invalid_endpoint_handler)
        .layer(build_cors_layer(&config));

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
