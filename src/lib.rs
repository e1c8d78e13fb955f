//! # ts-bundler
//!
//! An HTTP compilation service for TypeScript.
//!
//! This library provides the core functionality for accepting TypeScript
//! source over HTTP - as a JSON payload or an uploaded file - and returning
//! bundled, minified JavaScript. Compilation is delegated to an external
//! engine (esbuild, invoked as a child process); the compile routes can be
//! gated by bearer-token (JWT, RS256) authentication.
//!
//! ## Features
//!
//! - **Two compile paths**: `POST /compile` (JSON) and `POST /compile-file`
//!   (multipart upload with a file-download response)
//! - **Pluggable engine**: compilation goes through the
//!   [`engine::CompileEngine`] trait; the esbuild CLI is the production
//!   implementor
//! - **Race-free lazy init**: the engine is prepared exactly once, on the
//!   first request, even under concurrent first calls
//! - **Authentication**: optional JWT bearer verification (RS256, issuer
//!   check) on the compile routes
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`engine`] - Compilation engine trait, esbuild implementor and the
//!   lazily-initialized compiler service
//! - [`server`] - Axum-based HTTP server, routes, handlers, validation and
//!   auth middleware
//! - [`config`] - CLI and configuration types
//! - [`error`] - Engine error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use ts_bundler::engine::{CompilerService, EsbuildEngine};
//! use ts_bundler::server::{create_router, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let compiler = CompilerService::new(EsbuildEngine::with_defaults());
//!     let router = create_router(compiler, RouterConfig::without_auth());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
//!         .await
//!         .unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use engine::{CompileEngine, CompilerService, EsbuildEngine, EsbuildOptions};
pub use error::EngineError;
pub use server::{
    auth_middleware, create_router, validate_compile_request, ApiError, AppState, AuthError,
    BearerAuth, Claims, CompileRequest, CompileSuccessResponse, ErrorResponse, RouterConfig,
};
