//! Configuration management for the bundler service.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TSB_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use ts_bundler::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}:{}", config.host, config.port);
//! ```
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the `TSB_` prefix:
//!
//! - `TSB_HOST` - Server bind address (default: 0.0.0.0)
//! - `TSB_PORT` - Server port (default: 3000)
//! - `TSB_AUTH_ENABLED` - Require bearer tokens on compile routes (default: false)
//! - `TSB_JWT_ISSUER` - Expected `iss` claim of incoming tokens
//! - `TSB_JWT_PUBLIC_KEY` - RS256 public key, PEM text
//! - `TSB_JWT_PUBLIC_KEY_FILE` - Path to an RS256 public key PEM file
//! - `TSB_ESBUILD_PATH` - esbuild binary to invoke (default: esbuild)
//! - `TSB_FORMAT` - Output module format: esm, cjs or iife (default: esm)
//! - `TSB_TARGET` - Output language target (default: es2022)
//! - `TSB_ROUTE_PREFIX` - Serve the whole API under this path prefix
//! - `TSB_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default esbuild binary name (resolved via PATH).
pub const DEFAULT_ESBUILD_PATH: &str = "esbuild";

/// Default output module format.
pub const DEFAULT_FORMAT: &str = "esm";

/// Default output language target.
pub const DEFAULT_TARGET: &str = "es2022";

/// Module formats esbuild accepts.
const VALID_FORMATS: &[&str] = &["esm", "cjs", "iife"];

// =============================================================================
// CLI Arguments
// =============================================================================

/// ts-bundler - An HTTP TypeScript compilation service.
///
/// Accepts TypeScript source as a JSON payload or an uploaded file and
/// returns bundled, minified JavaScript produced by esbuild.
#[derive(Parser, Debug, Clone)]
#[command(name = "ts-bundler")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TSB_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TSB_PORT")]
    pub port: u16,

    /// Serve all routes under this path prefix (e.g. "/bundler").
    #[arg(long, env = "TSB_ROUTE_PREFIX")]
    pub route_prefix: Option<String>,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Require a bearer token (JWT, RS256) on the compile routes.
    ///
    /// When disabled, all compile requests are allowed without authentication.
    #[arg(long, default_value_t = false, env = "TSB_AUTH_ENABLED")]
    pub auth_enabled: bool,

    /// Expected issuer (`iss` claim) of incoming tokens.
    #[arg(long, env = "TSB_JWT_ISSUER")]
    pub jwt_issuer: Option<String>,

    /// RS256 public key used to verify token signatures, as PEM text.
    #[arg(long, env = "TSB_JWT_PUBLIC_KEY")]
    pub jwt_public_key: Option<String>,

    /// Path to a PEM file containing the RS256 public key.
    ///
    /// Mutually exclusive with --jwt-public-key.
    #[arg(long, env = "TSB_JWT_PUBLIC_KEY_FILE")]
    pub jwt_public_key_file: Option<std::path::PathBuf>,

    // =========================================================================
    // Engine Configuration
    // =========================================================================
    /// esbuild binary to invoke.
    #[arg(long, default_value = DEFAULT_ESBUILD_PATH, env = "TSB_ESBUILD_PATH")]
    pub esbuild_path: String,

    /// Output module format (esm, cjs or iife).
    #[arg(long, default_value = DEFAULT_FORMAT, env = "TSB_FORMAT")]
    pub format: String,

    /// Output language target passed to esbuild.
    #[arg(long, default_value = DEFAULT_TARGET, env = "TSB_TARGET")]
    pub target: String,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "TSB_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        // Auth requires an issuer and exactly one key source
        if self.auth_enabled {
            if self.jwt_issuer.is_none() {
                return Err(
                    "Authentication is enabled but no issuer provided. \
                     Set --jwt-issuer or TSB_JWT_ISSUER, or disable auth with --auth-enabled=false"
                        .to_string(),
                );
            }
            if self.jwt_public_key.is_none() && self.jwt_public_key_file.is_none() {
                return Err(
                    "Authentication is enabled but no public key provided. \
                     Set --jwt-public-key, --jwt-public-key-file or the TSB_ equivalents"
                        .to_string(),
                );
            }
        }
        if self.jwt_public_key.is_some() && self.jwt_public_key_file.is_some() {
            return Err(
                "Both --jwt-public-key and --jwt-public-key-file are set; pick one".to_string(),
            );
        }

        // Validate engine options
        if !VALID_FORMATS.contains(&self.format.as_str()) {
            return Err(format!(
                "Invalid module format '{}' (expected one of: esm, cjs, iife)",
                self.format
            ));
        }
        if self.target.is_empty() {
            return Err("target must not be empty".to_string());
        }
        if self.esbuild_path.is_empty() {
            return Err("esbuild_path must not be empty".to_string());
        }

        // Route prefix must start with a slash when present
        if let Some(ref prefix) = self.route_prefix {
            if !prefix.starts_with('/') || prefix == "/" {
                return Err(format!(
                    "Invalid route prefix '{}' (must start with '/' and not be the bare root)",
                    prefix
                ));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the public key PEM, reading the key file if one was configured.
    pub fn resolve_public_key(&self) -> Result<Option<String>, String> {
        if let Some(ref pem) = self.jwt_public_key {
            return Ok(Some(pem.clone()));
        }
        if let Some(ref path) = self.jwt_public_key_file {
            let pem = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            return Ok(Some(pem));
        }
        Ok(None)
    }
}

// =============================================================================
// Tests
// =============================================================================
