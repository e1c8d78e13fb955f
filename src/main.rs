//! ts-bundler - An HTTP TypeScript compilation service.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ts_bundler::{
    config::Config,
    engine::{CompilerService, EsbuildEngine, EsbuildOptions},
    server::{create_router, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    // Resolve key material (may read a PEM file)
    let public_key = match config.resolve_public_key() {
        Ok(pem) => pem,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Configuration:");
    info!("  esbuild: {}", config.esbuild_path);
    info!("  format: {}, target: {}", config.format, config.target);
    if let Some(ref prefix) = config.route_prefix {
        info!("  route prefix: {}", prefix);
    }

    // Auth status with warning if disabled
    if config.auth_enabled {
        info!(
            "  Auth: enabled (issuer: {})",
            config.jwt_issuer.as_deref().unwrap_or("")
        );
    } else {
        warn!("  Auth: DISABLED - compile endpoints are publicly accessible");
        warn!("        Enable for production: --auth-enabled --jwt-issuer=... --jwt-public-key-file=...");
    }

    // Create the compiler service; the engine initializes lazily on the
    // first compile request
    let engine = EsbuildEngine::new(EsbuildOptions {
        binary: config.esbuild_path.clone(),
        format: config.format.clone(),
        target: config.target.clone(),
    });
    let compiler = CompilerService::new(engine);

    // Build router configuration
    let router_config = build_router_config(&config, public_key);

    // Create router
    let router = create_router(compiler, router_config);

    // Bind and serve
    let addr = config.bind_address();
    let prefix = config.route_prefix.as_deref().unwrap_or("");

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}{}/health", addr, prefix);
    info!(
        "    curl -X POST http://{}{}/compile -H 'Content-Type: application/json' \\",
        addr, prefix
    );
    info!("         -d '{{\"code\": \"const x: number = 1;\"}}'");
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "ts_bundler=debug,tower_http=debug"
    } else {
        "ts_bundler=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config, public_key: Option<String>) -> RouterConfig {
    let mut router_config = if config.auth_enabled {
        RouterConfig::new(
            config.jwt_issuer.clone().unwrap_or_default(),
            public_key.unwrap_or_default(),
        )
    } else {
        RouterConfig::without_auth()
    };

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    if let Some(ref prefix) = config.route_prefix {
        router_config = router_config.with_route_prefix(prefix.clone());
    }

    router_config = router_config.with_tracing(!config.no_tracing);

    router_config
}
