//! esbuild-backed compilation engine.
//!
//! Spawns the esbuild CLI as a child process per request, piping the source
//! over stdin and reading the bundled output from stdout. Bundling,
//! tree-shaking and minification are all esbuild's job; this module only
//! maps process outcomes onto [`EngineError`].

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{DEFAULT_ESBUILD_PATH, DEFAULT_FORMAT, DEFAULT_TARGET};
use crate::error::EngineError;

use super::CompileEngine;

// =============================================================================
// Options
// =============================================================================

/// Build options passed to esbuild.
#[derive(Debug, Clone)]
pub struct EsbuildOptions {
    /// Binary to invoke (name resolved via PATH, or an absolute path)
    pub binary: String,

    /// Output module format: "esm", "cjs" or "iife"
    pub format: String,

    /// Output language target, e.g. "es2022"
    pub target: String,
}

impl Default for EsbuildOptions {
    fn default() -> Self {
        Self {
            binary: DEFAULT_ESBUILD_PATH.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            target: DEFAULT_TARGET.to_string(),
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Compilation engine that shells out to the esbuild CLI.
pub struct EsbuildEngine {
    options: EsbuildOptions,
}

impl EsbuildEngine {
    /// Create an engine with the given options.
    pub fn new(options: EsbuildOptions) -> Self {
        Self { options }
    }

    /// Create an engine with default options (esbuild from PATH, esm/es2022).
    pub fn with_defaults() -> Self {
        Self::new(EsbuildOptions::default())
    }

    /// The options this engine was built with.
    pub fn options(&self) -> &EsbuildOptions {
        &self.options
    }
}

#[async_trait]
impl CompileEngine for EsbuildEngine {
    async fn prepare(&self) -> Result<(), EngineError> {
        // Probe the binary once so the first compile request fails fast and
        // with a clear message when esbuild is missing or broken.
        let output = Command::new(&self.options.binary)
            .arg("--version")
            .output()
            .await
            .map_err(|e| {
                EngineError::Unavailable(format!(
                    "failed to launch '{}': {}",
                    self.options.binary, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Unavailable(format!(
                "'{} --version' failed: {}",
                self.options.binary,
                stderr.trim()
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!(
            binary = %self.options.binary,
            version = %version,
            "esbuild engine initialized"
        );

        Ok(())
    }

    async fn bundle(&self, source: &str) -> Result<String, EngineError> {
        debug!(source_len = source.len(), "spawning esbuild");

        let mut child = Command::new(&self.options.binary)
            .arg("--bundle")
            .arg("--minify")
            .arg(format!("--format={}", self.options.format))
            .arg(format!("--target={}", self.options.target))
            .arg("--loader=ts")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                EngineError::Unavailable(format!(
                    "failed to launch '{}': {}",
                    self.options.binary, e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Io("failed to open compiler stdin".to_string()))?;
        stdin
            .write_all(source.as_bytes())
            .await
            .map_err(|e| EngineError::Io(e.to_string()))?;
        // Close stdin so esbuild sees EOF and starts the build
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| EngineError::Io(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(EngineError::Compile(if stderr.is_empty() {
                "Unknown compilation error".to_string()
            } else {
                stderr
            }));
        }

        // Empty stdout on a clean exit is a real artifact: valid source can
        // minify to nothing once fully tree-shaken.
        let compiled = String::from_utf8_lossy(&output.stdout).into_owned();

        debug!(compiled_len = compiled.len(), "esbuild finished");
        Ok(compiled)
    }
}

// =============================================================================
// Tests
// =============================================================================
