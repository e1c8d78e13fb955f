//! Compilation engine abstraction.
//!
//! The service never compiles TypeScript itself. Everything goes through the
//! [`CompileEngine`] trait: [`EsbuildEngine`] is the production implementor
//! (an esbuild child process), and tests substitute mock engines.
//!
//! [`CompilerService`] wraps an engine and guarantees its one-time
//! initialization runs exactly once, even under concurrent first requests.

use async_trait::async_trait;

use crate::error::EngineError;

mod esbuild;
mod service;

pub use esbuild::{EsbuildEngine, EsbuildOptions};
pub use service::CompilerService;

/// A bundling/compilation engine.
///
/// Implementors transform TypeScript source into bundled, minified
/// JavaScript. `prepare` is called exactly once before the first `bundle`
/// and performs whatever setup the engine needs to become runnable.
#[async_trait]
pub trait CompileEngine: Send + Sync {
    /// One-time engine setup (resolve the binary, probe the runtime, ...).
    ///
    /// Must be idempotent; the caller guarantees at most one invocation.
    async fn prepare(&self) -> Result<(), EngineError>;

    /// Bundle and minify the given TypeScript source.
    ///
    /// Returns the emitted JavaScript text, or an error if the engine
    /// rejected the source or failed operationally.
    async fn bundle(&self, source: &str) -> Result<String, EngineError>;
}
