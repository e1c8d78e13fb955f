//! Lazily-initialized compiler service.
//!
//! The engine is prepared once, on the first compile request, and reused for
//! the lifetime of the process. Initialization is memoized through a
//! [`tokio::sync::OnceCell`], so concurrent first callers all await the same
//! in-flight setup instead of each starting their own: a plain boolean flag
//! would admit a double-init race.

use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::EngineError;

use super::CompileEngine;

/// Compiler adapter around a [`CompileEngine`].
///
/// Share it across requests behind an `Arc`; the wrapped engine is prepared
/// at most once no matter how many tasks call [`compile`](Self::compile)
/// concurrently. A failed preparation is not cached, so a later request
/// retries it.
pub struct CompilerService<E: CompileEngine> {
    engine: E,
    init: OnceCell<()>,
}

impl<E: CompileEngine> CompilerService<E> {
    /// Wrap an engine. No setup happens until the first compile.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            init: OnceCell::new(),
        }
    }

    /// Bundle and minify the given TypeScript source.
    ///
    /// Runs the engine's one-time `prepare` first if it has not completed
    /// yet, then delegates to `bundle`.
    pub async fn compile(&self, source: &str) -> Result<String, EngineError> {
        self.init
            .get_or_try_init(|| async {
                debug!("initializing compilation engine");
                self.engine.prepare().await
            })
            .await?;

        self.engine.bundle(source).await
    }
}

// =============================================================================
// Tests
// =============================================================================
