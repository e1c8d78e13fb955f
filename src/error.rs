use thiserror::Error;

/// Errors produced by the compilation engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The engine binary could not be launched or failed its startup probe
    #[error("Compiler unavailable: {0}")]
    Unavailable(String),

    /// The engine rejected the source (syntax error, unresolved import, ...)
    #[error("{0}")]
    Compile(String),

    /// I/O failure while talking to the engine process
    #[error("I/O error: {0}")]
    Io(String),
}
