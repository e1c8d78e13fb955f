//! HTTP request handlers for the compile API.
//!
//! This module contains the Axum handlers for the two compilation paths and
//! the public endpoints.
//!
//! # Endpoints
//!
//! - `POST /compile` - Compile JSON-encoded TypeScript source
//! - `POST /compile-file` - Compile an uploaded TypeScript file
//! - `GET /health` - Health check endpoint
//! - anything else - JSON 404

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::engine::{CompileEngine, CompilerService};
use crate::error::EngineError;

use super::validate::validate_compile_request;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state holding the compiler service.
///
/// This is passed to the compile handlers via Axum's State extractor. The
/// compiler is the only state shared across requests.
pub struct AppState<E: CompileEngine> {
    /// The lazily-initialized compiler adapter
    pub compiler: Arc<CompilerService<E>>,
}

impl<E: CompileEngine> AppState<E> {
    /// Create a new application state around the given compiler service.
    pub fn new(compiler: CompilerService<E>) -> Self {
        Self {
            compiler: Arc::new(compiler),
        }
    }
}

impl<E: CompileEngine> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            compiler: Arc::clone(&self.compiler),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// JSON success response for the `/compile` endpoint.
#[derive(Debug, Serialize)]
pub struct CompileSuccessResponse {
    /// Always `true`
    pub success: bool,

    /// The bundled, minified JavaScript
    #[serde(rename = "compiledCode")]
    pub compiled_code: String,
}

impl CompileSuccessResponse {
    /// Create a success response carrying the compiled output.
    pub fn new(compiled_code: impl Into<String>) -> Self {
        Self {
            success: true,
            compiled_code: compiled_code.into(),
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Errors a compile handler can produce, mapped onto HTTP responses.
///
/// Validation problems are the client's fault (400); everything else is a
/// server-side failure (500). No variant is retried and none escapes the
/// handler boundary.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Request payload violated the schema; carries every violation
    Validation(Vec<String>),

    /// Multipart request had no `file` field
    MissingFile,

    /// Uploaded file was empty after trimming
    EmptyFile,

    /// The engine rejected the source
    Compilation(String),

    /// Anything else: body parse failure, engine I/O failure, ...
    Unexpected(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(violations) => {
                write!(f, "Invalid request: {}", violations.join(", "))
            }
            ApiError::MissingFile => write!(f, "File is required"),
            ApiError::EmptyFile => write!(f, "File content cannot be empty"),
            ApiError::Compilation(message) => write!(f, "Compilation failed: {}", message),
            ApiError::Unexpected(message) => write!(f, "Server error: {}", message),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Compile(message) => ApiError::Compilation(message),
            other => ApiError::Unexpected(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::MissingFile | ApiError::EmptyFile => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Compilation(_) | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = self.to_string();

        // Log based on severity
        if status.is_server_error() {
            error!(status = status.as_u16(), "Server error: {}", message);
        } else {
            warn!(status = status.as_u16(), "Client error: {}", message);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle JSON compilation requests.
///
/// # Endpoint
///
/// `POST /compile`
///
/// # Body
///
/// ```json
/// { "code": "const x: number = 1;" }
/// ```
///
/// # Response
///
/// - `200 OK`: `{"success": true, "compiledCode": "..."}`
/// - `400 Bad Request`: schema violation
/// - `500 Internal Server Error`: compile or server failure
pub async fn compile_handler<E: CompileEngine>(
    State(state): State<AppState<E>>,
    body: Bytes,
) -> Result<Json<CompileSuccessResponse>, ApiError> {
    info!("TypeScript compilation request started");

    debug!("Parsing request body");
    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::Unexpected(e.to_string()))?;

    let request = validate_compile_request(&value).map_err(ApiError::Validation)?;

    info!(code_len = request.code.len(), "Starting TypeScript compilation");
    let compiled = state.compiler.compile(&request.code).await?;

    info!(
        original_len = request.code.len(),
        compiled_len = compiled.len(),
        "Compilation successful"
    );

    Ok(Json(CompileSuccessResponse::new(compiled)))
}

/// Handle file-upload compilation requests.
///
/// # Endpoint
///
/// `POST /compile-file`
///
/// # Body
///
/// Multipart form with a `file` field carrying the TypeScript source.
///
/// # Response
///
/// - `200 OK`: raw JavaScript body with `Content-Type: application/javascript`
///   and a `Content-Disposition` attachment header; the output filename is
///   the upload's with its `.ts`/`.tsx` extension replaced by `.js`
/// - `400 Bad Request`: missing (or non-file) `file` field, or empty content
/// - `500 Internal Server Error`: compile or server failure
pub async fn compile_file_handler<E: CompileEngine>(
    State(state): State<AppState<E>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    info!("File upload compilation request started");

    let mut upload: Option<(String, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Unexpected(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        // A bare text field named "file" is not a file upload; only parts
        // carrying a filename count. An empty filename gets a stand-in.
        let filename = match field.file_name() {
            Some(name) if name.is_empty() => "unknown.ts".to_string(),
            Some(name) => name.to_string(),
            None => continue,
        };
        let text = field
            .text()
            .await
            .map_err(|e| ApiError::Unexpected(e.to_string()))?;
        upload = Some((filename, text));
        break;
    }

    let (filename, code) = upload.ok_or(ApiError::MissingFile)?;
    if code.trim().is_empty() {
        return Err(ApiError::EmptyFile);
    }

    info!(
        code_len = code.len(),
        filename = %filename,
        "Starting TypeScript compilation"
    );
    let compiled = state.compiler.compile(&code).await?;

    info!(
        original_len = code.len(),
        compiled_len = compiled.len(),
        "Compilation successful"
    );

    let output_name = output_filename(&filename);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/javascript")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", output_name),
        )
        .body(axum::body::Body::from(compiled))
        .map_err(|e| ApiError::Unexpected(e.to_string()))?;

    Ok(response)
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with the plain-text body `OK`.
pub async fn health_handler() -> &'static str {
    "OK"
}

/// Fallback for unmatched routes.
///
/// Returns `404` with `{"success": false, "error": "Invalid endpoint"}`.
pub async fn invalid_endpoint_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Invalid endpoint")),
    )
        .into_response()
}

/// Derive the download filename: `.ts` and `.tsx` become `.js`, anything
/// else passes through unchanged.
fn output_filename(name: &str) -> String {
    if let Some(stem) = name.strip_suffix(".ts") {
        format!("{}.js", stem)
    } else if let Some(stem) = name.strip_suffix(".tsx") {
        format!("{}.js", stem)
    } else {
        name.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
