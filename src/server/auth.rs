//! Bearer-token authentication for the compile routes.
//!
//! Requests must carry `Authorization: Bearer <token>`, where the token is a
//! JWT signed with RS256. Verification delegates to [`jsonwebtoken`] and
//! checks the signature against the configured public key plus the issuer
//! (`iss`) claim. Verified claims are attached to the request extensions for
//! downstream handlers.
//!
//! The gate is opt-in: when authentication is disabled in the router
//! configuration this middleware is simply not mounted.
//!
//! # Example
//!
//! ```rust
//! use ts_bundler::server::auth::BearerAuth;
//!
//! let auth = BearerAuth::new("https://issuer.example.com", "not a pem");
//!
//! // Malformed key material surfaces as a verification error
//! assert!(auth.verify("some.jwt.token").is_err());
//! ```

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{debug, warn};

use super::handlers::ErrorResponse;

// =============================================================================
// Types
// =============================================================================

/// Verified claims extracted from a bearer token.
///
/// Known registered claims are surfaced as fields; everything else lands in
/// the opaque `extra` map.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: Option<String>,

    /// Token subject
    pub sub: Option<String>,

    /// Expiry timestamp (Unix epoch seconds)
    pub exp: Option<u64>,

    /// Any remaining claims, untyped
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Authentication error types.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header on the request
    MissingBearer,

    /// Token verification failed; carries the verifier's message when it
    /// produced one
    InvalidToken(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingBearer => write!(f, "Unauthorized - Bearer token required"),
            AuthError::InvalidToken(message) if message.is_empty() => {
                write!(f, "Unauthorized - Invalid token")
            }
            AuthError::InvalidToken(message) => write!(f, "{}", message),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        // Missing headers are routine (unauthenticated clients probing the
        // API); rejected tokens are worth a warning.
        match &self {
            AuthError::MissingBearer => {
                debug!("Authentication failed: {}", message);
            }
            AuthError::InvalidToken(_) => {
                warn!("Authentication failed: {}", message);
            }
        }

        (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// Bearer Token Verification
// =============================================================================

/// Bearer-token verifier bound to an issuer and an RS256 public key.
///
/// The PEM is re-parsed on every call: verification results are produced
/// fresh per request and nothing is cached, so a malformed key shows up as
/// an ordinary 401 rather than a startup failure.
#[derive(Clone)]
pub struct BearerAuth {
    /// Expected `iss` claim
    issuer: String,

    /// RS256 public key, PEM text
    public_key_pem: String,
}

impl BearerAuth {
    /// Create a verifier for the given issuer and public key PEM.
    pub fn new(issuer: impl Into<String>, public_key_pem: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            public_key_pem: public_key_pem.into(),
        }
    }

    /// Verify a token: RS256 signature under the configured key and issuer
    /// match. Expiry is enforced when the token carries an `exp` claim;
    /// tokens without one are accepted. Returns the decoded claims on
    /// success.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken("Invalid token format".to_string()));
        }

        let key = DecodingKey::from_rsa_pem(self.public_key_pem.as_bytes())
            .map_err(|e| AuthError::InvalidToken(format!("Invalid public key: {}", e)))?;

        let mut validation = Validation::new(Algorithm::RS256);
        // The issuer claim is mandatory; `exp` is not, but is still checked
        // whenever the token carries one
        validation.set_required_spec_claims(&["iss"]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware enforcing bearer-token authentication.
///
/// Extracts and verifies the `Authorization` header, inserts the verified
/// [`Claims`] into the request extensions and forwards the request. Rejects
/// with 401 otherwise.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware};
/// use ts_bundler::server::auth::{BearerAuth, auth_middleware};
///
/// let auth = BearerAuth::new("https://issuer.example.com", public_key_pem);
/// let app = Router::new()
///     .route("/compile", post(compile_handler))
///     .layer(middleware::from_fn_with_state(auth, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(auth): State<BearerAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingBearer)?;

    let claims = auth.verify(token)?;
    debug!(issuer = ?claims.iss, subject = ?claims.sub, "bearer token accepted");

    // Make the verified claims available to downstream handlers
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
