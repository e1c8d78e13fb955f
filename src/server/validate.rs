//! Request payload validation.
//!
//! A pure function from an untyped JSON value to a typed request or a list
//! of violation messages. Every constraint is checked so the caller can
//! report all of them at once, joined by commas.

use serde_json::Value;

/// A validated JSON compile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// TypeScript source to bundle. Non-blank after trimming.
    pub code: String,
}

/// Validate the parsed JSON body of a `POST /compile` request.
///
/// Returns the typed request, or every violated constraint. No side
/// effects; failures are the caller's to surface as a 400 response.
pub fn validate_compile_request(value: &Value) -> Result<CompileRequest, Vec<String>> {
    let Some(object) = value.as_object() else {
        return Err(vec!["Request body must be a JSON object".to_string()]);
    };

    let mut violations = Vec::new();

    let code = match object.get("code") {
        None => {
            violations.push("Code field is required".to_string());
            None
        }
        Some(Value::String(code)) => {
            if code.trim().is_empty() {
                violations.push("Code field is required and cannot be empty".to_string());
                None
            } else {
                Some(code.clone())
            }
        }
        Some(_) => {
            violations.push("Code field must be a string".to_string());
            None
        }
    };

    match (code, violations.is_empty()) {
        (Some(code), true) => Ok(CompileRequest { code }),
        _ => Err(violations),
    }
}

// =============================================================================
// Tests
// =============================================================================
