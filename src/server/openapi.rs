//! Machine-readable API description.
//!
//! A hand-authored OpenAPI 3.1 document served at `/openapi.json`. The
//! document is static; it is not derived from the route definitions.

use serde_json::{json, Value};

/// Build the OpenAPI document for the service.
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "ts-bundler",
            "description": "Bundles and minifies TypeScript source into JavaScript.",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/compile": {
                "post": {
                    "summary": "Compile JSON-encoded TypeScript source",
                    "security": [{}, { "bearerAuth": [] }],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CompileRequest" }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Compilation succeeded",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CompileSuccessResponse" }
                                }
                            }
                        },
                        "400": { "$ref": "#/components/responses/Error" },
                        "401": { "$ref": "#/components/responses/Error" },
                        "500": { "$ref": "#/components/responses/Error" }
                    }
                }
            },
            "/compile-file": {
                "post": {
                    "summary": "Compile an uploaded TypeScript file",
                    "security": [{}, { "bearerAuth": [] }],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "multipart/form-data": {
                                "schema": {
                                    "type": "object",
                                    "required": ["file"],
                                    "properties": {
                                        "file": {
                                            "type": "string",
                                            "format": "binary",
                                            "description": "TypeScript file to compile (.ts/.tsx)"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Compiled JavaScript as a file download",
                            "content": {
                                "application/javascript": {
                                    "schema": { "type": "string" }
                                }
                            }
                        },
                        "400": { "$ref": "#/components/responses/Error" },
                        "401": { "$ref": "#/components/responses/Error" },
                        "500": { "$ref": "#/components/responses/Error" }
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Health check",
                    "responses": {
                        "200": {
                            "description": "Service is up",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "CompileRequest": {
                    "type": "object",
                    "required": ["code"],
                    "properties": {
                        "code": {
                            "type": "string",
                            "minLength": 1,
                            "description": "TypeScript source to bundle"
                        }
                    }
                },
                "CompileSuccessResponse": {
                    "type": "object",
                    "required": ["success", "compiledCode"],
                    "properties": {
                        "success": { "type": "boolean", "const": true },
                        "compiledCode": { "type": "string" }
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "required": ["success", "error"],
                    "properties": {
                        "success": { "type": "boolean", "const": false },
                        "error": { "type": "string" }
                    }
                }
            },
            "responses": {
                "Error": {
                    "description": "Error",
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                        }
                    }
                }
            },
            "securitySchemes": {
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "bearerFormat": "JWT"
                }
            }
        }
    })
}

/// Handler serving the OpenAPI document.
pub async fn openapi_handler() -> axum::Json<Value> {
    axum::Json(openapi_document())
}

// =============================================================================
// Tests
// =============================================================================
