//! Standardized error types shared across orvio services.

use crate::ids::TenantId;
use serde::Serialize;
use thiserror::Error;

/// Standardized error type for orvio.
///
/// These are the request-level failures every service surface shares.
/// Each variant maps cleanly to an HTTP status code:
///
/// - `Unauthorized` - the principal has no resolvable tenant (HTTP 401)
/// - `NotFound` - referenced resource missing or inactive (HTTP 404)
/// - `TenantMismatch` - tenant isolation violation (HTTP 403)
/// - `Validation` - malformed input, rejected before any external call (HTTP 400)
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrvioError {
    /// Authentication or authorization failure.
    #[error("Unauthorized{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Requested resource was not found (or is inactive).
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found (e.g., "Store", "Product").
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Tenant isolation violation.
    ///
    /// Raised when an operation touches a resource owned by a different
    /// tenant than the requesting one.
    #[error("Tenant mismatch: expected {expected}, got {actual}")]
    TenantMismatch {
        expected: TenantId,
        actual: TenantId,
    },

    /// Input validation failure.
    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },
}

impl OrvioError {
    /// Unauthorized with a context message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        OrvioError::Unauthorized {
            message: Some(message.into()),
        }
    }

    /// Not-found for a resource with a known id.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        OrvioError::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
        }
    }

    /// Validation failure on a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        OrvioError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Type alias for Results using [`OrvioError`].
pub type Result<T> = std::result::Result<T, OrvioError>;
