//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in PixelVault                             │
//! │                                                                         │
//! │  Command Function: Result<T, ApiError>                                 │
//! │         │                                                               │
//! │         ├── DbError          (local store failed)      ──┐             │
//! │         ├── CoreError        (unknown product, ...)     ──┤             │
//! │         ├── PromoError       (code rejected)            ──┼─► ApiError  │
//! │         ├── ValidationError  (bad input)                ──┤             │
//! │         └── ConfigError      (bad env / flags)          ──┘             │
//! │                                                                         │
//! │  Serialized for the frontend / CLI:                                    │
//! │  { "code": "PROMO_REJECTED", "message": "Discount code X has expired" }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pixelvault_core::{CoreError, PromoError, ValidationError};
use pixelvault_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from commands.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: elden-ring"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Discount code exists but cannot be applied
    PromoRejected,

    /// Local store operation failed
    DatabaseError,

    /// Invalid configuration
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::Validation(e) => e.into(),
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", other);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::ProductUnavailable(id) => {
                ApiError::validation(format!("Product is not available for sale: {}", id))
            }
            CoreError::Promo(e) => e.into(),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<PromoError> for ApiError {
    fn from(err: PromoError) -> Self {
        match err {
            PromoError::NotFound(code) => ApiError::not_found("Discount code", &code),
            other => ApiError::new(ErrorCode::PromoRejected, other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Config Error
// =============================================================================

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Currency code outside the supported set.
    #[error("{var}: unsupported currency '{value}'")]
    UnsupportedCurrency { var: String, value: String },

    /// Boolean flag that isn't one of true/false/1/0/yes/no.
    #[error("{var}: expected a boolean, got '{value}'")]
    InvalidBool { var: String, value: String },

    /// No platform data directory could be determined.
    #[error("Could not determine app data directory")]
    NoDataDir,

    /// Creating the data directory failed.
    #[error("Could not create data directory: {0}")]
    DataDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelvault_core::Money;

    #[test]
    fn test_error_code_serialization() {
        let err = ApiError::not_found("Product", "x");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: x");

        let json = serde_json::to_value(ErrorCode::PromoRejected).unwrap();
        assert_eq!(json, "PROMO_REJECTED");
    }

    #[test]
    fn test_promo_errors() {
        let err: ApiError = PromoError::NotFound("NOPE".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: ApiError = PromoError::MinimumNotMet {
            code: "BIG20".to_string(),
            minimum: Money::new(50, 0),
        }
        .into();
        assert_eq!(err.code, ErrorCode::PromoRejected);
        assert_eq!(err.message, "Discount code BIG20 requires a minimum order of KD 50.000");
    }

    #[test]
    fn test_core_errors() {
        let err: ApiError = CoreError::ProductUnavailable("old".to_string()).into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: ApiError = CoreError::Promo(PromoError::Expired("X".to_string())).into();
        assert_eq!(err.code, ErrorCode::PromoRejected);
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err: ApiError = DbError::QueryFailed("syntax error near SELECT".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_rejected_write_is_validation_error() {
        let err: ApiError = DbError::Validation(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "price must not be negative");
    }
}
