//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow                                           │
//! │                                                                         │
//! │  UI shell                       Session layer                           │
//! │  ────────                       ─────────────                           │
//! │                                                                         │
//! │  place_order()                                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function: Result<T, ApiError>                           │  │
//! │  │                                                                  │  │
//! │  │  CheckoutError::InvalidDetails ──► code=VALIDATION_ERROR         │  │
//! │  │                                    fields={"city": "..."}        │  │
//! │  │  DbError::NotFound ─────────────► code=NOT_FOUND                 │  │
//! │  │  DbError::QueryFailed ──────────► code=DATABASE_ERROR            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The UI shows `message`, attaches `fields` to form inputs, and         │
//! │  branches on `code` when it needs to (e.g. NOT_AUTHENTICATED →         │
//! │  route to login).                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use pharma_core::checkout::{CheckoutError, FieldErrors};
use pharma_core::error::{CoreError, ValidationError};
use pharma_db::DbError;

/// API error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Checkout details are incomplete",
///   "fields": { "city": "City is required" }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field validation messages (checkout details), when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Repository/persistence operation failed
    DatabaseError,

    /// Business logic error
    BusinessLogic,

    /// Internal error
    Internal,

    /// Cart operation failed
    CartError,

    /// Prescription proof missing for a regulated item
    PrescriptionRequired,

    /// Payment method missing or disabled
    PaymentError,

    /// Caller is not signed in or lacks the required role
    NotAuthenticated,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an authentication/authorization error.
    pub fn not_authenticated(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotAuthenticated, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts repository errors to API errors.
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
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored document is malformed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
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
            CoreError::OrderNotFound(id) => ApiError::not_found("Order", &id),
            CoreError::CartTooLarge { max } => ApiError::new(
                ErrorCode::CartError,
                format!("Cart cannot have more than {} items", max),
            ),
            CoreError::QuantityTooLarge { requested, max } => ApiError::new(
                ErrorCode::ValidationError,
                format!("Quantity {} exceeds maximum allowed ({})", requested, max),
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts checkout guard failures to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart => ApiError::validation("Cart is empty"),
            CheckoutError::NotAuthenticated => {
                ApiError::not_authenticated("Sign in to continue to checkout")
            }
            CheckoutError::PrescriptionRequired { ref items } => ApiError::new(
                ErrorCode::PrescriptionRequired,
                format!("Prescription required for: {}", items.join(", ")),
            ),
            CheckoutError::InvalidDetails { errors } => ApiError {
                code: ErrorCode::ValidationError,
                message: "Checkout details are incomplete".to_string(),
                fields: Some(errors),
            },
            CheckoutError::PaymentMethodUnavailable { id } => ApiError::new(
                ErrorCode::PaymentError,
                format!("Payment method is not available: {}", id),
            ),
            CheckoutError::NoPaymentMethod => {
                ApiError::new(ErrorCode::PaymentError, "No payment method available")
            }
            CheckoutError::PlacementInFlight => ApiError::new(
                ErrorCode::BusinessLogic,
                "An order is already being placed",
            ),
            CheckoutError::WrongStage { expected } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("Checkout is not at the {:?} stage", expected),
            ),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_details_carries_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("city".to_string(), "City is required".to_string());

        let api: ApiError = CheckoutError::InvalidDetails { errors }.into();
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.fields.unwrap()["city"], "City is required");
    }

    #[test]
    fn test_db_not_found_maps_to_not_found() {
        let api: ApiError = DbError::not_found("Order", "ORD-1").into();
        assert_eq!(api.code, ErrorCode::NotFound);
        assert_eq!(api.message, "Order not found: ORD-1");
    }

    #[test]
    fn test_serialized_shape() {
        let api = ApiError::validation("Cart is empty");
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "Cart is empty");
        assert!(json.get("fields").is_none());
    }
}
