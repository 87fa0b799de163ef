//! Application-wide error types and their HTTP rendering.
//!
//! Every error becomes a `{ "message": … }` JSON body with the status the
//! frontend contract expects: 400 for validation and investment-rule
//! failures, 401 unauthenticated, 403 plan restriction / admin-only, 404
//! missing resources, 502 for checkout-provider trouble, 500 otherwise.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use invest_core::{InvestmentError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Investment(#[from] InvestmentError),

    /// A search query used a filter the user's plan does not unlock.
    #[error("{0}")]
    PlanRestricted(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Checkout provider error: {0}")]
    Checkout(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Migrate(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Investment(InvestmentError::Unauthenticated) | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::Investment(_) => StatusCode::BAD_REQUEST,
            Self::PlanRestricted(_) | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Checkout(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal detail stays in the logs; clients get a generic message.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_contract() {
        assert_eq!(
            ApiError::Validation(ValidationError::new("amount", "bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Investment(InvestmentError::MissingPaymentMethod).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Investment(InvestmentError::Unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::PlanRestricted("ROI Range requires the Basic plan".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound("project").status(), StatusCode::NOT_FOUND);
    }
}
