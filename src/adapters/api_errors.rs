use crate::domain::error::PaymentError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype so the domain error can be turned into an axum response.
pub struct ApiError(pub PaymentError);

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

/// Processor failures are logged in full but only reported to the caller as
/// a generic failure; raw processor bodies never leave this service.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self.0 {
            PaymentError::InvalidConfiguration(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_configuration",
                msg.clone(),
            ),
            PaymentError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
            ),
            PaymentError::Authentication(_)
            | PaymentError::ProviderRequest { .. }
            | PaymentError::Transport(_)
            | PaymentError::UnexpectedResponse(_) => {
                tracing::error!(error = %self.0, retryable = self.0.is_retryable(), "payment provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    "payment_failed",
                    "payment could not be completed".to_string(),
                )
            }
            PaymentError::Serialization(err) => {
                tracing::error!("serialization error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": message,
            "retryable": self.0.is_retryable(),
        });

        (status, Json(body)).into_response()
    }
}
