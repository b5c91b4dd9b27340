use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use vivu_order::CheckoutError;

#[derive(Debug)]
pub enum AppError {
    /// The customer's selection breaks a booking rule.
    Unprocessable { code: &'static str, message: String },
    BadRequest(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::Unprocessable { code, message } => (StatusCode::UNPROCESSABLE_ENTITY, code, message),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InvalidPassengers(violation) => AppError::Unprocessable {
                code: violation.code(),
                message: violation.to_string(),
            },
            CheckoutError::Category(e) => AppError::Unprocessable {
                code: "category_unavailable",
                message: e.to_string(),
            },
            CheckoutError::Fare(e) => AppError::BadRequest(e.to_string()),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}
