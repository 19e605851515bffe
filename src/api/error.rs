use std::fmt::Write;

use axum::{
    Json,
    body::Body,
    extract::{
        Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::application::AppError;

/// Uniform error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub description: String,
    pub error_code: u16,
}

/// An HTTP status with a client-facing message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
        }
    }

    pub fn method_not_allowed(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: msg.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An unexpected error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = ErrorDetails {
            timestamp: Utc::now(),
            message: self.message,
            description: String::new(),
            error_code: self.status.as_u16(),
        };

        // `describe_errors` fills in the request path from the extension.
        let mut response = (self.status, Json(details.clone())).into_response();
        response.extensions_mut().insert(details);
        response
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        if err.is_not_found() {
            return ApiError::not_found(err.to_string());
        }
        if err.is_validation() {
            return ApiError::bad_request(err.to_string());
        }
        if matches!(err, AppError::SellerHasTransactions { .. }) {
            return ApiError::conflict(err.to_string());
        }
        error!(error = ?err, "request failed");
        ApiError::internal()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::bad_request(format_validation_errors(&errors))
    }
}

/// Flatten validator output into `field: message` lines, sorted by field.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut result = String::new();
    for (field, field_errors) in fields {
        for err in field_errors {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| match err.code.as_ref() {
                    "length" => "invalid length".to_string(),
                    "range" => "value out of range".to_string(),
                    "required" => "required".to_string(),
                    _ => "invalid value".to_string(),
                });
            let _ = writeln!(&mut result, "{field}: {message}");
        }
    }

    if result.is_empty() {
        "Validation failed".to_string()
    } else {
        result.trim().to_string()
    }
}

/// Completes error bodies with `uri=<path>` and logs client and server failures.
pub async fn describe_errors(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(mut details) = response.extensions().get::<ErrorDetails>().cloned() else {
        return response;
    };
    details.description = format!("uri={path}");

    let status = response.status();
    if status.is_server_error() {
        error!(%method, %path, status = status.as_u16(), "server error");
    } else {
        warn!(%method, %path, status = status.as_u16(), message = %details.message, "client error");
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    let body = match serde_json::to_vec(&details) {
        Ok(bytes) => Body::from(bytes),
        Err(_) => Body::empty(),
    };
    Response::from_parts(parts, body)
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("No handler found for this path")
}

/// Fallback for known routes called with an unsupported method.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::method_not_allowed(format!("Request method '{method}' is not supported"))
}
