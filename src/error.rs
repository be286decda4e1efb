// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::JwtError;
use crate::envelope::{codes, Envelope};
use crate::store::StoreError;

/// HTTP API error carrying both an HTTP status and an envelope business code
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),
    IllegalToken(String),
    TokenExpired(String),
    InvalidCredentials(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::IllegalToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::TokenExpired(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope business code
    pub fn code(&self) -> i64 {
        match self {
            ApiError::BadRequest(_) => codes::BAD_REQUEST,
            ApiError::ValidationError { .. } => codes::BAD_REQUEST,
            ApiError::Unauthorized(_) => codes::UNAUTHORIZED,
            ApiError::IllegalToken(_) => codes::ILLEGAL_TOKEN,
            ApiError::TokenExpired(_) => codes::TOKEN_EXPIRED,
            ApiError::InvalidCredentials(_) => codes::BAD_CREDENTIALS,
            ApiError::Forbidden(_) => codes::FORBIDDEN,
            ApiError::NotFound(_) => codes::NOT_FOUND,
            ApiError::InternalServerError(_) => codes::INTERNAL,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::IllegalToken(msg) => msg,
            ApiError::TokenExpired(msg) => msg,
            ApiError::InvalidCredentials(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to envelope JSON body
    pub fn to_json(&self) -> Value {
        let mut envelope = Envelope::<Value>::failure(self.code(), self.message());
        if let ApiError::ValidationError {
            field_errors: Some(field_errors),
            ..
        } = self
        {
            envelope.data = Some(json!({ "field_errors": field_errors }));
        }
        serde_json::to_value(envelope).unwrap_or_else(|_| json!({ "code": self.code(), "message": self.message() }))
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: Option<HashMap<String, String>>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn illegal_token(message: impl Into<String>) -> Self {
        ApiError::IllegalToken(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::TokenExpired("Token expired, please log in again".to_string()),
            JwtError::Invalid(msg) => {
                tracing::debug!("rejected token: {}", msg);
                ApiError::illegal_token("Illegal token")
            }
            JwtError::InvalidSecret | JwtError::TokenGeneration(_) => {
                tracing::error!("JWT configuration error: {}", err);
                ApiError::internal_server_error("Failed to process token")
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidCredentials => ApiError::InvalidCredentials(err.to_string()),
            // A valid token for a user that no longer exists
            StoreError::UnknownUser(_) => ApiError::illegal_token("Login failed, unable to get user details."),
            StoreError::Io(_) | StoreError::Json(_) => {
                tracing::error!("store error: {}", err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_errors_map_to_session_codes() {
        assert_eq!(ApiError::from(JwtError::Expired).code(), codes::TOKEN_EXPIRED);
        assert_eq!(ApiError::from(JwtError::Invalid("bad".into())).code(), codes::ILLEGAL_TOKEN);
        assert_eq!(ApiError::from(JwtError::InvalidSecret).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_carry_fields() {
        let mut fields = HashMap::new();
        fields.insert("username".to_string(), "This field is required".to_string());
        let body = ApiError::validation_error("Missing required fields", Some(fields)).to_json();

        assert_eq!(body["code"], codes::BAD_REQUEST);
        assert_eq!(body["data"]["field_errors"]["username"], "This field is required");
    }

    #[test]
    fn bad_credentials_code() {
        let err = ApiError::from(StoreError::InvalidCredentials);
        assert_eq!(err.code(), 60204);
        assert_eq!(err.message(), "Account and password are incorrect.");
    }
}
