use axum::{
    body::Body,
    extract::Request,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::envelope::Envelope;
use crate::error::ApiError;

/// Largest body the envelope middleware will buffer
const MAX_ENVELOPE_BYTES: usize = 16 * 1024 * 1024;

/// Wrapper for API responses that adds the success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        match serde_json::to_value(Envelope::success(self.data)) {
            Ok(envelope) => (status, Json(envelope)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                ApiError::internal_server_error("Failed to serialize response data").into_response()
            }
        }
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Stamp `path` and `method` onto every JSON envelope leaving the server
pub async fn envelope_meta_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ENVELOPE_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("failed to buffer response body for {} {}: {}", method, path, e);
            return ApiError::internal_server_error("Failed to format response").into_response();
        }
    };

    let mut envelope = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(obj)) if obj.contains_key("code") => obj,
        _ => return Response::from_parts(parts, Body::from(bytes)),
    };
    envelope.entry("path").or_insert_with(|| json!(path));
    envelope.entry("method").or_insert_with(|| json!(method));

    match serde_json::to_vec(&envelope) {
        Ok(stamped) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(stamped))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}
