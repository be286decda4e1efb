// handlers/mod.rs
//
// Public: /health, /user/login
// Token required: /user/info, /user/logout, /menus/tree, /routes
// Role or permission required: /menus, /roles

pub mod menu;
pub mod user;

use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /health
pub async fn health() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    })))
}

/// Fallback for unknown routes, so they still get an envelope
pub async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
