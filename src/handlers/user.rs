// handlers/user.rs - /user/login, /user/info, /user/logout

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};

use crate::auth::{generate_jwt, Claims};
use crate::client::{LoginData, LoginRequest, Profile};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /user/login - exchange username and password for a token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginData> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let mut field_errors = HashMap::new();
    if request.username.trim().is_empty() {
        field_errors.insert("username".to_string(), "This field is required".to_string());
    }
    if request.password.is_empty() {
        field_errors.insert("password".to_string(), "This field is required".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Missing required fields", Some(field_errors)));
    }

    let user = state.store.authenticate(&request.username, &request.password).map_err(|e| {
        tracing::warn!("failed login for '{}'", request.username.trim());
        e
    })?;

    let claims = Claims::new(user.username.clone(), user.roles.clone(), state.security.jwt_expiry_hours);
    let token = generate_jwt(&claims, &state.security.jwt_secret)?;

    tracing::info!("user '{}' logged in", user.username);
    Ok(ApiResponse::success(LoginData { token }))
}

/// GET /user/info - profile of the token holder
pub async fn info(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Profile> {
    let record = state.store.user(&user.username)?;

    Ok(ApiResponse::success(Profile {
        roles: record.roles.clone(),
        name: record.name.clone(),
        avatar: record.avatar.clone(),
        introduction: record.introduction.clone(),
    }))
}

/// POST /user/logout - revoke the presented token
pub async fn logout(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<&'static str> {
    state.store.revoke(user.jti, user.exp);
    tracing::info!("user '{}' logged out", user.username);
    Ok(ApiResponse::success("success"))
}
