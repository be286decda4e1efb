use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Roles accepted by [`require_roles_middleware`]; holding any one is enough
#[derive(Clone, Debug)]
pub struct RequiredRoles(pub Arc<[String]>);

impl RequiredRoles {
    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    pub fn permits(&self, roles: &[String]) -> bool {
        self.0.iter().any(|r| roles.contains(r))
    }
}

/// Permission code checked by [`require_permission_middleware`]
#[derive(Clone)]
pub struct RequiredPermission {
    pub code: String,
    pub state: AppState,
}

fn auth_user(request: &Request) -> Result<&AuthUser, ApiError> {
    request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required before authorization"))
}

pub async fn require_roles_middleware(
    State(required): State<RequiredRoles>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = auth_user(&request)?;
    if !required.permits(&user.roles) {
        tracing::warn!(
            "user '{}' with roles {:?} denied, requires one of {:?}",
            user.username,
            user.roles,
            required.0
        );
        return Err(ApiError::forbidden("Insufficient role"));
    }
    Ok(next.run(request).await)
}

pub async fn require_permission_middleware(
    State(required): State<RequiredPermission>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = auth_user(&request)?;
    let allowed = match required.state.store.permitted_codes(&user.roles, required.state.super_role()) {
        None => true,
        Some(codes) => codes.contains(&required.code),
    };

    if !allowed {
        tracing::warn!("user '{}' lacks permission '{}'", user.username, required.code);
        return Err(ApiError::forbidden(format!("Missing permission '{}'", required.code)));
    }
    Ok(next.run(request).await)
}
