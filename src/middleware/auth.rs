use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use url::form_urlencoded;
use uuid::Uuid;

use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context, resolved from the token and the user store
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub roles: Vec<String>,
    pub jti: Uuid,
    /// Token expiry, unix seconds
    pub exp: i64,
}

/// JWT authentication middleware that validates tokens and injects [`AuthUser`]
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers(), request.uri().query()).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token, &state.security.jwt_secret)?;
    if state.store.is_revoked(&claims.jti) {
        tracing::warn!("revoked token presented for user '{}'", claims.sub);
        return Err(ApiError::illegal_token("Token has been revoked"));
    }

    // Roles come from the store so that role changes apply to live tokens
    let user = state.store.user(&claims.sub)?;
    let auth_user = AuthUser {
        username: user.username.clone(),
        roles: user.roles.clone(),
        jti: claims.jti,
        exp: claims.exp,
    };

    tracing::debug!("authenticated '{}' with roles {:?}", auth_user.username, auth_user.roles);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Token from `Authorization: Bearer`, `X-Token` or the `token` query parameter
fn extract_token(headers: &HeaderMap, query: Option<&str>) -> Result<String, String> {
    if let Some(auth_header) = headers.get("authorization") {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| "Invalid Authorization header format".to_string())?;

        return match auth_str.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            Some(_) => Err("Empty JWT token".to_string()),
            None => Err("Authorization header must use Bearer token format".to_string()),
        };
    }

    if let Some(token) = headers.get("x-token").and_then(|v| v.to_str().ok()) {
        if !token.trim().is_empty() {
            return Ok(token.trim().to_string());
        }
    }

    query
        .and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(key, value)| key == "token" && !value.is_empty())
                .map(|(_, value)| value.into_owned())
        })
        .ok_or_else(|| "Missing token".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_sources_in_priority_order() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers, Some("token=q")).unwrap(), "q");

        headers.insert("x-token", HeaderValue::from_static("x"));
        assert_eq!(extract_token(&headers, Some("token=q")).unwrap(), "x");

        headers.insert("authorization", HeaderValue::from_static("Bearer b"));
        assert_eq!(extract_token(&headers, Some("token=q")).unwrap(), "b");
    }

    #[test]
    fn malformed_authorization_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_token(&headers, None).is_err());

        assert!(extract_token(&HeaderMap::new(), Some("token=")).is_err());
        assert!(extract_token(&HeaderMap::new(), None).is_err());
    }
}
