use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::middleware::{
    envelope_meta_middleware, jwt_auth_middleware, require_permission_middleware, require_roles_middleware,
    RequiredPermission, RequiredRoles,
};
use crate::state::AppState;

/// Build the API router
pub fn app(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .fallback(handlers::not_found)
        .with_state(state.clone())
        // Global middleware
        .layer(middleware::from_fn(envelope_meta_middleware));

    if state.security.enable_cors {
        app = app.layer(cors_layer(&state.security.cors_origins));
    }

    app
}

fn public_routes() -> Router<AppState> {
    Router::new().route("/user/login", post(handlers::user::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/user/info", get(handlers::user::info))
        .route("/user/logout", post(handlers::user::logout))
        .route("/menus/tree", get(handlers::menu::menu_tree))
        .route("/routes", get(handlers::menu::accessible_routes))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    let by_role = Router::new()
        .route("/roles", get(handlers::menu::role_list))
        .route_layer(middleware::from_fn_with_state(
            RequiredRoles::any_of(["admin"]),
            require_roles_middleware,
        ));

    let by_permission = Router::new()
        .route("/menus", get(handlers::menu::menu_list))
        .route_layer(middleware::from_fn_with_state(
            RequiredPermission {
                code: "system:menu".to_string(),
                state: state.clone(),
            },
            require_permission_middleware,
        ));

    // Authentication wraps the role and permission checks
    by_role
        .merge(by_permission)
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{generate_jwt, Claims};
    use crate::config::{NavigationConfig, SecurityConfig};
    use crate::store::AdminStore;

    const SECRET: &str = "router-test-secret";

    fn router() -> Router {
        let security = SecurityConfig {
            jwt_secret: SECRET.to_string(),
            jwt_expiry_hours: 1,
            enable_cors: false,
            cors_origins: Vec::new(),
        };
        app(AppState::new(AdminStore::default(), security, NavigationConfig::default()))
    }

    fn token_for(username: &str) -> String {
        generate_jwt(&Claims::new(username.to_string(), Vec::new(), 1), SECRET).unwrap()
    }

    async fn call(request: Request<Body>) -> (StatusCode, Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn envelope_is_stamped_with_request_meta() {
        let (status, body) = call(get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 20000);
        assert_eq!(body["path"], "/health");
        assert_eq!(body["method"], "GET");
    }

    #[tokio::test]
    async fn roles_come_from_the_store_not_the_token() {
        // Claims carry no roles; the store says admin
        let (status, body) = call(get("/roles", Some(&token_for("admin")))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn permission_middleware_denies_editor() {
        let (status, body) = call(get("/menus", Some(&token_for("editor")))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], 40300);
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_illegal() {
        let (status, body) = call(get("/user/info", Some(&token_for("ghost")))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 50008);
    }

    #[tokio::test]
    async fn login_rejects_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/user/login")
            .header("Content-Type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = call(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 40000);
        assert_eq!(body["method"], "POST");
    }
}
