// handlers/menu.rs - menus, roles and accessible routes

use axum::extract::{Extension, State};

use crate::menu::{build_menu_tree, MenuItem};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::router::{defaults, RouteRecord, StaticRouteGenerator};
use crate::state::AppState;
use crate::store::RoleRecord;

/// GET /menus/tree - menu tree the caller's roles grant
pub async fn menu_tree(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<MenuItem>> {
    let records = state.store.menus_for(&user.roles, state.super_role());
    Ok(ApiResponse::success(build_menu_tree(records)))
}

/// GET /menus - every menu record, flat
pub async fn menu_list(State(state): State<AppState>) -> ApiResult<Vec<MenuItem>> {
    Ok(ApiResponse::success(state.store.menus().to_vec()))
}

/// GET /roles
pub async fn role_list(State(state): State<AppState>) -> ApiResult<Vec<RoleRecord>> {
    Ok(ApiResponse::success(state.store.roles().to_vec()))
}

/// GET /routes - built-in async routes the caller may reach
pub async fn accessible_routes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<RouteRecord>> {
    let generator = StaticRouteGenerator::new(defaults::async_routes())
        .with_super_role(state.navigation.super_role.clone());
    Ok(ApiResponse::success(generator.accessible(&user.roles)))
}
