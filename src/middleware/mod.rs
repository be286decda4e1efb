pub mod auth;
pub mod response;
pub mod roles;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{envelope_meta_middleware, ApiResponse, ApiResult};
pub use roles::{require_permission_middleware, require_roles_middleware, RequiredPermission, RequiredRoles};
