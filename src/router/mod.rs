pub mod defaults;
pub mod generator;
pub mod route;
pub mod table;

pub use generator::{filter_routes, routes_from_menu_tree, MenuRouteGenerator, RouteGenerator, StaticRouteGenerator};
pub use route::{RouteMeta, RouteRecord};
pub use table::{ResolvedRoute, RouteTable};
