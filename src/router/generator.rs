use std::sync::Arc;

use async_trait::async_trait;

use super::route::RouteRecord;
use crate::client::{AuthApi, ClientError};
use crate::menu::MenuItem;
use crate::session::SessionStore;

/// Turns a role set into the routes that should be added to the route table
#[async_trait]
pub trait RouteGenerator: Send + Sync {
    async fn generate(&self, roles: &[String]) -> Result<Vec<RouteRecord>, ClientError>;
}

/// Filter a list of route definitions down to what `roles` may reach.
/// A parent stays when it is permitted; its children are filtered the same way.
pub fn filter_routes(routes: &[RouteRecord], roles: &[String]) -> Vec<RouteRecord> {
    routes
        .iter()
        .filter(|route| route.permits(roles))
        .map(|route| {
            let mut route = route.clone();
            route.children = filter_routes(&route.children, roles);
            route
        })
        .collect()
}

/// Generates routes from static definitions tagged with required roles
pub struct StaticRouteGenerator {
    routes: Vec<RouteRecord>,
    super_role: Option<String>,
}

impl StaticRouteGenerator {
    pub fn new(routes: Vec<RouteRecord>) -> Self {
        Self {
            routes,
            super_role: None,
        }
    }

    /// Holders of `role` get every definition, unfiltered
    pub fn with_super_role(mut self, role: Option<String>) -> Self {
        self.super_role = role;
        self
    }

    pub fn accessible(&self, roles: &[String]) -> Vec<RouteRecord> {
        match &self.super_role {
            Some(super_role) if roles.contains(super_role) => self.routes.clone(),
            _ => filter_routes(&self.routes, roles),
        }
    }
}

#[async_trait]
impl RouteGenerator for StaticRouteGenerator {
    async fn generate(&self, roles: &[String]) -> Result<Vec<RouteRecord>, ClientError> {
        Ok(self.accessible(roles))
    }
}

/// Convert a menu tree into route records. Buttons and items without a path
/// carry no route of their own, but a path-less item's children are lifted
/// to its level.
pub fn routes_from_menu_tree(tree: &[MenuItem]) -> Vec<RouteRecord> {
    let mut routes = Vec::new();
    for item in tree.iter().filter(|i| !i.is_button()) {
        let children = routes_from_menu_tree(&item.children);
        match item.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => routes.push(RouteRecord {
                path: path.to_string(),
                name: Some(item.code.clone()).filter(|c| !c.is_empty()),
                component: item.component.clone(),
                redirect: None,
                hidden: false,
                meta: super::route::RouteMeta {
                    title: Some(item.name.clone()),
                    icon: item.icon.clone(),
                    roles: None,
                },
                children,
            }),
            None => routes.extend(children),
        }
    }
    routes
}

/// Generates routes from the menu tree the server grants the current session.
/// The server filters the tree by the session's roles, so `roles` is unused.
pub struct MenuRouteGenerator {
    api: Arc<dyn AuthApi>,
    session: Arc<SessionStore>,
    fallback: Vec<RouteRecord>,
}

impl MenuRouteGenerator {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            fallback: Vec::new(),
        }
    }

    /// Routes appended after the menu-derived ones, such as a catch-all
    pub fn with_fallback(mut self, routes: Vec<RouteRecord>) -> Self {
        self.fallback = routes;
        self
    }
}

#[async_trait]
impl RouteGenerator for MenuRouteGenerator {
    async fn generate(&self, _roles: &[String]) -> Result<Vec<RouteRecord>, ClientError> {
        let token = self.session.token().ok_or(ClientError::MissingData)?;
        let tree = self.api.menu_tree(&token).await?;
        let mut routes = routes_from_menu_tree(&tree);
        routes.extend(self.fallback.iter().cloned());
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::defaults;

    fn roles(r: &[&str]) -> Vec<String> {
        r.iter().map(|s| s.to_string()).collect()
    }

    fn paths(routes: &[RouteRecord]) -> Vec<&str> {
        routes.iter().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn editor_sees_only_permitted_routes() {
        let routes = vec![
            RouteRecord::new("/permission")
                .roles(["admin", "editor"])
                .child(RouteRecord::new("page").roles(["admin"]))
                .child(RouteRecord::new("directive")),
            RouteRecord::new("/users").roles(["admin"]),
            RouteRecord::new("/icon"),
        ];
        let out = filter_routes(&routes, &roles(&["editor"]));

        assert_eq!(paths(&out), vec!["/permission", "/icon"]);
        assert_eq!(paths(&out[0].children), vec!["directive"]);
    }

    #[tokio::test]
    async fn super_role_gets_everything() {
        let generator = StaticRouteGenerator::new(defaults::async_routes()).with_super_role(Some("admin".into()));
        let all = generator.generate(&roles(&["admin"])).await.unwrap();
        assert_eq!(all, defaults::async_routes());

        let editor = generator.generate(&roles(&["editor"])).await.unwrap();
        assert!(editor.len() < all.len());
    }

    #[tokio::test]
    async fn without_super_role_admin_is_filtered_like_anyone() {
        let generator = StaticRouteGenerator::new(vec![RouteRecord::new("/secret").roles(["root"])]);
        assert!(generator.generate(&roles(&["admin"])).await.unwrap().is_empty());
    }

    #[test]
    fn menu_tree_becomes_routes() {
        let tree = crate::menu::build_menu_tree(vec![
            MenuItem::new("1", "System", 0).with_code("system").with_path("/system"),
            MenuItem::new("2", "Users", 0).with_parent("1").with_code("user:list").with_path("users"),
            MenuItem::new("3", "Add", 0).with_parent("2").with_code("user:add").with_kind(MenuItem::BUTTON),
            MenuItem::new("4", "Group", 1),
            MenuItem::new("5", "Logs", 0).with_parent("4").with_code("log").with_path("/logs"),
        ]);
        let routes = routes_from_menu_tree(&tree);

        assert_eq!(paths(&routes), vec!["/system", "/logs"]);
        assert_eq!(paths(&routes[0].children), vec!["users"]);
        assert!(routes[0].children[0].children.is_empty());
        assert_eq!(routes[0].name.as_deref(), Some("system"));
        assert_eq!(routes[0].meta.title.as_deref(), Some("System"));
    }
}
