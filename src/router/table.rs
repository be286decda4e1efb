use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use super::route::{join_path, path_matches, RouteRecord};

/// A route matched by [`RouteTable::resolve`], outermost record first
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub pattern: String,
    pub matched: Vec<RouteRecord>,
}

impl ResolvedRoute {
    pub fn leaf(&self) -> Option<&RouteRecord> {
        self.matched.last()
    }

    /// Closest title along the match, leaf first
    pub fn title(&self) -> Option<&str> {
        self.matched.iter().rev().find_map(|r| r.meta.title.as_deref())
    }

    pub fn redirect(&self) -> Option<&str> {
        self.leaf().and_then(|r| r.redirect.as_deref())
    }
}

#[derive(Default)]
struct Inner {
    routes: Vec<RouteRecord>,
    keys: HashSet<String>,
    /// Session generation the non-constant routes were registered for
    owner: Option<u64>,
}

impl Inner {
    fn with_routes(routes: &[RouteRecord]) -> Self {
        let mut inner = Self::default();
        for route in routes {
            inner.insert(route.clone());
        }
        inner
    }

    fn insert(&mut self, route: RouteRecord) -> bool {
        if self.keys.contains(route.key()) {
            tracing::debug!("route '{}' already registered", route.key());
            return false;
        }
        self.keys.insert(route.key().to_string());
        self.routes.push(route);
        true
    }
}

/// The live route table.
///
/// Within one session routes can be added but never replaced or removed, and
/// a route whose key is already registered is ignored. Routes registered for
/// a session are dropped again, leaving only the constant routes, once that
/// session is over.
#[derive(Default)]
pub struct RouteTable {
    constant: Vec<RouteRecord>,
    inner: RwLock<Inner>,
}

impl RouteTable {
    pub fn new(constant_routes: Vec<RouteRecord>) -> Self {
        Self {
            inner: RwLock::new(Inner::with_routes(&constant_routes)),
            constant: constant_routes,
        }
    }

    /// Register a route unless one with the same key exists. Returns whether
    /// the route was added.
    pub fn add_if_absent(&self, route: RouteRecord) -> bool {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).insert(route)
    }

    /// Register the routes of session `generation`. Routes left over from any
    /// other session are dropped first, in the same write.
    pub fn register_for_session(&self, generation: u64, routes: impl IntoIterator<Item = RouteRecord>) -> usize {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.owner.is_some_and(|owner| owner != generation) {
            tracing::debug!("dropping routes of an earlier session");
            *inner = Inner::with_routes(&self.constant);
        }
        inner.owner = Some(generation);
        routes.into_iter().map(|r| inner.insert(r)).filter(|added| *added).count()
    }

    /// Session generation the current routes belong to, `None` while only
    /// constant routes are registered
    pub fn session_generation(&self) -> Option<u64> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).owner
    }

    /// Back to the constant routes
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *inner = Inner::with_routes(&self.constant);
    }

    /// Reset unless the registered routes belong to `generation`. Returns
    /// whether anything was dropped.
    pub fn reset_unless_owned_by(&self, generation: u64) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match inner.owner {
            Some(owner) if owner != generation => {
                *inner = Inner::with_routes(&self.constant);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn routes(&self) -> Vec<RouteRecord> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).routes.clone()
    }

    /// Find the route chain for a concrete path. Catch-all routes are only
    /// tried after every other route failed to match.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(found) = find(&inner.routes, "/", path, false) {
            return Some(found);
        }
        find(&inner.routes, "/", path, true)
    }
}

fn find(routes: &[RouteRecord], parent: &str, path: &str, catch_all: bool) -> Option<ResolvedRoute> {
    for route in routes.iter().filter(|r| r.is_catch_all() == catch_all) {
        let full = join_path(parent, &route.path);

        if !catch_all {
            if let Some(mut nested) = find(&route.children, &full, path, false) {
                nested.matched.insert(0, route.clone());
                return Some(nested);
            }
        }

        if path_matches(&full, path) {
            return Some(ResolvedRoute {
                pattern: full,
                matched: vec![route.clone()],
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(vec![
            RouteRecord::new("/login").hidden(),
            RouteRecord::new("/")
                .redirect("/dashboard")
                .child(RouteRecord::new("dashboard").named("Dashboard").title("Dashboard")),
        ])
    }

    #[test]
    fn add_if_absent_is_idempotent() {
        let table = table();
        let route = RouteRecord::new("/permission").named("Permission");

        assert!(table.add_if_absent(route.clone()));
        assert!(!table.add_if_absent(route));
        assert_eq!(table.len(), 3);
        assert!(table.contains("Permission"));
    }

    #[test]
    fn unnamed_routes_are_keyed_by_path() {
        let table = table();
        assert!(!table.add_if_absent(RouteRecord::new("/login")));
        assert!(table.contains("/login"));
    }

    #[test]
    fn resolves_nested_routes() {
        let table = table();

        let resolved = table.resolve("/dashboard").expect("dashboard");
        assert_eq!(resolved.pattern, "/dashboard");
        assert_eq!(resolved.matched.len(), 2);
        assert_eq!(resolved.title(), Some("Dashboard"));

        let root = table.resolve("/").expect("root");
        assert_eq!(root.redirect(), Some("/dashboard"));
    }

    #[test]
    fn catch_all_matches_last() {
        let table = table();
        assert!(table.resolve("/nowhere").is_none());

        table.add_if_absent(RouteRecord::new("*").redirect("/404").hidden());
        table.add_if_absent(RouteRecord::new("/404").title("404"));

        assert_eq!(table.resolve("/nowhere").and_then(|r| r.redirect().map(str::to_string)), Some("/404".to_string()));
        assert_eq!(table.resolve("/404").and_then(|r| r.title().map(str::to_string)), Some("404".to_string()));
    }

    #[test]
    fn reset_restores_constant_routes() {
        let table = table();
        table.register_for_session(1, vec![RouteRecord::new("/permission").named("Permission")]);
        assert_eq!(table.session_generation(), Some(1));
        assert_eq!(table.len(), 3);

        table.reset();
        assert_eq!(table.len(), 2);
        assert!(!table.contains("Permission"));
        assert!(table.contains("/login"));
        assert_eq!(table.session_generation(), None);
    }

    #[test]
    fn another_session_replaces_registered_routes() {
        let table = table();
        assert_eq!(table.register_for_session(1, vec![RouteRecord::new("/system").named("System")]), 1);
        assert_eq!(table.register_for_session(1, vec![RouteRecord::new("/system").named("System")]), 0);

        assert!(!table.reset_unless_owned_by(1));
        assert!(table.contains("System"));

        assert_eq!(table.register_for_session(2, vec![RouteRecord::new("/article").named("Article")]), 1);
        assert!(!table.contains("System"));
        assert!(table.contains("Article"));

        assert!(table.reset_unless_owned_by(3));
        assert_eq!(table.len(), 2);
        assert!(!table.reset_unless_owned_by(3));
    }
}
