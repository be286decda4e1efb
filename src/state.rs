use std::sync::Arc;

use crate::config::{NavigationConfig, SecurityConfig};
use crate::store::AdminStore;

/// Shared state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AdminStore>,
    pub security: SecurityConfig,
    pub navigation: NavigationConfig,
}

impl AppState {
    pub fn new(store: AdminStore, security: SecurityConfig, navigation: NavigationConfig) -> Self {
        Self {
            store: Arc::new(store),
            security,
            navigation,
        }
    }

    pub fn super_role(&self) -> Option<&str> {
        self.navigation.super_role.as_deref()
    }
}
