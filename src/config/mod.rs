use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    /// Optional JSON file with users, roles and menus replacing the built-in seed
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

/// What the navigation guard does when a profile comes back with no roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyRolesPolicy {
    /// Treat the session as invalid: clear it and send the user to login
    Reject,
    /// Keep the session; only routes without role restrictions are reachable
    AllowNoAccess,
}

impl std::str::FromStr for EmptyRolesPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "allow-no-access" | "allow" => Ok(Self::AllowNoAccess),
            other => Err(format!("unknown empty roles policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub login_path: String,
    pub landing_path: String,
    /// Paths reachable without a token
    pub whitelist: Vec<String>,
    pub app_title: String,
    /// Role that receives every route regardless of route restrictions
    pub super_role: Option<String>,
    pub empty_roles_policy: EmptyRolesPolicy,
    pub request_timeout_ms: u64,
    pub max_redirects: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            landing_path: "/".to_string(),
            whitelist: vec!["/login".to_string(), "/auth-redirect".to_string()],
            app_title: "Admin Panel".to_string(),
            super_role: Some("admin".to_string()),
            empty_roles_policy: EmptyRolesPolicy::Reject,
            request_timeout_ms: 5000,
            max_redirects: 10,
        }
    }
}

impl NavigationConfig {
    pub fn is_whitelisted(&self, path: &str) -> bool {
        self.whitelist.iter().any(|p| p == path)
    }

    pub fn page_title(&self, title: Option<&str>) -> String {
        match title {
            Some(t) if !t.is_empty() => format!("{} - {}", t, self.app_title),
            _ => self.app_title.clone(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Some(port) = env::var("ADMIN_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_SEED_FILE") {
            self.api.seed_file = Some(v).filter(|s| !s.is_empty());
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Navigation overrides
        if let Ok(v) = env::var("NAV_LOGIN_PATH") {
            self.navigation.login_path = v;
        }
        if let Ok(v) = env::var("NAV_LANDING_PATH") {
            self.navigation.landing_path = v;
        }
        if let Ok(v) = env::var("NAV_WHITELIST") {
            self.navigation.whitelist = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("NAV_APP_TITLE") {
            self.navigation.app_title = v;
        }
        if let Ok(v) = env::var("NAV_SUPER_ROLE") {
            self.navigation.super_role = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("NAV_EMPTY_ROLES_POLICY") {
            self.navigation.empty_roles_policy = v.parse().unwrap_or(self.navigation.empty_roles_policy);
        }
        if let Ok(v) = env::var("NAV_REQUEST_TIMEOUT_MS") {
            self.navigation.request_timeout_ms = v.parse().unwrap_or(self.navigation.request_timeout_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                seed_file: None,
            },
            security: SecurityConfig {
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                enable_cors: true,
                cors_origins: vec!["http://localhost:9527".to_string(), "http://localhost:5173".to_string()],
            },
            navigation: NavigationConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                seed_file: None,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            navigation: NavigationConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                seed_file: None,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                enable_cors: true,
                cors_origins: vec!["https://admin.example.com".to_string()],
            },
            navigation: NavigationConfig {
                request_timeout_ms: 10_000,
                ..NavigationConfig::default()
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
