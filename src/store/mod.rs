//! In-memory users, roles and menus backing the API server.

pub mod seed;

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::menu::{filter_menu_records, MenuItem};

pub use seed::Seed;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Account and password are incorrect.")]
    InvalidCredentials,

    #[error("user '{0}' not found")]
    UnknownUser(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub name: String,
    pub avatar: String,
    pub introduction: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Menu/permission codes granted by the role
    #[serde(default)]
    pub permissions: Vec<String>,
}

pub fn password_digest(password: &str) -> String {
    Sha256::digest(password.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub struct AdminStore {
    users: HashMap<String, UserRecord>,
    roles: Vec<RoleRecord>,
    menus: Vec<MenuItem>,
    /// Revoked token ids with the expiry of the token they belong to
    revoked: RwLock<HashMap<Uuid, i64>>,
}

impl AdminStore {
    pub fn from_seed(seed: Seed) -> Self {
        let users = seed
            .users
            .into_iter()
            .map(|u| {
                let record = UserRecord {
                    password_digest: password_digest(&u.password),
                    username: u.username.clone(),
                    name: u.name,
                    avatar: u.avatar,
                    introduction: u.introduction,
                    roles: u.roles,
                };
                (u.username, record)
            })
            .collect();

        Self {
            users,
            roles: seed.roles,
            menus: seed.menus,
            revoked: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let seed: Seed = serde_json::from_str(&content)?;
        Ok(Self::from_seed(seed))
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<&UserRecord, StoreError> {
        let user = self.users.get(username.trim()).ok_or(StoreError::InvalidCredentials)?;
        if user.password_digest != password_digest(password) {
            return Err(StoreError::InvalidCredentials);
        }
        Ok(user)
    }

    pub fn user(&self, username: &str) -> Result<&UserRecord, StoreError> {
        self.users
            .get(username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))
    }

    pub fn roles(&self) -> &[RoleRecord] {
        &self.roles
    }

    pub fn menus(&self) -> &[MenuItem] {
        &self.menus
    }

    /// Permission codes granted by a role set, or `None` when the super role
    /// grants everything
    pub fn permitted_codes(&self, roles: &[String], super_role: Option<&str>) -> Option<HashSet<String>> {
        if super_role.is_some_and(|s| roles.iter().any(|r| r == s)) {
            return None;
        }
        Some(
            self.roles
                .iter()
                .filter(|role| roles.contains(&role.code))
                .flat_map(|role| role.permissions.iter().cloned())
                .collect(),
        )
    }

    /// Flat menu records visible to a role set
    pub fn menus_for(&self, roles: &[String], super_role: Option<&str>) -> Vec<MenuItem> {
        match self.permitted_codes(roles, super_role) {
            Some(codes) => filter_menu_records(&self.menus, &codes),
            None => self.menus.clone(),
        }
    }

    /// Revoke the token `jti`, which expires at `exp` (unix seconds).
    /// Entries whose token has expired anyway are pruned on the way.
    pub fn revoke(&self, jti: Uuid, exp: i64) {
        self.revoke_at(jti, exp, Utc::now().timestamp());
    }

    fn revoke_at(&self, jti: Uuid, exp: i64, now: i64) {
        let mut revoked = self.revoked.write().unwrap_or_else(PoisonError::into_inner);
        let before = revoked.len();
        revoked.retain(|_, expires| *expires > now);
        if revoked.len() < before {
            tracing::debug!("pruned {} expired revocations", before - revoked.len());
        }
        if exp > now {
            revoked.insert(jti, exp);
        }
    }

    pub fn is_revoked(&self, jti: &Uuid) -> bool {
        self.revoked.read().unwrap_or_else(PoisonError::into_inner).contains_key(jti)
    }

    pub fn revoked_count(&self) -> usize {
        self.revoked.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for AdminStore {
    fn default() -> Self {
        Self::from_seed(Seed::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(r: &[&str]) -> Vec<String> {
        r.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn authenticates_seed_users() {
        let store = AdminStore::default();
        assert_eq!(store.authenticate("admin", "111111").unwrap().roles, roles(&["admin"]));
        assert!(matches!(store.authenticate("admin", "nope"), Err(StoreError::InvalidCredentials)));
        assert!(matches!(store.authenticate("ghost", "111111"), Err(StoreError::InvalidCredentials)));
    }

    #[test]
    fn super_role_sees_every_menu() {
        let store = AdminStore::default();
        assert_eq!(store.menus_for(&roles(&["admin"]), Some("admin")).len(), store.menus().len());
    }

    #[test]
    fn editor_menus_follow_role_permissions() {
        let store = AdminStore::default();
        let menus = store.menus_for(&roles(&["editor"]), Some("admin"));
        assert!(!menus.is_empty());
        assert!(menus.len() < store.menus().len());
        assert!(menus.iter().all(|m| !m.code.starts_with("system")));
    }

    #[test]
    fn no_roles_no_menus() {
        let store = AdminStore::default();
        assert!(store.menus_for(&[], Some("admin")).is_empty());
    }

    #[test]
    fn revocation() {
        let store = AdminStore::default();
        let jti = Uuid::new_v4();
        assert!(!store.is_revoked(&jti));
        store.revoke(jti, Utc::now().timestamp() + 3600);
        assert!(store.is_revoked(&jti));
    }

    #[test]
    fn expired_revocations_are_pruned() {
        let store = AdminStore::default();
        let now = 1_000_000;
        let short = Uuid::new_v4();
        let long = Uuid::new_v4();
        store.revoke_at(short, now + 10, now);
        store.revoke_at(long, now + 7200, now);
        assert_eq!(store.revoked_count(), 2);

        // The short-lived token has expired by the next logout
        store.revoke_at(Uuid::new_v4(), now + 7200, now + 60);
        assert!(!store.is_revoked(&short));
        assert!(store.is_revoked(&long));
        assert_eq!(store.revoked_count(), 2);

        // Already expired tokens are not recorded
        store.revoke_at(Uuid::new_v4(), now, now + 60);
        assert_eq!(store.revoked_count(), 2);
    }

    #[test]
    fn digest_is_hex_sha256() {
        assert_eq!(
            password_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
