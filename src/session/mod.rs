//! Client session: token, roles and profile of the signed-in user.

pub mod storage;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::client::{AuthApi, ClientError, Profile};

pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub token: Option<String>,
    /// `None` until a profile fetch succeeded for the current token
    pub roles: Option<Vec<String>>,
    pub name: String,
    pub avatar: String,
    pub introduction: String,
}

impl Session {
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn roles_known(&self) -> bool {
        self.roles.is_some()
    }
}

/// Shared session handle, built once at bootstrap and passed by reference to
/// whatever needs it.
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn TokenStorage>,
    /// Bumped, under the state write lock, whenever a session starts or ends
    generation: AtomicU64,
    /// Serializes profile fetches so only one is in flight per session
    fetch_gate: tokio::sync::Mutex<()>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let token = storage.load().filter(|t| !t.is_empty());
        Self {
            state: RwLock::new(Session {
                token,
                ..Session::default()
            }),
            storage,
            generation: AtomicU64::new(0),
            fetch_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStorage::new()))
    }

    pub fn snapshot(&self) -> Session {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
            .filter(|t| !t.is_empty())
    }

    pub fn roles(&self) -> Option<Vec<String>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).roles.clone()
    }

    /// Identifies the current session. Changes on every `set_token` and
    /// `reset`, even when the same token is set again.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Token and generation read together
    pub fn current(&self) -> (Option<String>, u64) {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let token = state.token.clone().filter(|t| !t.is_empty());
        (token, self.generation.load(Ordering::SeqCst))
    }

    pub(crate) fn fetch_gate(&self) -> &tokio::sync::Mutex<()> {
        &self.fetch_gate
    }

    /// Start a new session with a freshly issued token. Roles are unknown
    /// until the next profile fetch.
    pub fn set_token(&self, token: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = Session {
            token: Some(token.to_string()),
            ..Session::default()
        };
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.storage.save(token);
    }

    /// Apply a fetched profile in a single write. Ignored, returning false,
    /// when the session changed since `generation` was read.
    pub fn apply_profile(&self, generation: u64, profile: Profile) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != generation || !state.has_token() {
            tracing::debug!("discarding profile fetched for a session that is no longer current");
            return false;
        }
        state.roles = Some(profile.roles);
        state.name = profile.name;
        state.avatar = profile.avatar;
        state.introduction = profile.introduction;
        true
    }

    /// Drop token, roles and profile
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = Session::default();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.storage.clear();
    }

    /// Reset only if the session is still the one identified by
    /// `generation`. Returns whether it was reset.
    pub fn reset_if_current(&self, generation: u64) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *state = Session::default();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.storage.clear();
        true
    }

    pub async fn login(&self, api: &dyn AuthApi, username: &str, password: &str) -> Result<(), ClientError> {
        let token = api.login(username, password).await?;
        self.set_token(&token);
        tracing::info!("signed in as '{}'", username.trim());
        Ok(())
    }

    /// Revoke the token remotely and clear the session. The local session is
    /// cleared even when the remote call fails.
    pub async fn logout(&self, api: &dyn AuthApi) -> Result<(), ClientError> {
        let result = match self.token() {
            Some(token) => api.logout(&token).await,
            None => Ok(()),
        };
        self.reset();
        tracing::info!("signed out");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(roles: &[&str]) -> Profile {
        Profile {
            roles: roles.iter().map(|r| r.to_string()).collect(),
            name: "Super Admin".into(),
            avatar: "a.gif".into(),
            introduction: "I am a super administrator".into(),
        }
    }

    #[test]
    fn loads_token_from_storage() {
        let store = SessionStore::new(Arc::new(MemoryTokenStorage::with_token("admin-token")));
        assert_eq!(store.token().as_deref(), Some("admin-token"));
        assert!(!store.snapshot().roles_known());
    }

    #[test]
    fn profile_applies_only_to_its_token() {
        let store = SessionStore::in_memory();
        let stale = store.generation();
        store.set_token("t1");

        assert!(!store.apply_profile(stale, profile(&["admin"])));
        assert_eq!(store.roles(), None);

        assert!(store.apply_profile(store.generation(), profile(&["admin"])));
        let session = store.snapshot();
        assert_eq!(session.roles, Some(vec!["admin".to_string()]));
        assert_eq!(session.name, "Super Admin");
    }

    #[test]
    fn reset_clears_everything() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = SessionStore::new(storage.clone());
        store.set_token("t1");
        store.apply_profile(store.generation(), profile(&["editor"]));

        store.reset();
        assert_eq!(store.snapshot(), Session::default());
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn new_token_forgets_roles() {
        let store = SessionStore::in_memory();
        store.set_token("t1");
        store.apply_profile(store.generation(), profile(&["editor"]));
        store.set_token("t2");
        assert_eq!(store.roles(), None);
    }

    #[test]
    fn every_session_change_moves_the_generation() {
        let store = SessionStore::in_memory();
        store.set_token("t1");
        let first = store.generation();

        // Same token again still starts a new session
        store.set_token("t1");
        let second = store.generation();
        assert_ne!(first, second);
        assert!(!store.apply_profile(first, profile(&["admin"])));

        assert_eq!(store.current(), (Some("t1".to_string()), second));
        store.reset();
        assert_eq!(store.current().0, None);
        assert_ne!(store.generation(), second);
    }

    #[test]
    fn reset_if_current_ignores_newer_sessions() {
        let store = SessionStore::in_memory();
        store.set_token("t1");
        let old = store.generation();
        store.set_token("t2");

        assert!(!store.reset_if_current(old));
        assert_eq!(store.token().as_deref(), Some("t2"));

        assert!(store.reset_if_current(store.generation()));
        assert_eq!(store.token(), None);
    }
}
