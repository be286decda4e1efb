use std::sync::Arc;

use super::error::GuardError;
use super::feedback::{NavigationProgress, Notifier, ProgressIndicator, ProgressSpan, TracingNotifier};
use super::location::Location;
use crate::client::AuthApi;
use crate::config::{EmptyRolesPolicy, NavigationConfig};
use crate::router::{RouteGenerator, RouteTable};
use crate::session::SessionStore;

/// What the guard decided for one navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the navigation reach its target unchanged
    Proceed,
    /// Abort and navigate somewhere else instead
    Redirect(Location),
    /// Routes were just registered: navigate to the same target again,
    /// replacing the current history entry
    Redispatch(Location),
}

/// Navigation-time access control.
///
/// Per attempt the session is in one of three states: no token, token with
/// known roles, token with unknown roles. Only the last one talks to the
/// network, and at most once per session.
pub struct RouteAccessGuard {
    config: NavigationConfig,
    session: Arc<SessionStore>,
    api: Arc<dyn AuthApi>,
    generator: Arc<dyn RouteGenerator>,
    routes: Arc<RouteTable>,
    progress: Arc<dyn ProgressIndicator>,
    notifier: Arc<dyn Notifier>,
}

impl RouteAccessGuard {
    pub fn new(
        config: NavigationConfig,
        session: Arc<SessionStore>,
        api: Arc<dyn AuthApi>,
        generator: Arc<dyn RouteGenerator>,
        routes: Arc<RouteTable>,
    ) -> Self {
        Self {
            config,
            session,
            api,
            generator,
            routes,
            progress: Arc::new(NavigationProgress::new()),
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressIndicator>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    /// Evaluate one navigation attempt. The progress indicator runs for the
    /// whole evaluation and is done once a decision is returned or the
    /// attempt is dropped.
    pub async fn before_each(&self, to: &Location) -> NavigationDecision {
        let span = ProgressSpan::start(self.progress.as_ref());
        let decision = self.decide(to).await;
        drop(span);

        tracing::debug!("navigation to '{}': {:?}", to.full_path(), decision);
        decision
    }

    async fn decide(&self, to: &Location) -> NavigationDecision {
        let (token, generation) = self.session.current();
        if self.routes.reset_unless_owned_by(generation) {
            tracing::debug!("session changed, routes of the previous session dropped");
        }

        let Some(token) = token else {
            if self.config.is_whitelisted(&to.path) {
                return NavigationDecision::Proceed;
            }
            return NavigationDecision::Redirect(self.login_redirect(to));
        };

        if to.path == self.config.login_path {
            return NavigationDecision::Redirect(Location::new(self.config.landing_path.clone()));
        }

        if self.session.roles().is_some() {
            return NavigationDecision::Proceed;
        }

        match self.establish(&token).await {
            Ok(()) => NavigationDecision::Redispatch(to.clone().replacing()),
            Err(GuardError::SessionEnded) => {
                tracing::debug!("session ended before '{}' could be authorized", to.path);
                NavigationDecision::Redirect(self.login_redirect(to))
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                tracing::warn!("session rejected while navigating to '{}': {}", to.path, e);
                NavigationDecision::Redirect(self.login_redirect(to))
            }
        }
    }

    /// Settle the roles for `token` under the fetch gate. On failure the
    /// session and its routes are cleared, unless the session already moved
    /// on, in which case the failure is reported as [`GuardError::SessionEnded`].
    async fn establish(&self, token: &str) -> Result<(), GuardError> {
        let _gate = self.session.fetch_gate().lock().await;

        // Another navigation may have settled the fetch while this one waited
        let (current, generation) = self.session.current();
        if current.as_deref() != Some(token) {
            return Err(GuardError::SessionEnded);
        }
        if self.session.roles().is_some() {
            return Ok(());
        }

        match self.fetch_and_register(token, generation).await {
            Ok(()) => Ok(()),
            Err(GuardError::SessionEnded) => {
                self.routes.reset_unless_owned_by(self.session.generation());
                Err(GuardError::SessionEnded)
            }
            Err(e) => {
                if self.session.reset_if_current(generation) {
                    self.routes.reset();
                    Err(e)
                } else {
                    tracing::debug!("session changed while its profile fetch failed: {}", e);
                    self.routes.reset_unless_owned_by(self.session.generation());
                    Err(GuardError::SessionEnded)
                }
            }
        }
    }

    /// Fetch the profile, register the accessible routes, then publish the
    /// roles. Registration happens first so nobody sees known roles before
    /// the routes exist.
    async fn fetch_and_register(&self, token: &str, generation: u64) -> Result<(), GuardError> {
        let profile = self.api.profile(token).await?;
        if profile.roles.is_empty() && self.config.empty_roles_policy == EmptyRolesPolicy::Reject {
            return Err(GuardError::EmptyRoles);
        }

        let routes = self.generator.generate(&profile.roles).await?;
        let generated = routes.len();
        let added = self.routes.register_for_session(generation, routes);

        let roles = profile.roles.clone();
        if !self.session.apply_profile(generation, profile) {
            return Err(GuardError::SessionEnded);
        }

        tracing::info!("session established with roles {:?}, {} of {} routes registered", roles, added, generated);
        Ok(())
    }

    fn login_redirect(&self, to: &Location) -> Location {
        Location::new(self.config.login_path.clone()).with_query("redirect", to.path.clone())
    }
}
