use std::sync::{Arc, Mutex, PoisonError};

use super::access::{NavigationDecision, RouteAccessGuard};
use super::error::NavigationError;
use super::location::Location;

/// Where a navigation ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Arrived {
        location: Location,
        /// Route pattern that matched, e.g. `/article/edit/:id`
        route: String,
        title: String,
        hops: usize,
    },
    /// The guard let the navigation through but no route matches
    NotFound { location: Location, hops: usize },
}

impl NavigationOutcome {
    pub fn location(&self) -> &Location {
        match self {
            NavigationOutcome::Arrived { location, .. } | NavigationOutcome::NotFound { location, .. } => location,
        }
    }

    pub fn path(&self) -> &str {
        &self.location().path
    }
}

/// Drives navigations through the guard: follows guard redirects,
/// re-dispatches and route redirects until the target settles, and keeps the
/// resulting history.
pub struct Navigator {
    guard: Arc<RouteAccessGuard>,
    history: Mutex<Vec<String>>,
}

impl Navigator {
    pub fn new(guard: Arc<RouteAccessGuard>) -> Self {
        Self {
            guard,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn guard(&self) -> &Arc<RouteAccessGuard> {
        &self.guard
    }

    /// Visited full paths, oldest first. Replacing navigations overwrite the
    /// last entry.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn current(&self) -> Option<String> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    pub async fn push(&self, target: &str) -> Result<NavigationOutcome, NavigationError> {
        self.navigate(Location::parse(target)).await
    }

    pub async fn replace(&self, target: &str) -> Result<NavigationOutcome, NavigationError> {
        self.navigate(Location::parse(target).replacing()).await
    }

    pub async fn navigate(&self, target: Location) -> Result<NavigationOutcome, NavigationError> {
        let limit = self.guard.config().max_redirects;
        let original = target.full_path();
        let mut location = target;
        let mut hops = 0;

        loop {
            match self.guard.before_each(&location).await {
                NavigationDecision::Proceed => {
                    let Some(resolved) = self.guard.routes().resolve(&location.path) else {
                        self.record(&location);
                        return Ok(NavigationOutcome::NotFound { location, hops });
                    };

                    if let Some(redirect) = resolved.redirect() {
                        let mut next = Location::parse(redirect);
                        next.replace = location.replace;
                        location = next;
                    } else {
                        self.record(&location);
                        let title = self.guard.config().page_title(resolved.title());
                        return Ok(NavigationOutcome::Arrived {
                            location,
                            route: resolved.pattern,
                            title,
                            hops,
                        });
                    }
                }
                NavigationDecision::Redirect(mut next) => {
                    next.replace |= location.replace;
                    location = next;
                }
                NavigationDecision::Redispatch(next) => location = next,
            }

            hops += 1;
            if hops > limit {
                tracing::warn!("navigation to '{}' gave up after {} hops", original, hops);
                return Err(NavigationError::TooManyRedirects { target: original, limit });
            }
        }
    }

    fn record(&self, location: &Location) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if location.replace && !history.is_empty() {
            history.pop();
        }
        history.push(location.full_path());
    }
}
