use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Global navigation progress indicator
pub trait ProgressIndicator: Send + Sync {
    fn start(&self);
    fn done(&self);
}

/// Started progress that is marked done when dropped, including when the
/// navigation future holding it is dropped before it completes
pub struct ProgressSpan<'a> {
    indicator: &'a dyn ProgressIndicator,
}

impl<'a> ProgressSpan<'a> {
    pub fn start(indicator: &'a dyn ProgressIndicator) -> Self {
        indicator.start();
        Self { indicator }
    }
}

impl Drop for ProgressSpan<'_> {
    fn drop(&mut self) {
        self.indicator.done();
    }
}

/// Progress indicator that counts navigations in flight
#[derive(Debug, Default)]
pub struct NavigationProgress {
    in_flight: AtomicUsize,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl NavigationProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any navigation is still being evaluated
    pub fn is_active(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ProgressIndicator for NavigationProgress {
    fn start(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);
        tracing::trace!("navigation progress started");
    }

    fn done(&self) {
        // An unmatched done never underflows
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        self.finished.fetch_add(1, Ordering::SeqCst);
        tracing::trace!("navigation progress done");
    }
}

/// Transient user-facing notifications
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Notifier that keeps every message, for display after the fact
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Mutex<Vec<String>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for MessageLog {
    fn error(&self, message: &str) {
        tracing::warn!("{}", message);
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_navigations_keep_progress_active() {
        let progress = NavigationProgress::new();
        progress.start();
        progress.start();
        progress.done();
        assert!(progress.is_active());

        progress.done();
        assert!(!progress.is_active());
        assert_eq!(progress.started(), 2);
        assert_eq!(progress.finished(), 2);
    }

    #[test]
    fn span_finishes_on_drop() {
        let progress = NavigationProgress::new();
        {
            let _span = ProgressSpan::start(&progress);
            assert!(progress.is_active());
        }
        assert!(!progress.is_active());
        assert_eq!(progress.finished(), 1);
    }

    #[test]
    fn unmatched_done_does_not_underflow() {
        let progress = NavigationProgress::new();
        progress.done();
        progress.start();
        assert!(progress.is_active());
    }
}
