pub mod access;
pub mod error;
pub mod feedback;
pub mod location;
pub mod navigator;

pub use access::{NavigationDecision, RouteAccessGuard};
pub use error::{GuardError, NavigationError};
pub use feedback::{MessageLog, NavigationProgress, Notifier, ProgressIndicator, ProgressSpan, TracingNotifier};
pub use location::Location;
pub use navigator::{NavigationOutcome, Navigator};
