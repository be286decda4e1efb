use thiserror::Error;

use crate::client::ClientError;

/// Why a session could not be established during navigation
#[derive(Error, Debug)]
pub enum GuardError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("getInfo: roles must be a non-null array!")]
    EmptyRoles,

    #[error("session ended while the profile was loading")]
    SessionEnded,
}

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("navigation to '{target}' exceeded {limit} redirects")]
    TooManyRedirects { target: String, limit: usize },
}
