//! Response envelope shared by the API server and the auth client.
//!
//! Every response body has the shape
//! `{ code, message, data?, timestamp, path?, method? }`. `code` is a
//! business code, not the HTTP status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod codes {
    pub const SUCCESS: i64 = 20000;

    pub const BAD_REQUEST: i64 = 40000;
    pub const UNAUTHORIZED: i64 = 40100;
    pub const FORBIDDEN: i64 = 40300;
    pub const NOT_FOUND: i64 = 40400;
    pub const CONFLICT: i64 = 40900;
    pub const TOO_MANY_REQUESTS: i64 = 42900;
    pub const INTERNAL: i64 = 50000;

    // Session-invalid codes: the client must drop its token
    pub const ILLEGAL_TOKEN: i64 = 50008;
    pub const OTHER_CLIENT_LOGGED_IN: i64 = 50012;
    pub const TOKEN_EXPIRED: i64 = 50014;

    pub const BAD_CREDENTIALS: i64 = 60204;

    pub fn is_session_invalid(code: i64) -> bool {
        matches!(code, ILLEGAL_TOKEN | OTHER_CLIENT_LOGGED_IN | TOKEN_EXPIRED)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: codes::SUCCESS,
            message: "success".to_string(),
            data: Some(data),
            timestamp: Utc::now(),
            path: None,
            method: None,
        }
    }

    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            timestamp: Utc::now(),
            path: None,
            method: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == codes::SUCCESS
    }

    pub fn is_session_invalid(&self) -> bool {
        codes::is_session_invalid(self.code)
    }
}
