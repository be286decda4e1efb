use thiserror::Error;

use crate::envelope::codes;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with a non-success business code
    #[error("{message}")]
    Api { code: i64, message: String },

    /// The server answered with one of the session-invalid codes
    #[error("{message}")]
    SessionInvalid { code: i64, message: String },

    /// Success envelope without the expected `data`
    #[error("Verification failed, please Login again.")]
    MissingData,

    #[error("{0} is not supported by this client")]
    Unsupported(&'static str),
}

impl ClientError {
    /// Classify a non-success envelope code
    pub fn from_code(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if codes::is_session_invalid(code) {
            ClientError::SessionInvalid { code, message }
        } else {
            ClientError::Api { code, message }
        }
    }

    pub fn is_session_invalid(&self) -> bool {
        matches!(self, ClientError::SessionInvalid { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_codes() {
        assert!(ClientError::from_code(50008, "Illegal token").is_session_invalid());
        assert!(ClientError::from_code(50014, "Token expired").is_session_invalid());
        let other = ClientError::from_code(60204, "Account and password are incorrect.");
        assert!(!other.is_session_invalid());
        assert_eq!(other.to_string(), "Account and password are incorrect.");
    }
}
