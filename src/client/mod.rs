//! Auth API client used by the session store and the navigation guard.

pub mod error;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::envelope::{codes, Envelope};
use crate::menu::MenuItem;

pub use error::ClientError;

/// User profile returned by the info endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub introduction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
}

/// Remote auth operations. Only `profile` is required; the navigation guard
/// never calls anything else.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn profile(&self, token: &str) -> Result<Profile, ClientError>;

    async fn login(&self, _username: &str, _password: &str) -> Result<String, ClientError> {
        Err(ClientError::Unsupported("login"))
    }

    async fn logout(&self, _token: &str) -> Result<(), ClientError> {
        Ok(())
    }

    async fn menu_tree(&self, _token: &str) -> Result<Vec<MenuItem>, ClientError> {
        Err(ClientError::Unsupported("menu tree"))
    }
}

/// `reqwest` implementation of [`AuthApi`] talking to the admin API server
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    base: Url,
    http: reqwest::Client,
}

impl HttpAuthApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Decode an envelope and surface non-success codes as errors
    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<Option<T>, ClientError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        let envelope: Envelope<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ClientError::Decode(e)),
            Err(_) => {
                return Err(ClientError::Api {
                    code: i64::from(status.as_u16()) * 100,
                    message: status.canonical_reason().unwrap_or("request failed").to_string(),
                })
            }
        };

        if envelope.code != codes::SUCCESS {
            tracing::debug!("api returned code {}: {}", envelope.code, envelope.message);
            return Err(ClientError::from_code(envelope.code, envelope.message));
        }

        // Failure bodies may carry unrelated data, so only success data is typed
        match envelope.data {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        request.bearer_auth(token).header("X-Token", token)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn profile(&self, token: &str) -> Result<Profile, ClientError> {
        let url = self.endpoint("user/info")?;
        let response = self
            .authorized(self.http.get(url), token)
            .query(&[("token", token)])
            .send()
            .await?;

        Self::read::<Profile>(response).await?.ok_or(ClientError::MissingData)
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let url = self.endpoint("user/login")?;
        let body = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.http.post(url).json(&body).send().await?;

        Self::read::<LoginData>(response)
            .await?
            .map(|data| data.token)
            .ok_or(ClientError::MissingData)
    }

    async fn logout(&self, token: &str) -> Result<(), ClientError> {
        let url = self.endpoint("user/logout")?;
        let response = self.authorized(self.http.post(url), token).send().await?;
        Self::read::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn menu_tree(&self, token: &str) -> Result<Vec<MenuItem>, ClientError> {
        let url = self.endpoint("menus/tree")?;
        let response = self.authorized(self.http.get(url), token).send().await?;
        Ok(Self::read::<Vec<MenuItem>>(response).await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let api = HttpAuthApi::new("http://localhost:3000/api", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url().as_str(), "http://localhost:3000/api/");
        assert_eq!(api.endpoint("/user/info").unwrap().as_str(), "http://localhost:3000/api/user/info");
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            HttpAuthApi::new("not a url", Duration::from_secs(1)),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
