#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_admin-panel-rust"));
        cmd.env("ADMIN_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env_remove("API_SEED_FILE")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Log in with the seeded password and return the issued token
pub async fn login(server: &TestServer, username: &str) -> Result<String> {
    let body: Value = reqwest::Client::new()
        .post(server.url("/user/login"))
        .json(&json!({ "username": username, "password": "111111" }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["code"], 20000, "login failed: {}", body);
    body["data"]["token"]
        .as_str()
        .map(str::to_string)
        .context("login response without token")
}

/// GET with a bearer token, returning the status and the decoded envelope
pub async fn get_with_token(server: &TestServer, path: &str, token: &str) -> Result<(StatusCode, Value)> {
    let res = reqwest::Client::new()
        .get(server.url(path))
        .bearer_auth(token)
        .send()
        .await?;
    let status = res.status();
    Ok((status, res.json().await?))
}
