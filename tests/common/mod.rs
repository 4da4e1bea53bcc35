#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use meta_catalog_api::auth::{generate_jwt, Claims};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

pub const TEST_SECRET: &str = "integration-test-secret";

/// One server process per test so every test starts from an empty
/// in-memory catalog. The process is killed when the handle drops.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_meta-catalog-api"));
        cmd.args(["serve", "--port", &port.to_string()])
            .env("APP_ENV", "development")
            .env("CATALOG_API_HOST", "127.0.0.1")
            .env("DATABASE_URL", "")
            .env("SECURITY_JWT_SECRET", TEST_SECRET)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            client: Client::new(),
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let url = self.url("/health");
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(&url).send().await {
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

    pub fn token(&self) -> String {
        generate_jwt(&Claims::new("curator", 1).expect("claims"), TEST_SECRET).expect("test token")
    }

    /// Request builder carrying a valid bearer token
    pub fn authed(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(self.token())
    }

    pub async fn get_json(&self, path: &str) -> Result<(StatusCode, Value)> {
        send_json(self.client.get(self.url(path))).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Sends the request and decodes the body as JSON (null when empty)
pub async fn send_json(request: RequestBuilder) -> Result<(StatusCode, Value)> {
    let resp = request.send().await?;
    let status = resp.status();
    let bytes = resp.bytes().await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("response body is not JSON")?
    };
    Ok((status, body))
}
