use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3773;

/// HTTP client for the bridge control plane.
///
/// Every call is bounded by a short timeout; callers treat failures
/// as warnings and keep going, since bridge unavailability must never
/// abort initialization.
pub struct BridgeClient {
    base: String,
    http: reqwest::Client,
}

impl BridgeClient {
    pub fn new(port: u16) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .context("failed to build bridge http client")?;
        Ok(Self {
            base: format!("http://127.0.0.1:{port}"),
            http,
        })
    }

    /// Check whether the bridge answers at all.
    pub async fn probe(&self) -> Result<String> {
        self.get("/", &[]).await
    }

    /// Ask the bridge to realize `count` panes labeled in role order.
    pub async fn setup(&self, count: usize, roles: &[String]) -> Result<String> {
        self.get(
            "/setup",
            &[("count", count.to_string()), ("roles", roles.join(","))],
        )
        .await
    }

    /// Record the layout on the bridge without arranging panes.
    pub async fn config(&self, count: usize, roles: &[String]) -> Result<String> {
        self.get(
            "/config",
            &[("count", count.to_string()), ("roles", roles.join(","))],
        )
        .await
    }

    pub async fn focus(&self, index: usize) -> Result<String> {
        self.get("/focus", &[("index", index.to_string())]).await
    }

    pub async fn send(&self, terminal: usize, text: &str) -> Result<String> {
        self.get(
            "/send",
            &[("terminal", terminal.to_string()), ("text", text.to_string())],
        )
        .await
    }

    pub async fn notify(&self, terminal: usize, message: &str) -> Result<String> {
        self.get(
            "/notify",
            &[
                ("terminal", terminal.to_string()),
                ("message", message.to_string()),
            ],
        )
        .await
    }

    pub async fn list(&self) -> Result<String> {
        self.get("/list", &[]).await
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{path}", self.base);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("bridge not responding at {url}"))?
            .error_for_status()
            .with_context(|| format!("bridge rejected {path}"))?;
        resp.text().await.context("failed to read bridge reply")
    }
}
