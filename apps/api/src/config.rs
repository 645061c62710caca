use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: Url,
    pub azure_tenant_id: String,
    pub azure_client_id: String,
    pub azure_client_secret: String,
    pub azure_authority_host: Url,
    pub foundry_agent_endpoint: Url,
    pub vm_api_url: Url,
    pub upstream_timeout: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_base_url: parse_http_url(
                "OPENAI_BASE_URL",
                &optional("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            )?,
            azure_tenant_id: require("AZURE_TENANT_ID")?,
            azure_client_id: require("AZURE_CLIENT_ID")?,
            azure_client_secret: require("AZURE_CLIENT_SECRET")?,
            azure_authority_host: parse_http_url(
                "AZURE_AUTHORITY_HOST",
                &optional("AZURE_AUTHORITY_HOST", DEFAULT_AUTHORITY_HOST),
            )?,
            foundry_agent_endpoint: parse_http_url(
                "FOUNDRY_AGENT_ENDPOINT",
                &require("FOUNDRY_AGENT_ENDPOINT")?,
            )?,
            vm_api_url: parse_http_url("VM_API_URL", &require("VM_API_URL")?)?,
            upstream_timeout: Duration::from_secs(
                optional(
                    "UPSTREAM_TIMEOUT_SECS",
                    &DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string(),
                )
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_upload_bytes: optional("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: optional("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG", "info"),
        })
    }
}

fn parse_http_url(key: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("{key} is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{key} must be an http(s) URL, got scheme '{}'", url.scheme());
    }
    Ok(url)
}
