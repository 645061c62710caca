mod agent;
mod chat;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod vm;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::token::{ClientCredentials, TokenProvider};
use crate::agent::AgentClient;
use crate::chat::service::ChatService;
use crate::config::Config;
use crate::llm_client::OpenAiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vm::VmClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume assistant v{}", env!("CARGO_PKG_VERSION"));

    // One pooled HTTP client for every upstream; each call is bounded by the timeout
    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    info!("Upstream timeout: {}s", config.upstream_timeout.as_secs());

    let completion = OpenAiClient::new(
        http.clone(),
        &config.openai_base_url,
        config.openai_api_key.clone(),
    );
    info!("Completion API client initialized ({})", config.openai_base_url);

    let tokens = TokenProvider::new(
        http.clone(),
        config.azure_authority_host.clone(),
        ClientCredentials {
            tenant_id: config.azure_tenant_id.clone(),
            client_id: config.azure_client_id.clone(),
            client_secret: config.azure_client_secret.clone(),
        },
    );
    let agent = AgentClient::new(http.clone(), config.foundry_agent_endpoint.clone(), tokens);
    info!("Hosted agent client initialized");

    let vm = VmClient::new(http, config.vm_api_url.clone());
    info!("VM passthrough targeting {}", config.vm_api_url);

    let state = AppState {
        chat: ChatService::new(Arc::new(completion), Arc::new(agent)),
        vm,
        max_upload_bytes: config.max_upload_bytes,
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
