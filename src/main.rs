// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_utils;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::application::disease_provider::LastDays;
use crate::application::sinks::{DisabledNotifier, Notifier};
use crate::application::statistics_service::StatisticsService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::disease_sh_client::DiseaseShClient;
use crate::infrastructure::trace_file::JsonLinesTraceSink;
use crate::infrastructure::webhook_notifier::WebhookNotifier;
use crate::presentation::app_state::{AppState, QueryDefaults};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "disease_dashboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = load_app_config()?;
    let last_days = config
        .defaults
        .last_days
        .parse::<LastDays>()
        .map_err(anyhow::Error::msg)
        .context("Invalid defaults.last_days")?;

    // One pooled client shared by the provider and the webhook
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.provider.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    // Create adapters (infrastructure layer)
    let provider = Arc::new(DiseaseShClient::with_client(
        http_client.clone(),
        &config.provider.base_url,
    ));
    let trace_sink = Arc::new(JsonLinesTraceSink::new(&config.trace.file));
    let notifier: Arc<dyn Notifier> = match WebhookNotifier::new(&config.webhook, http_client) {
        Some(webhook) => Arc::new(webhook),
        None => Arc::new(DisabledNotifier),
    };

    // Create services (application layer)
    let statistics_service = StatisticsService::new(provider, trace_sink, notifier);

    // Create application state
    let state = Arc::new(AppState {
        statistics_service,
        defaults: QueryDefaults {
            last_days,
            top_n: config.defaults.top_n,
        },
    });

    // Build router (presentation layer)
    let router = presentation::router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server.bind address {}", config.server.bind))?;
    tracing::info!(%addr, provider = %config.provider.base_url, "Starting disease-dashboard service");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
