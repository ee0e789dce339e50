use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, info, warn};

use chat_relay::config::{AllowedOrigins, Config};
use chat_relay::routes::build_app;
use chat_relay::services::openai::OpenAiClient;
use chat_relay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables win anyway.
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(if config.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let provider = OpenAiClient::from_config(&config).context("failed to build provider client")?;

    let port = config.port;
    info!(
        model = %config.chat.model,
        timeout_secs = config.upstream_timeout.as_secs(),
        system_prompt = config.chat.system_prompt.is_some(),
        "provider configured"
    );
    match &config.allowed_origins {
        AllowedOrigins::Any => info!("CORS: allowing any origin"),
        AllowedOrigins::List(origins) => info!("CORS: allowing {}", origins.join(", ")),
    }

    let state = Arc::new(AppState::new(config, Arc::new(provider)));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;

    info!("chat relay running at http://localhost:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!("cannot listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
