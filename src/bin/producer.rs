//! Demo producer server

use agentwire::producer::{create_router, ProducerConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agentwire=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ProducerConfig::from_env();
    tracing::info!(
        char_delay_ms = config.char_delay.as_millis(),
        step_delay_ms = config.step_delay.as_millis(),
        redeliver = config.redeliver,
        abort_after_chars = ?config.abort_after_chars,
        "Producer configured"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Producer listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(config)).await?;

    Ok(())
}
