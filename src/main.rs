//! agentwire - terminal client
//!
//! Reads messages from stdin, streams each answer from the producer and
//! renders reasoning plus content as it arrives.

use agentwire::config::ClientConfig;
use agentwire::conversation::{Conversation, TurnTicket};
use agentwire::render::{render_sealed, TerminalRenderer};
use agentwire::transport::{run_turn, HttpTransport};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they do not interleave with the answer
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agentwire=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    let transport = Arc::new(HttpTransport::new(&config)?);
    let show_reasoning = Arc::new(AtomicBool::new(config.show_reasoning));
    let conversation = Conversation::new();

    tracing::info!(api_url = %transport.base_url(), "Client starting");
    emit(&format!(
        "Connected to {}. Commands: /clear /history /reasoning /health exit\n",
        transport.base_url()
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                // First interrupt abandons the in-flight answer, second exits
                if conversation.abandon_active().is_some() {
                    emit("\n[interrupted]\n");
                    continue;
                }
                break;
            }
        };
        let Some(line) = line else { break };
        let input = line.trim();

        match input {
            "" => {}
            "exit" | "quit" => break,
            "/clear" => {
                conversation.clear();
                emit("Conversation cleared\n");
            }
            "/history" => {
                let history = conversation.history();
                emit(&format!("{} turn(s)\n", history.len()));
                let show = show_reasoning.load(Ordering::Relaxed);
                for snapshot in &history {
                    emit(&render_sealed(snapshot, show));
                }
            }
            "/reasoning" => {
                let show = !show_reasoning.fetch_xor(true, Ordering::Relaxed);
                emit(&format!(
                    "Reasoning display {}\n",
                    if show { "on" } else { "off" }
                ));
            }
            "/health" => match transport.health().await {
                Ok(health) => emit(&format!("{}: {}\n", health.service, health.status)),
                Err(e) => emit(&format!("Health check failed: {e}\n")),
            },
            message => match conversation.submit(message) {
                Ok(ticket) => spawn_turn(
                    &conversation,
                    &transport,
                    ticket,
                    &config,
                    show_reasoning.load(Ordering::Relaxed),
                ),
                Err(e) => emit(&format!("{e}\n")),
            },
        }
    }

    conversation.abandon_active();
    Ok(())
}

/// Drive one turn in the background and render its snapshots as they land.
fn spawn_turn(
    conversation: &Conversation,
    transport: &Arc<HttpTransport>,
    ticket: TurnTicket,
    config: &ClientConfig,
    show_reasoning: bool,
) {
    let mut snapshots = ticket.subscribe();
    let render = tokio::spawn(async move {
        let mut renderer = TerminalRenderer::new(show_reasoning);
        loop {
            let snapshot = snapshots.borrow_and_update().clone();
            emit(&renderer.update(&snapshot));
            if snapshot.sealed || snapshots.changed().await.is_err() {
                break;
            }
        }
    });

    let conversation = conversation.clone();
    let transport = Arc::clone(transport);
    let stall_timeout = config.stall_timeout;
    tokio::spawn(async move {
        let outcome = run_turn(&transport, ticket, stall_timeout).await;
        if let Err(e) = render.await {
            tracing::warn!(error = %e, "Render task failed");
        }
        conversation.finish(outcome);
    });
}

fn emit(text: &str) {
    if text.is_empty() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
        tracing::warn!(error = %e, "Failed to write to stdout");
    }
}
