//! order-service binary
//!
//! Reads [`ServiceConfig`] from the environment, opens the configured store
//! and serves the REST API until SIGTERM or Ctrl+C.

use order_service::config::ServiceConfig;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_service=info,tower_http=info".into()),
        )
        .init();

    let config = ServiceConfig::load()?;

    tracing::info!(
        store = ?config.store,
        priority_policy = config.priority_policy.as_str(),
        notifier = ?config.notification.kind,
        dispatch = ?config.notification.dispatch,
        "starting order-service"
    );

    let builder = config.server_builder().await?;
    if let Some(bus) = builder.event_bus() {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => tracing::info!(
                        order_id = %envelope.event.order_id(),
                        channel = %envelope.channel,
                        action = envelope.event.action(),
                        "order event"
                    ),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "order event subscriber lagged")
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    builder.serve(&config.addr).await
}
