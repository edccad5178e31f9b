//! ServerBuilder for fluent API to build the HTTP server

use super::exposure::RestExposure;
use super::handlers::AppState;
use crate::core::events::EventBus;
use crate::core::notify::{LogNotifier, Notifier};
use crate::core::service::{DispatchMode, OrderService};
use crate::core::store::OrderStore;
use crate::core::validation::RequestValidator;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the order HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryOrderStore::default())
///     .with_notifier(LogNotifier::new("whatsapp"))
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn OrderStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    dispatch: DispatchMode,
    validator: RequestValidator,
    seed_endpoint: bool,
    custom_routes: Vec<Router>,
    event_bus: Option<EventBus>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            notifier: None,
            dispatch: DispatchMode::default(),
            validator: RequestValidator::new(),
            seed_endpoint: false,
            custom_routes: Vec::new(),
            event_bus: None,
        }
    }

    /// Set the order store (required)
    pub fn with_store(self, store: impl OrderStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    pub fn with_shared_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the finish notifier (defaults to a [`LogNotifier`])
    pub fn with_notifier(self, notifier: impl Notifier + 'static) -> Self {
        self.with_shared_notifier(Arc::new(notifier))
    }

    pub fn with_shared_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_validator(mut self, validator: RequestValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Mount `POST /order/test`, which seeds sample orders
    pub fn with_seed_endpoint(mut self, enabled: bool) -> Self {
        self.seed_endpoint = enabled;
        self
    }

    /// Attach the bus an [`EventBusNotifier`](crate::core::notify::EventBusNotifier) publishes on
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Bus carrying finish events, if one was attached
    pub fn event_bus(&self) -> Option<&EventBus> {
        self.event_bus.as_ref()
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the order service without any transport
    pub fn build_service(&self) -> Result<OrderService> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("OrderStore is required. Call .with_store()"))?;
        let notifier = self
            .notifier
            .clone()
            .unwrap_or_else(|| Arc::new(LogNotifier::default()));

        tracing::debug!(
            backend = store.backend(),
            channel = notifier.channel(),
            dispatch = ?self.dispatch,
            "building order service"
        );

        Ok(OrderService::new(store, notifier).with_dispatch(self.dispatch))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let service = self.build_service()?;
        let state = AppState::new(service, self.validator);
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(RestExposure::build_router(
            state,
            self.seed_endpoint,
            custom_routes,
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr`, serves requests and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
