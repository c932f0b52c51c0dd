// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server implementation module
//!
//! This module provides the main server struct and implementation for the
//! listing API server, including server lifecycle management, router
//! configuration, and coordinated graceful shutdown using
//! `CancellationToken`. The database pool is opened during assembly and
//! drained once the serve loop exits.

use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, http::HeaderName};
use hyper::Request;
use listings::{ListingStore, PgListingStore, PgPool, db};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, warn};

use crate::{
    config::ServerConfig,
    error::{ServerError, ServerResult},
    routes::create_routes,
    state::ServerState,
};

// Server constants
const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
const DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECONDS: u64 = 5;
const DEFAULT_FORCE_SHUTDOWN_TIMEOUT_SECONDS: u64 = 5;

/// Configuration for server shutdown behavior
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// Maximum time to wait for graceful shutdown before forcing termination
    pub graceful_timeout: Duration,
    /// Maximum time to wait for all tasks to complete after graceful shutdown
    pub force_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            graceful_timeout: Duration::from_secs(DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECONDS),
            force_timeout: Duration::from_secs(DEFAULT_FORCE_SHUTDOWN_TIMEOUT_SECONDS),
        }
    }
}

/// Main server struct
#[derive(Debug)]
pub struct Server {
    /// Server configuration
    config: ServerConfig,
    /// Application router
    router: Router,
    /// Server state
    state: ServerState,
    /// Cancellation token for coordinated shutdown
    cancellation_token: CancellationToken,
    /// Configuration for coordinated shutdown
    graceful_shutdown_config: ShutdownConfig,
    /// Database pool, present when this process owns the connection
    pool: Option<PgPool>,
}

impl Server {
    /// Create new server instance backed by the configured database
    ///
    /// Connects the pool eagerly; an unreachable database is fatal here
    /// rather than on the first request.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the configuration is invalid, or
    /// `ServerError::Database` if the pool cannot be established.
    pub async fn new(config: ServerConfig, shutdown_config: ShutdownConfig) -> ServerResult<Self> {
        let pool = db::connect(&config.database)
            .await
            .map_err(|source| ServerError::Database { source })?;
        let store = Arc::new(PgListingStore::new(pool.clone()));
        Self::assemble(config, shutdown_config, store, Some(pool))
    }

    /// Create server with an injected listing store
    ///
    /// Used by tests to substitute the PostgreSQL store with a fake. No
    /// database connection is opened.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the configuration is invalid.
    pub fn with_listing_store(
        config: ServerConfig,
        shutdown_config: ShutdownConfig,
        store: Arc<dyn ListingStore>,
    ) -> ServerResult<Self> {
        Self::assemble(config, shutdown_config, store, None)
    }

    fn assemble(
        config: ServerConfig,
        graceful_shutdown_config: ShutdownConfig,
        store: Arc<dyn ListingStore>,
        pool: Option<PgPool>,
    ) -> ServerResult<Self> {
        let cancellation_token = CancellationToken::new();
        let state = ServerState::new(config.clone(), store, cancellation_token.child_token());
        let router = Self::create_router(state.clone());

        Ok(Self {
            config,
            router,
            state,
            cancellation_token,
            graceful_shutdown_config,
            pool,
        })
    }

    /// Create application router with middleware
    fn create_router(state: ServerState) -> Router {
        let timeout_duration = state.config().timeout_seconds.value();

        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                    if let Some(request_id) = req.headers().get(REQUEST_ID_HEADER) {
                        info_span!("http_request", ?request_id)
                    } else {
                        tracing::error!("failed to extract id from request");
                        info_span!("http_request", request_id = "unknown")
                    }
                }),
            )
            .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(timeout_duration));

        create_routes().layer(middleware).with_state(state)
    }

    /// Run the server with coordinated graceful shutdown
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if unable to bind to the configured address,
    /// or `ServerError::Startup` if the server fails to start.
    pub async fn run(self) -> ServerResult<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                address: addr,
                source,
            })?;

        let shutdown_token = self.cancellation_token.clone();
        tokio::spawn(async move {
            info!("spawning the graceful shutdown task");
            Self::shutdown_signal_handler(shutdown_token).await;
        });

        self.serve(listener).await
    }

    /// Serve connections until cancelled, bounding the drain period
    ///
    /// After cancellation, in-flight requests get `graceful_timeout` to
    /// complete; past that deadline the serve loop is dropped and remaining
    /// connections are forced closed. Pool closure is bounded by
    /// `force_timeout` so shutdown cannot hang on connection teardown.
    async fn serve(self, listener: TcpListener) -> ServerResult<()> {
        let actual_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Startup { source })?;

        info!(
            address = %actual_addr,
            environment = %self.config.environment,
            "listing API server starting",
        );

        let cancellation_token = self.cancellation_token.clone();
        let drain_token = cancellation_token.clone();
        let graceful_timeout = self.graceful_shutdown_config.graceful_timeout;

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                drain_token.cancelled().await;
                info!("listing API server draining in-flight requests");
            })
            .into_future();
        tokio::pin!(serve);

        let server_result = tokio::select! {
            result = &mut serve => {
                if result.is_ok() {
                    info!("listing API server shut down gracefully");
                }
                result
            },
            () = async {
                cancellation_token.cancelled().await;
                tokio::time::sleep(graceful_timeout).await;
            } => {
                warn!(
                    grace_seconds = graceful_timeout.as_secs(),
                    "drain deadline exceeded, forcing connections closed"
                );
                Ok(())
            }
        };

        if let Some(pool) = self.pool {
            let force_timeout = self.graceful_shutdown_config.force_timeout;
            if tokio::time::timeout(force_timeout, pool.close()).await.is_ok() {
                info!("database pool closed");
            } else {
                warn!("database pool did not close within the force timeout");
            }
        }

        if let Err(e) = server_result {
            error!(error = ?e, "Server error during shutdown");
            Err(ServerError::Shutdown { source: e })
        } else {
            Ok(())
        }
    }

    /// Handle shutdown signals and trigger coordinated cancellation
    ///
    /// This function listens for SIGINT (Ctrl+C) and SIGTERM signals,
    /// and cancels the provided cancellation token when received.
    ///
    /// # Arguments
    ///
    /// * `cancellation_token` - Token to cancel when shutdown signal is received
    async fn shutdown_signal_handler(cancellation_token: CancellationToken) {
        let signal_received = async {
            #[cfg(unix)]
            #[allow(clippy::expect_used)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let mut sigterm =
                    signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
                let mut sigint =
                    signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

                tokio::select! {
                    _ = sigterm.recv() => {
                        warn!("Received SIGTERM signal, initiating coordinated shutdown");
                        "SIGTERM"
                    },
                    _ = sigint.recv() => {
                        warn!("Received SIGINT signal, initiating coordinated shutdown");
                        "SIGINT"
                    },
                }
            }

            #[cfg(not(unix))]
            #[allow(clippy::expect_used)]
            {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install CTRL+C signal handler");
                warn!("Received CTRL+C signal, initiating coordinated shutdown");
                "CTRL+C"
            }
        };

        // Wait for either a signal or existing cancellation
        tokio::select! {
            signal_name = signal_received => {
                warn!("Shutdown signal {} received, cancelling all operations...", signal_name);
                cancellation_token.cancel();
            },
            () = cancellation_token.cancelled() => {
                warn!("Cancellation token already cancelled, shutdown signal handler exiting");
            }
        }
    }

    /// Returns a clone of the cancellation token for coordinated shutdown
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Initiates graceful shutdown by cancelling the server's cancellation token
    pub fn shutdown(&self) {
        info!("programmatic shutdown requested");
        self.cancellation_token.cancel();
    }

    /// Run server for testing, returns the bound address
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if unable to bind to the configured address.
    pub async fn run_for_testing(self) -> ServerResult<(SocketAddr, CancellationToken)> {
        let addr = self.config.socket_addr();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                address: addr,
                source,
            })?;

        let actual_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Startup { source })?;

        let token = self.cancellation_token.clone();
        tokio::spawn(async move {
            let _ = self.serve(listener).await;
        });

        Ok((actual_addr, token))
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get server state for testing
    pub fn state(&self) -> &ServerState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use listings::{ListingError, ListingEvent};

    use super::*;
    use crate::config::Environment;

    #[derive(Debug)]
    struct EmptyStore;

    #[async_trait]
    impl ListingStore for EmptyStore {
        async fn fetch_active(&self) -> Result<Vec<ListingEvent>, ListingError> {
            Ok(vec![])
        }

        async fn ping(&self) -> Result<(), ListingError> {
            Ok(())
        }
    }

    fn test_server() -> ServerResult<Server> {
        Server::with_listing_store(
            ServerConfig::for_testing(),
            ShutdownConfig::default(),
            Arc::new(EmptyStore),
        )
    }

    #[tokio::test]
    async fn server_creation() -> ServerResult<()> {
        let server = test_server()?;
        assert_eq!(server.config().environment, Environment::Testing);
        assert!(!server.cancellation_token().is_cancelled());
        Ok(())
    }

    #[tokio::test]
    async fn programmatic_shutdown() -> ServerResult<()> {
        let server = test_server()?;

        assert!(!server.cancellation_token().is_cancelled());

        server.shutdown();

        assert!(server.cancellation_token().is_cancelled());
        Ok(())
    }

    #[derive(Debug)]
    struct SlowStore;

    #[async_trait]
    impl ListingStore for SlowStore {
        async fn fetch_active(&self) -> Result<Vec<ListingEvent>, ListingError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![])
        }

        async fn ping(&self) -> Result<(), ListingError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn slow_requests_do_not_delay_shutdown_past_grace_period() -> ServerResult<()> {
        let shutdown_config = ShutdownConfig {
            graceful_timeout: Duration::from_millis(200),
            force_timeout: Duration::from_millis(200),
        };
        let server = Server::with_listing_store(
            ServerConfig::for_testing(),
            shutdown_config,
            Arc::new(SlowStore),
        )?;
        let token = server.cancellation_token();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|source| ServerError::Startup { source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| ServerError::Startup { source })?;
        let serve_task = tokio::spawn(server.serve(listener));

        // Park a request in the slow store, then cancel mid-flight
        let in_flight = tokio::spawn(async move {
            let _ = reqwest::get(format!("http://{addr}/api/v1/listing/active")).await;
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let cancelled_at = std::time::Instant::now();
        token.cancel();
        serve_task
            .await
            .map_err(|_| ServerError::Config {
                message: "serve task panicked".to_string(),
            })??;

        assert!(
            cancelled_at.elapsed() < Duration::from_secs(2),
            "shutdown blocked on an in-flight request"
        );
        in_flight.abort();
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_config_default() {
        let config = ShutdownConfig::default();
        assert_eq!(
            config.graceful_timeout,
            Duration::from_secs(DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECONDS)
        );
        assert_eq!(
            config.force_timeout,
            Duration::from_secs(DEFAULT_FORCE_SHUTDOWN_TIMEOUT_SECONDS)
        );
    }
}
