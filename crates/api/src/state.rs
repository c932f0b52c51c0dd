// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the listing API server,
//! including configuration, the listing resolution service, and coordinated
//! cancellation. The listing store is injected at construction so tests can
//! substitute fakes for the PostgreSQL implementation.

use std::sync::Arc;

use listings::{ListingService, ListingStore};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::config::{Environment, ServerConfig};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Listing resolution service over the injected store
    listing_service: ListingService,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `store` - Listing store backing the resolution service
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn ListingStore>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            listing_service: ListingService::new(store),
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Listing resolution service
    pub fn listing_service(&self) -> &ListingService {
        &self.listing_service
    }

    /// Perform health check operations
    pub async fn health_check(&self) -> HealthCheck {
        let database = match self.listing_service.ping().await {
            Ok(()) => HealthStatus::Up,
            Err(e) => HealthStatus::Down {
                reason: e.to_string().into_boxed_str(),
            },
        };

        let status = match database {
            HealthStatus::Up => HealthStatus::Up,
            HealthStatus::Down { .. } | HealthStatus::Degraded { .. } => HealthStatus::Degraded {
                reason: Box::from("listing database unreachable"),
            },
        };

        HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            database,
        }
    }
}

/// Health status of a service or dependency
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational and responding normally
    Up,

    /// Service is not operational or has critical failures
    Down {
        /// Human-readable explanation of why the service is down
        reason: Box<str>,
    },

    /// Service is operational but experiencing performance issues or partial failures
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Reachability of the listing database
    pub database: HealthStatus,
}
