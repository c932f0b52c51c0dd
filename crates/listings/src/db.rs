// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Connection pool construction
//!
//! The pool is built once during server assembly and handed down by value;
//! there is no process-global connection state. `PgPool` is internally
//! reference counted, so clones share the same bounded pool and
//! [`sqlx::PgPool::close`] drains it during shutdown.

use std::time::Duration;

use serde::{Deserialize, Serialize};
pub use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::error::ListingError;

/// Pool limits and connection string for the listing database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string (required)
    pub url: String,
    /// Upper bound on open connections
    pub max_connections: u32,
    /// Connections kept warm while idle
    pub min_connections: u32,
    /// Seconds before an idle connection is reaped
    pub idle_timeout_seconds: u64,
    /// Seconds before a connection is recycled regardless of use
    pub max_lifetime_seconds: u64,
    /// Seconds a request may wait for a pooled connection
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 25,
            min_connections: 10,
            idle_timeout_seconds: 600,
            max_lifetime_seconds: 1800,
            acquire_timeout_seconds: 10,
        }
    }
}

/// Open a bounded connection pool against the listing database
///
/// Connects eagerly so an unreachable database fails startup instead of the
/// first request.
///
/// # Errors
///
/// Returns [`ListingError::Database`] if the connection cannot be
/// established.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, ListingError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "connected to listing database"
    );

    Ok(pool)
}
