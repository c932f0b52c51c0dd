// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Marketplace Listing API Server Implementation
//!
//! This crate provides the main HTTP server for the marketplace listing API,
//! built with Axum and designed for production use with comprehensive
//! configuration, middleware, and graceful shutdown capabilities.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Error types and HTTP response handling with proper status codes
//! - [`state`]: Shared application state with the injected listing store
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`metrics`]: Prometheus metrics and the text-format export endpoint
//! - [`docs`]: `OpenAPI` document aggregation and the Swagger UI page
//!
//! # Key Features
//!
//! - **Anti-join listing resolution**: Serves "active" listings computed against
//!   the indexer-populated event tables via the `listings` crate
//! - **Graceful Shutdown**: Coordinated termination using `CancellationToken`
//!   with a bounded drain period and database pool closure
//! - **Dependency Injection**: The listing store is constructor-injected so
//!   tests run against fakes without a live database
//! - **Health Monitoring**: Liveness ping plus a health report covering
//!   database reachability
//! - **Comprehensive Middleware**: Request tracing, CORS, per-request timeouts

pub mod config;
pub mod docs;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use state::{HealthCheck, ServerState};
