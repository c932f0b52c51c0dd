// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the listing
//! API server. The versioned marketplace endpoints live under `/api/v1`;
//! health, metrics, and documentation endpoints sit at the root for
//! monitoring tooling.

pub mod handlers;

use axum::{Router, routing::get};
use handlers::{health_handler, listings_handler, ping_handler};

use crate::{
    docs::{openapi_spec, swagger_ui},
    metrics::metrics_handler,
    state::ServerState,
};

/// Create application routes
pub fn create_routes() -> Router<ServerState> {
    // Health and metrics endpoints stay unversioned for monitoring purposes
    let health_routes = Router::new().route("/health", get(health_handler));
    let metrics_routes = Router::new().route("/metrics", get(metrics_handler));

    // Documentation endpoints
    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui));

    let api_routes = Router::new()
        .route("/ping", get(ping_handler))
        .route("/listing/{state}", get(listings_handler));

    Router::new()
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(docs_routes)
        .nest("/api/v1", api_routes)
}
