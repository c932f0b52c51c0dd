// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides HTTP request handlers for the listing API server:
//! the liveness ping, the listing state endpoint, and the health check.
//! Handlers are the sole translation point from internal errors to HTTP
//! status codes and the JSON error envelope.

use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use listings::ListingState;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    error::ServerError,
    metrics,
    state::{HealthCheck, ServerState},
};

/// Metrics label for a requested state keyword
///
/// Unrecognized keywords collapse to a single `invalid` label so caller
/// input cannot grow the label set without bound.
fn state_metric_label(state: &str) -> &'static str {
    ListingState::parse(state).map_or("invalid", ListingState::as_str)
}

/// Liveness probe response
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    /// Fixed acknowledgement value
    #[schema(example = "pong")]
    pub status: &'static str,
}

/// Liveness probe
///
/// Responds regardless of database availability.
#[utoipa::path(
    get,
    path = "/api/v1/ping",
    tag = "health",
    summary = "Liveness probe",
    description = "Returns a fixed acknowledgement without touching any dependency.",
    responses(
        (status = 200, description = "Service is alive", body = PingResponse)
    )
)]
pub async fn ping_handler() -> Json<PingResponse> {
    Json(PingResponse { status: "pong" })
}

/// Listings by state
///
/// Resolves the listings matching the requested state keyword. `active`
/// is currently the only recognized state: listings with no matching sold
/// or delisted event.
///
/// # Errors
///
/// Returns 400 for an unrecognized state keyword, 500 if the query or
/// response encoding fails.
#[utoipa::path(
    get,
    path = "/api/v1/listing/{state}",
    tag = "listings",
    summary = "Listings by state",
    description = "Returns every listing event matching the requested state keyword as a JSON array. Zero matches yield an empty array.",
    params(
        ("state" = String, Path, description = "Listing state keyword, case-sensitive; currently `active`")
    ),
    responses(
        (status = 200, description = "Matching listing events", body = Vec<listings::ListingEvent>),
        (status = 400, description = "Unrecognized state keyword", body = String),
        (status = 500, description = "Query or encoding failure", body = String)
    )
)]
pub async fn listings_handler(
    State(state): State<ServerState>,
    Path(listing_state): Path<String>,
) -> Result<Response, ServerError> {
    metrics::inc_requests_by_state(state_metric_label(&listing_state));

    let started = Instant::now();
    let result = state.listing_service().fetch_listings(&listing_state).await;
    let label = if result.is_ok() { "ok" } else { "error" };
    metrics::observe_listing_query_duration(label, started.elapsed().as_secs_f64());

    let listings = result?;

    // Serialize explicitly so an encoding failure maps to the 500 envelope
    let body = serde_json::to_string(&listings).map_err(|e| {
        error!(error = %e, "failed to encode listing response");
        ServerError::Serialization {
            message: e.to_string(),
        }
    })?;

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response())
}

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the current health status of the API service including version, environment information, and listing database reachability.",
    responses(
        (status = 200, description = "Health report", body = HealthCheck)
    )
)]
pub async fn health_handler(State(state): State<ServerState>) -> Json<HealthCheck> {
    Json(state.health_check().await)
}
