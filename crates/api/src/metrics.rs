// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros
//! and an Axum-compatible metrics handler.

use std::sync::LazyLock;

use axum::{
    http::{StatusCode, header},
    response::Response,
};
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter_vec,
};

/// Total number of listing requests received, labeled by requested state.
pub static REQUESTS_BY_STATE: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "listing_api_requests_total",
        "Total number of listing requests, labeled by requested state",
        &["state"]
    )
    .expect("Failed to create listing_api_requests_total counter vec")
});

/// Histogram for listing query durations in seconds.
pub static LISTING_QUERY_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "listing_api_query_duration",
        "Listing query durations in seconds",
        &["result"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to create listing query duration histogram")
});

/// Increment the requests counter with the requested state label
///
/// # Arguments
/// * `state` - The requested listing state keyword
pub fn inc_requests_by_state(state: &str) {
    REQUESTS_BY_STATE.with_label_values(&[state]).inc();
}

/// Observe the duration of a listing query
///
/// # Arguments
/// * `result` - Whether the query succeeded (`ok`) or failed (`error`)
/// * `duration_secs` - The duration of the query in seconds
pub fn observe_listing_query_duration(result: &str, duration_secs: f64) {
    LISTING_QUERY_DURATION
        .with_label_values(&[result])
        .observe(duration_secs);
}

/// Axum handler that exports metrics in Prometheus text format
///
/// # Panics
///
/// This function will panic if:
/// - The metrics encoder fails to encode the metrics data
/// - The UTF-8 conversion of the encoded buffer fails
/// - The HTTP response builder fails to create the response
pub async fn metrics_handler() -> Response<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(String::from_utf8(buffer).expect("metrics buffer should be valid UTF-8"))
        .expect("Failed to create metrics response")
}
