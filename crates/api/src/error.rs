// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! This module provides error types for server operations and the single
//! translation point from internal errors to HTTP status codes. Responses
//! carry the JSON envelope `{"error": "<message>"}`.
//!
//! Invalid caller input maps to 400; data-access and encoding failures map
//! to 500. The upstream service this replaces reported query failures as
//! 400, conflating client and server fault; that classification was a bug
//! and is not preserved.

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use listings::ListingError;
use thiserror::Error;

/// Comprehensive error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Input validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Listing data access errors
    #[error("Data access error: {source}")]
    Database {
        /// Underlying repository error
        #[source]
        source: ListingError,
    },

    /// Response encoding errors
    #[error("Encoding error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status code this error translates to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(..) => StatusCode::BAD_REQUEST,
            Self::Config { .. }
            | Self::Bind { .. }
            | Self::Startup { .. }
            | Self::Shutdown { .. }
            | Self::Database { .. }
            | Self::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ListingError> for ServerError {
    fn from(source: ListingError) -> Self {
        match source {
            ListingError::InvalidState(_) => Self::ValidationError(source.to_string()),
            ListingError::Database { .. } => Self::Database { source },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn envelope_of(error: ServerError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).expect("json envelope");
        (status, json)
    }

    #[tokio::test]
    async fn invalid_input_maps_to_400() {
        let error = ServerError::from(ListingError::InvalidState("sold".to_string()));
        let (status, body) = envelope_of(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains("invalid state: sold"));
    }

    #[tokio::test]
    async fn data_access_failure_maps_to_500() {
        let error = ServerError::from(ListingError::from(sqlx::Error::PoolClosed));
        let (status, body) = envelope_of(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().expect("error message").is_empty());
    }

    #[tokio::test]
    async fn envelope_has_only_the_error_key() {
        let error = ServerError::Serialization {
            message: "boom".to_string(),
        };
        let (status, body) = envelope_of(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let object = body.as_object().expect("object");
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("error"));
    }
}
