// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for listing resolution and data access

use thiserror::Error;

/// Errors produced while resolving listings
#[derive(Error, Debug)]
pub enum ListingError {
    /// The requested listing state keyword is not recognized
    ///
    /// Raised before any database access occurs. Carries the offending
    /// value so callers can report it back.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Query execution or connection failure
    #[error("database error: {source}")]
    Database {
        /// Underlying driver error
        #[from]
        source: sqlx::Error,
    },
}
