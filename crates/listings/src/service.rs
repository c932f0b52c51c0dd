// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Listing resolution service
//!
//! Validates the caller-supplied state keyword against the closed set of
//! recognized states and dispatches to the matching repository operation.
//! Unrecognized keywords fail before any database access.

use std::{fmt, sync::Arc};

use tracing::warn;

use crate::{error::ListingError, model::ListingEvent, repository::ListingStore};

/// Recognized listing states
///
/// Keywords are matched case-sensitively; `"active"` is currently the only
/// member of the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    /// Listed and not yet sold or delisted
    Active,
}

impl ListingState {
    /// Parse a state keyword
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::InvalidState`] carrying the offending value
    /// when the keyword is not recognized.
    pub fn parse(value: &str) -> Result<Self, ListingError> {
        match value {
            "active" => Ok(Self::Active),
            other => Err(ListingError::InvalidState(other.to_string())),
        }
    }

    /// Canonical keyword for this state
    ///
    /// Callers use this where the parsed state has to round-trip back to
    /// its wire keyword, such as bounded metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }
}

/// Dispatches validated state keywords to repository operations
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ListingStore>,
}

impl ListingService {
    /// Create a service over the given store
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    /// Resolve the listings matching a state keyword
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::InvalidState`] for unrecognized keywords
    /// (before any query is issued) or [`ListingError::Database`] if the
    /// delegated read fails.
    pub async fn fetch_listings(&self, state: &str) -> Result<Vec<ListingEvent>, ListingError> {
        let state = ListingState::parse(state).inspect_err(|_| {
            warn!(state, "unrecognized listing state requested");
        })?;

        match state {
            ListingState::Active => self.store.fetch_active().await,
        }
    }

    /// Probe the underlying store
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Database`] when the store is unreachable.
    pub async fn ping(&self) -> Result<(), ListingError> {
        self.store.ping().await
    }
}

impl fmt::Debug for ListingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingService").finish_non_exhaustive()
    }
}
