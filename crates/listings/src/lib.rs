// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Listing domain for the marketplace listing API
//!
//! This crate owns everything between the HTTP layer and PostgreSQL:
//!
//! - [`model`]: the [`ListingEvent`] record produced by the external indexer
//! - [`db`]: bounded connection pool construction against the listing database
//! - [`repository`]: the [`ListingStore`] seam and its PostgreSQL
//!   implementation running the active-listing anti-join
//! - [`service`]: listing state keyword validation and dispatch
//! - [`error`]: the crate-wide [`ListingError`] type
//!
//! The event tables (`item_listed`, `item_sold`, `item_delisted`) are
//! populated by an external indexing process; this crate only reads.

pub mod db;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use db::{DatabaseConfig, PgPool};
pub use error::ListingError;
pub use model::ListingEvent;
pub use repository::{ListingStore, PgListingStore};
pub use service::{ListingService, ListingState};
