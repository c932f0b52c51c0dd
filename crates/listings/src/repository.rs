// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Listing repository
//!
//! [`ListingStore`] is the seam between the HTTP layers and PostgreSQL so
//! handlers and the resolution service can be exercised against substitute
//! implementations. [`PgListingStore`] is the production implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error};

use crate::{error::ListingError, model::ListingEvent};

/// Indexer-owned schema holding the marketplace event tables
const SCHEMA: &str = "marketplace_nft_marketplace";

/// Read access to marketplace listing state
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Fetch every listing with no matching sold or delisted event
    ///
    /// Zero active listings yields an empty vector, never an error.
    async fn fetch_active(&self) -> Result<Vec<ListingEvent>, ListingError>;

    /// Cheap connectivity probe for health reporting
    async fn ping(&self) -> Result<(), ListingError>;
}

/// PostgreSQL-backed listing store
#[derive(Debug, Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    /// Create a store over an established pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Statement computing the active set
    ///
    /// A listed row is active only if absent from *both* exclusion tables,
    /// matching on (contract_address, token_address, token_id). The key
    /// comparison is null-safe because token columns are nullable. Numeric
    /// columns are selected as text; the wire format carries decimal
    /// strings. Results are ordered by `rindexer_id` so repeated calls over
    /// unchanged data return identical sequences.
    ///
    /// The exclusion lookups assume the key tuple is indexed on `item_sold`
    /// and `item_delisted`; without those indexes this degrades to a
    /// full-table anti-join.
    fn active_listings_sql() -> String {
        format!(
            r"
            SELECT
                l.rindexer_id,
                l.contract_address,
                l.token_address,
                l.token_id,
                l.tx_hash,
                l.block_number::text AS block_number,
                l.block_hash,
                l.network,
                l.tx_index::text AS tx_index,
                l.log_index,
                l.price
            FROM {SCHEMA}.item_listed l
            WHERE NOT EXISTS (
                SELECT 1 FROM {SCHEMA}.item_sold s
                WHERE s.contract_address = l.contract_address
                  AND s.token_address IS NOT DISTINCT FROM l.token_address
                  AND s.token_id IS NOT DISTINCT FROM l.token_id
            )
            AND NOT EXISTS (
                SELECT 1 FROM {SCHEMA}.item_delisted d
                WHERE d.contract_address = l.contract_address
                  AND d.token_address IS NOT DISTINCT FROM l.token_address
                  AND d.token_id IS NOT DISTINCT FROM l.token_id
            )
            ORDER BY l.rindexer_id ASC
            "
        )
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn fetch_active(&self) -> Result<Vec<ListingEvent>, ListingError> {
        let sql = Self::active_listings_sql();
        let listings: Vec<ListingEvent> = sqlx::query_as(&sql)
            .persistent(true)
            .fetch_all(&self.pool)
            .await
            .map_err(|source| {
                error!(error = %source, "active listing query failed");
                ListingError::Database { source }
            })?;

        debug!(count = listings.len(), "resolved active listings");
        Ok(listings)
    }

    async fn ping(&self) -> Result<(), ListingError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|source| ListingError::Database { source })?;
        Ok(())
    }
}
