// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Listing event record
//!
//! Row shape of the indexer-populated `item_listed` table. Addresses and
//! hashes are fixed-length hex strings; block numbers, transaction indices,
//! and prices are decimal strings because on-chain values can exceed native
//! integer range.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A single on-chain "item listed" occurrence
///
/// The tuple (`contract_address`, `token_address`, `token_id`) identifies a
/// unique listed asset instance per network. Rows are inserted exclusively
/// by the external indexer; this API never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ListingEvent {
    /// Monotonically increasing indexer-assigned identifier
    #[schema(example = 42)]
    pub rindexer_id: i64,
    /// Marketplace contract address (0x-prefixed, 64 hex digits)
    #[schema(example = "0x00000000000000000000000011aceb435a10cd88c95ff9f4b37b11ed2c4c4a1")]
    pub contract_address: String,
    /// Token contract address, when the event carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    /// Token identifier as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// Transaction hash of the listing event
    pub tx_hash: String,
    /// Block number as a decimal string
    pub block_number: String,
    /// Hash of the block containing the event
    pub block_hash: String,
    /// Network the event was observed on
    #[schema(example = "ethereum")]
    pub network: String,
    /// Transaction index within the block, as a decimal string
    pub tx_index: String,
    /// Log index within the transaction, as a decimal string
    pub log_index: String,
    /// Asking price in wei as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}
