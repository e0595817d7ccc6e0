//! Models for the transfers bundle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tally_core::models::{AccountId, ExtrinsicHash};

/// A normalized token transfer.
///
/// One record per chain position, produced either from a transfer event
/// (successful path) or reconstructed from a failed signed call's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Unique identifier: `block_number-index`.
    pub id: String,
    /// Block number containing this transfer.
    pub block_number: u64,
    /// Position within the block: event index on the event path, extrinsic
    /// index on the failed-call path.
    pub index: u32,
    /// Resolved token symbol.
    pub token: String,
    /// Sender account.
    pub from: AccountId,
    /// Recipient account.
    pub to: AccountId,
    /// Block timestamp (if available).
    pub timestamp: Option<DateTime<Utc>>,
    /// Hash of the enclosing extrinsic; None on the inherent path.
    pub extrinsic_hash: Option<ExtrinsicHash>,
    /// Amount transferred, in the token's smallest unit.
    #[serde(with = "u128_string")]
    pub amount: u128,
    /// Net fee debited from the signer; zero when not computable.
    #[serde(with = "u128_string")]
    pub fees: u128,
    /// Scaling divisor (10^exponent) in effect at this transfer's height.
    #[serde(with = "u128_string")]
    pub decimals: u128,
    /// Whether the transfer took effect.
    pub success: bool,
}

/// A participant account.
///
/// Existence is the only tracked fact: a record is created the first time
/// an address appears on either end of a transfer and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account address.
    pub id: AccountId,
}

/// Serde adapter for u128 fields.
///
/// JSON numbers cap at 64 bits; balances are carried as decimal strings so
/// no precision is lost staging records through JSON.
mod u128_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
