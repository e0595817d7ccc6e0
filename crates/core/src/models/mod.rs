//! Domain models representing decoded chain data.
//!
//! These models are storage-agnostic: they are the canonical form of chain
//! data inside the domain layer, after the host framework has decoded the
//! raw SCALE bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// 32-byte Hash Types
// =============================================================================

/// Macro to generate 32-byte hash newtypes with common functionality.
///
/// Generates:
/// - `from_hex()` - Parse from hex string (with or without 0x prefix)
/// - `to_hex()` - Convert to 0x-prefixed hex string
/// - `Display` trait implementation
/// - `From<[u8; 32]>` implementation
macro_rules! hash32_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            /// Parse from hex string (with or without 0x prefix).
            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(s)?;
                let arr: [u8; 32] = bytes
                    .try_into()
                    .map_err(|_| hex::FromHexError::InvalidStringLength)?;
                Ok(Self(arr))
            }

            /// Convert to 0x-prefixed hex string.
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }

            /// Get the inner bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

hash32_newtype!(
    /// 32-byte block hash (Blake2-256).
    BlockHash
);

hash32_newtype!(
    /// 32-byte account identifier (SS58 decoded public key).
    AccountId
);

hash32_newtype!(
    /// 32-byte extrinsic hash.
    ExtrinsicHash
);

// =============================================================================
// Block
// =============================================================================

/// Decoded block handed to handlers alongside each item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Block number (height).
    pub number: u64,
    /// Block hash.
    pub hash: BlockHash,
    /// Parent block hash.
    pub parent_hash: BlockHash,
    /// Timestamp from `pallet_timestamp` (if available).
    pub timestamp: Option<DateTime<Utc>>,
    /// Number of extrinsics in this block.
    pub extrinsic_count: u32,
    /// Number of events in this block.
    pub event_count: u32,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_hash_hex_roundtrip() {
        let hex = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
        let hash = BlockHash::from_hex(hex).unwrap();
        assert_eq!(hash.to_hex(), hex);
    }

    #[test]
    fn account_id_without_prefix() {
        let hex = "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";
        let account = AccountId::from_hex(hex).unwrap();
        assert_eq!(account.to_hex(), format!("0x{}", hex));
    }

    #[test]
    fn extrinsic_hash_from_bytes() {
        let bytes = [0xab; 32];
        let hash = ExtrinsicHash::from(bytes);
        assert_eq!(hash.as_bytes(), &bytes);
    }

    #[test]
    fn hash32_invalid_length() {
        assert!(BlockHash::from_hex("0x1234").is_err());
    }
}
