//! Transfers handler bundle.
//!
//! Indexing support for token transfers: native `Balances::Transfer`
//! events, multi-asset `Currencies::Transferred` events, and the
//! reconstruction of failed signed transfer calls from their arguments.
//!
//! # Database Tables
//!
//! - `transfers` - normalized transfer records
//! - `accounts` - participant addresses (existence only)
//!
//! # Usage
//!
//! ```ignore
//! use tally_handlers::{ChainPolicy, TransfersBundle};
//!
//! let bundle = TransfersBundle::new(pool, ChainPolicy::polkadot());
//! registry.register(Box::new(bundle));
//! ```

mod builder;
mod handler;

pub mod currency;
pub mod fees;
pub mod models;
pub mod storage;
pub mod tokens;

use std::sync::Arc;

use sqlx::PgPool;

use tally_core::ports::PalletHandler;

use crate::HandlerBundle;

pub use handler::{classify_event, classify_extrinsic, ItemClass, TransfersHandler};
pub use models::{Account, TransferRecord};
pub use storage::{PgTransferStorage, TransferStorage, MIGRATIONS};
pub use tokens::{TokenInfo, TokenRegistry};

// =============================================================================
// Chain policy
// =============================================================================

/// Per-chain extraction policy.
///
/// The handler logic is identical across chain variants; what differs is the
/// default token and which failed calls are worth reconstructing. One policy
/// object is selected at process start instead of shipping a near-identical
/// handler set per chain.
#[derive(Debug, Clone)]
pub struct ChainPolicy {
    /// Token resolved when an item carries no currency descriptor.
    pub default_token: String,
    /// Pallet sections whose failed transfer calls are reconstructed.
    pub transfer_pallets: &'static [&'static str],
    /// Call names recognized as transfers.
    pub transfer_calls: &'static [&'static str],
}

impl ChainPolicy {
    /// Policy with the standard recognized call set and the given default
    /// token.
    pub fn new(default_token: impl Into<String>) -> Self {
        Self {
            default_token: default_token.into(),
            transfer_pallets: &["Balances", "Currencies"],
            transfer_calls: &["transfer", "transfer_keep_alive"],
        }
    }

    /// Reference policy for the Polkadot relay chain.
    pub fn polkadot() -> Self {
        Self::new("DOT")
    }

    /// Policy for the Kusama relay chain.
    pub fn kusama() -> Self {
        Self::new("KSM")
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// Handler bundle for token-transfer extraction.
pub struct TransfersBundle {
    pool: PgPool,
    policy: ChainPolicy,
}

impl TransfersBundle {
    /// Create a new transfers bundle for the given chain policy.
    pub fn new(pool: PgPool, policy: ChainPolicy) -> Self {
        Self { pool, policy }
    }
}

impl HandlerBundle for TransfersBundle {
    fn name(&self) -> &'static str {
        "transfers"
    }

    fn handlers(&self) -> Vec<Arc<dyn PalletHandler>> {
        let storage = Arc::new(PgTransferStorage::new(self.pool.clone()));
        vec![Arc::new(TransfersHandler::new(
            self.policy.clone(),
            TokenRegistry::builtin(),
            storage,
        ))]
    }

    fn migrations(&self) -> &'static [&'static str] {
        MIGRATIONS
    }

    fn priority(&self) -> i32 {
        // High priority - other bundles may depend on transfer data
        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every shipped policy must name a token the registry knows, or the
    // resolver would fail on the first descriptor-less item.
    #[test]
    fn shipped_policies_use_registered_default_tokens() {
        let registry = TokenRegistry::builtin();
        for policy in [ChainPolicy::polkadot(), ChainPolicy::kusama()] {
            assert!(
                registry.get(&policy.default_token).is_some(),
                "unregistered default token {}",
                policy.default_token
            );
        }
    }

    #[test]
    fn standard_call_set_matches_keep_alive_variant() {
        let policy = ChainPolicy::polkadot();
        assert!(policy.transfer_calls.contains(&"transfer"));
        assert!(policy.transfer_calls.contains(&"transfer_keep_alive"));
        assert!(!policy.transfer_calls.contains(&"force_transfer"));
    }
}
