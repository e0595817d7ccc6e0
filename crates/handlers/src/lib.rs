//! Handler bundles for the Tally indexer.
//!
//! This crate provides a plugin-like system for extending the indexer with
//! pallet handler sets. Each bundle is self-contained with its own:
//!
//! - Pallet handlers (event/extrinsic processing)
//! - SQL migrations (table definitions)
//! - Models (domain types)
//!
//! The one bundle shipped here is [`TransfersBundle`]: token-transfer
//! extraction across the native `Balances` pallet and the multi-asset
//! `Currencies` pallet, including reconstruction of failed signed transfer
//! calls.
//!
//! # Registering Bundles
//!
//! ```ignore
//! let mut registry = BundleRegistry::new();
//! registry.register(Box::new(TransfersBundle::new(pool, ChainPolicy::polkadot())));
//!
//! // Run all bundle migrations
//! registry.run_migrations(&pool).await?;
//!
//! // Get unified handler registry for the host indexer
//! let handlers = registry.into_handler_registry();
//! ```

pub mod transfers;

mod bundle;
mod registry;
mod utils;

pub use bundle::HandlerBundle;
pub use registry::BundleRegistry;

// Re-export the transfers bundle for convenience
pub use transfers::{ChainPolicy, TransfersBundle};
