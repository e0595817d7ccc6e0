//! Core domain layer for the Tally transfer indexer.
//!
//! This crate contains the domain models, port traits (interfaces), and
//! error types for a Substrate token-transfer extraction engine. It is the
//! innermost layer: the host indexing framework drives block iteration and
//! event decoding, then hands each decoded item to handlers registered
//! through the ports defined here.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               host indexer (block loop, RPC, API)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     tally-handlers                          │
//! │        (transfers bundle: extraction + persistence)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     tally-core  ← YOU ARE HERE              │
//! │                  (models, ports, errors)                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Domain models (Block, hash newtypes)
//! - [`ports`] - Interface traits and raw input types for adapters
//! - [`error`] - Domain error types
//! - [`metrics`] - Metric definitions
//!
//! # Key Concepts
//!
//! ## Ports
//!
//! The framework boundary is expressed as port types and traits:
//!
//! - [`ports::RawEvent`] / [`ports::RawExtrinsic`] - decoded chain items as
//!   the framework delivers them
//! - [`ports::ItemContext`] - per-item view: block, enclosing extrinsic,
//!   and the extrinsic's full sibling event list
//! - [`ports::PalletHandler`] - the extension point handlers implement
//!
//! ## Handler System
//!
//! Handlers declare the pallets they cover and are registered in a
//! [`ports::HandlerRegistry`]. For each decoded event or extrinsic, the host
//! looks up the matching handler, calls it with an [`ports::ItemContext`],
//! and merges the returned [`ports::HandlerOutputs`]. At block end the
//! handler persists what it accumulated.

pub mod error;
pub mod metrics;
pub mod models;
pub mod ports;
