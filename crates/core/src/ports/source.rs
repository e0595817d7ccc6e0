//! Raw chain input types delivered by the host framework.
//!
//! The framework owns RPC, block subscription, and SCALE decoding; handlers
//! receive items in the already-decoded form below. Argument and event
//! payloads are JSON-shaped (`serde_json::Value`) because their concrete
//! layout varies with runtime metadata versions.

use crate::models::Block;

/// Raw block data before domain transformation.
#[derive(Debug, Clone)]
pub struct RawBlock {
    /// Block number.
    pub number: u64,
    /// Block hash.
    pub hash: [u8; 32],
    /// Parent hash.
    pub parent_hash: [u8; 32],
    /// Decoded extrinsics.
    pub extrinsics: Vec<RawExtrinsic>,
    /// Decoded events.
    pub events: Vec<RawEvent>,
    /// Block timestamp in milliseconds (from the Timestamp pallet).
    pub timestamp: Option<u64>,
}

/// Raw extrinsic data.
#[derive(Debug, Clone)]
pub struct RawExtrinsic {
    /// Index in block.
    pub index: u32,
    /// Extrinsic hash.
    pub hash: [u8; 32],
    /// Decoded pallet name.
    pub pallet: String,
    /// Decoded call name.
    pub call: String,
    /// Signer (None for unsigned/inherent).
    pub signer: Option<[u8; 32]>,
    /// Call arguments as JSON.
    pub args: serde_json::Value,
    /// Dispatch success flag.
    pub success: bool,
    /// Tip paid (if signed).
    pub tip: Option<u128>,
    /// Nonce (if signed).
    pub nonce: Option<u32>,
}

impl RawExtrinsic {
    /// Whether this extrinsic carries a signature.
    pub fn is_signed(&self) -> bool {
        self.signer.is_some()
    }
}

/// Raw event data.
#[derive(Debug, Clone)]
pub struct RawEvent {
    /// Index in block.
    pub index: u32,
    /// Index of the extrinsic that emitted this event (None for system
    /// events emitted during block initialization/finalization).
    pub extrinsic_index: Option<u32>,
    /// Pallet name.
    pub pallet: String,
    /// Event variant name.
    pub name: String,
    /// Event data as JSON.
    pub data: serde_json::Value,
}

/// Per-item view passed to handlers.
///
/// Carries the enclosing block, the enclosing extrinsic when the item was
/// emitted by one, and that extrinsic's full ordered event list. The sibling
/// events are what fee derivation scans; they are empty for inherent items.
#[derive(Debug, Clone, Copy)]
pub struct ItemContext<'a> {
    /// Block the item belongs to.
    pub block: &'a Block,
    /// Enclosing extrinsic, if any.
    pub extrinsic: Option<&'a RawExtrinsic>,
    /// All events emitted by the enclosing extrinsic, in order.
    pub extrinsic_events: &'a [RawEvent],
}

impl<'a> ItemContext<'a> {
    /// Context for an item with no enclosing extrinsic (inherent path).
    pub fn inherent(block: &'a Block) -> Self {
        Self {
            block,
            extrinsic: None,
            extrinsic_events: &[],
        }
    }

    /// Context for an item enclosed by `extrinsic`, with the extrinsic's
    /// ordered sibling event list.
    pub fn for_extrinsic(
        block: &'a Block,
        extrinsic: &'a RawExtrinsic,
        extrinsic_events: &'a [RawEvent],
    ) -> Self {
        Self {
            block,
            extrinsic: Some(extrinsic),
            extrinsic_events,
        }
    }
}
