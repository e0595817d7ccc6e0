//! Transfer record assembly.
//!
//! Two entry paths feed one normalization step:
//!
//! - the **event path**, for transfers observed through their effect event
//!   (successful extrinsics and inherent transfers), and
//! - the **failed-call path**, for signed extrinsics that did not succeed.
//!   A failed dispatch emits no transfer event, so the envelope is
//!   reconstructed from the call's own arguments; the record captures the
//!   intent (and the fee that was still debited), flagged unsuccessful.

use tally_core::models::{AccountId, Block, ExtrinsicHash};
use tally_core::ports::RawExtrinsic;

use super::models::TransferRecord;
use super::tokens::TokenInfo;

/// Build a record from a transfer event.
///
/// When the event has no enclosing extrinsic (inherent path), the defaults
/// apply: the transfer is successful by construction, there is no extrinsic
/// hash, and no fee was debited — `fee` is ignored in that case.
pub fn build_from_event(
    block: &Block,
    event_index: u32,
    from: AccountId,
    to: AccountId,
    amount: u128,
    token: &TokenInfo,
    extrinsic: Option<&RawExtrinsic>,
    fee: u128,
) -> TransferRecord {
    let success = extrinsic.map(|xt| xt.success).unwrap_or(true);
    let extrinsic_hash = extrinsic.map(|xt| ExtrinsicHash(xt.hash));
    let fees = if extrinsic.is_some() { fee } else { 0 };

    assemble(
        block,
        event_index,
        from,
        to,
        amount,
        token,
        extrinsic_hash,
        fees,
        success,
    )
}

/// Build a record for a failed signed transfer call.
///
/// Participants and amount come from the call arguments; the record is
/// keyed by the extrinsic's index and unconditionally unsuccessful.
pub fn build_from_failed_call(
    block: &Block,
    extrinsic: &RawExtrinsic,
    from: AccountId,
    to: AccountId,
    amount: u128,
    token: &TokenInfo,
    fee: u128,
) -> TransferRecord {
    assemble(
        block,
        extrinsic.index,
        from,
        to,
        amount,
        token,
        Some(ExtrinsicHash(extrinsic.hash)),
        fee,
        false,
    )
}

/// Shared normalization: id formatting, decimal scale at the transfer's
/// height, timestamp stamping.
#[allow(clippy::too_many_arguments)]
fn assemble(
    block: &Block,
    index: u32,
    from: AccountId,
    to: AccountId,
    amount: u128,
    token: &TokenInfo,
    extrinsic_hash: Option<ExtrinsicHash>,
    fees: u128,
    success: bool,
) -> TransferRecord {
    TransferRecord {
        id: format!("{}-{}", block.number, index),
        block_number: block.number,
        index,
        token: token.symbol.to_string(),
        from,
        to,
        timestamp: block.timestamp,
        extrinsic_hash,
        amount,
        fees,
        decimals: token.divisor_at(block.number),
        success,
    }
}
