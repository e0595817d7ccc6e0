//! Handler for token-transfer extraction.
//!
//! Processes items from the `Balances` and `Currencies` pallets and
//! normalizes them into [`TransferRecord`]s.
//!
//! # Extraction paths
//!
//! - `Balances::Transfer` event: native-token transfer
//! - `Currencies::Transferred` event: multi-asset transfer carrying a
//!   currency descriptor
//! - Failed signed `transfer`/`transfer_keep_alive` calls: reconstructed
//!   from call arguments, since a failed dispatch emits no transfer event

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use tally_core::error::{DomainError, DomainResult};
use tally_core::metrics::{record_account_created, record_decode_error, record_transfer_extracted};
use tally_core::models::{AccountId, Block};
use tally_core::ports::{HandlerOutputs, ItemContext, PalletHandler, RawEvent, RawExtrinsic};

use super::builder::{build_from_event, build_from_failed_call};
use super::currency;
use super::fees::fee_for_extrinsic;
use super::models::{Account, TransferRecord};
use super::storage::TransferStorage;
use super::tokens::TokenRegistry;
use super::ChainPolicy;
use crate::utils::{extract_field, parse_account, parse_amount};

/// Bundle key under which records are staged in [`HandlerOutputs`].
const BUNDLE: &str = "transfers";
const ENTITY: &str = "records";

// =============================================================================
// Classification
// =============================================================================

/// What a chain item means to this handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemClass {
    /// Native `Balances::Transfer` event.
    NativeTransfer,
    /// `Currencies::Transferred` event carrying a currency descriptor.
    MultiAssetTransfer,
    /// Signed, unsuccessful extrinsic dispatching a recognized transfer call.
    FailedTransferCall,
    /// Everything else.
    Ignored,
}

/// Classify an incoming event.
pub fn classify_event(event: &RawEvent) -> ItemClass {
    match (event.pallet.as_str(), event.name.as_str()) {
        ("Balances", "Transfer") => ItemClass::NativeTransfer,
        ("Currencies", "Transferred") => ItemClass::MultiAssetTransfer,
        _ => ItemClass::Ignored,
    }
}

/// Classify an incoming extrinsic.
///
/// Only signed, unsuccessful extrinsics whose call matches the chain
/// policy's recognized sets are reconstructed; a successful signed transfer
/// is already captured through its emitted event.
pub fn classify_extrinsic(extrinsic: &RawExtrinsic, policy: &ChainPolicy) -> ItemClass {
    if extrinsic.is_signed()
        && !extrinsic.success
        && policy.transfer_pallets.contains(&extrinsic.pallet.as_str())
        && policy.transfer_calls.contains(&extrinsic.call.as_str())
    {
        ItemClass::FailedTransferCall
    } else {
        ItemClass::Ignored
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Handler for token transfers across the Balances and Currencies pallets.
///
/// Extracts transfer records, ensures participant accounts exist, and
/// persists through its own storage at block end.
pub struct TransfersHandler {
    policy: ChainPolicy,
    registry: TokenRegistry,
    storage: Arc<dyn TransferStorage>,
}

impl TransfersHandler {
    pub fn new(policy: ChainPolicy, registry: TokenRegistry, storage: Arc<dyn TransferStorage>) -> Self {
        Self {
            policy,
            registry,
            storage,
        }
    }

    /// Normalize a transfer event into a record.
    ///
    /// Field layout depends on the event class: the multi-asset event
    /// prepends the currency descriptor, shifting the participant fields by
    /// one position in tuple-shaped payloads.
    fn process_transfer_event(
        &self,
        event: &RawEvent,
        class: ItemClass,
        ctx: &ItemContext<'_>,
    ) -> DomainResult<TransferRecord> {
        let data = &event.data;

        let (descriptor, from_idx, to_idx, amount_idx) = match class {
            ItemClass::MultiAssetTransfer => {
                let descriptor = data
                    .get("currency_id")
                    .or_else(|| data.get("currencyId"))
                    .or_else(|| data.get(0))
                    .cloned();
                (descriptor, 1, 2, 3)
            }
            _ => (None, 0, 1, 2),
        };

        let token = currency::resolve(
            &self.registry,
            &self.policy.default_token,
            descriptor.as_ref(),
        )?;

        let from = extract_field(data, &["from", "who"], from_idx, parse_account)
            .ok_or_else(|| self.event_decode_error(event, ctx.block, "from"))?;
        let to = extract_field(data, &["to", "dest"], to_idx, parse_account)
            .ok_or_else(|| self.event_decode_error(event, ctx.block, "to"))?;
        let amount = extract_field(data, &["amount", "value"], amount_idx, parse_amount)
            .ok_or_else(|| self.event_decode_error(event, ctx.block, "amount"))?;

        // No signer means nothing was debited for fees.
        let fee = match ctx.extrinsic.and_then(|xt| xt.signer) {
            Some(signer) => fee_for_extrinsic(ctx.extrinsic_events, &AccountId(signer)),
            None => 0,
        };

        Ok(build_from_event(
            ctx.block,
            event.index,
            from,
            to,
            amount,
            token,
            ctx.extrinsic,
            fee,
        ))
    }

    /// Reconstruct a transfer from a failed signed call's arguments.
    fn process_failed_call(
        &self,
        extrinsic: &RawExtrinsic,
        ctx: &ItemContext<'_>,
    ) -> DomainResult<TransferRecord> {
        let signer = extrinsic
            .signer
            .map(AccountId)
            .ok_or_else(|| self.call_decode_error(extrinsic, ctx.block, "signer"))?;
        let args = &extrinsic.args;

        let to = extract_field(args, &["dest", "to"], 0, parse_account)
            .ok_or_else(|| self.call_decode_error(extrinsic, ctx.block, "dest"))?;

        let (token, amount) = match extrinsic.pallet.as_str() {
            "Currencies" => {
                // Decimals follow the currency actually being transferred,
                // not the chain default.
                let descriptor = args
                    .get("currency_id")
                    .or_else(|| args.get("currencyId"))
                    .or_else(|| args.get(1))
                    .cloned();
                let token = currency::resolve(
                    &self.registry,
                    &self.policy.default_token,
                    descriptor.as_ref(),
                )?;
                let amount = extract_field(args, &["amount", "value"], 2, parse_amount)
                    .ok_or_else(|| self.call_decode_error(extrinsic, ctx.block, "amount"))?;
                (token, amount)
            }
            _ => {
                let token = currency::resolve(&self.registry, &self.policy.default_token, None)?;
                let amount = extract_field(args, &["value", "amount"], 1, parse_amount)
                    .ok_or_else(|| self.call_decode_error(extrinsic, ctx.block, "value"))?;
                (token, amount)
            }
        };

        let fee = fee_for_extrinsic(ctx.extrinsic_events, &signer);

        Ok(build_from_failed_call(
            ctx.block, extrinsic, signer, to, amount, token, fee,
        ))
    }

    fn event_decode_error(&self, event: &RawEvent, block: &Block, field: &str) -> DomainError {
        record_decode_error("event", &event.pallet);
        DomainError::DecodingError(format!(
            "{}::{} event {}-{}: missing or malformed '{}'",
            event.pallet, event.name, block.number, event.index, field
        ))
    }

    fn call_decode_error(&self, extrinsic: &RawExtrinsic, block: &Block, field: &str) -> DomainError {
        record_decode_error("extrinsic", &extrinsic.pallet);
        DomainError::DecodingError(format!(
            "{}::{} call {}-{}: missing or malformed '{}'",
            extrinsic.pallet, extrinsic.call, block.number, extrinsic.index, field
        ))
    }

    /// Register every participant address that does not yet have an account
    /// record.
    ///
    /// Check-then-create: the storage layer duplicate-guards creation, so a
    /// concurrent insert of the same address is benign.
    async fn ensure_accounts(&self, participants: &BTreeSet<AccountId>) -> DomainResult<()> {
        for id in participants {
            if !self.storage.account_exists(id).await? {
                self.storage.insert_account(&Account { id: id.clone() }).await?;
                record_account_created();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PalletHandler for TransfersHandler {
    fn pallets(&self) -> &'static [&'static str] {
        &["Balances", "Currencies"]
    }

    async fn handle_event(
        &self,
        event: &RawEvent,
        ctx: &ItemContext<'_>,
    ) -> DomainResult<HandlerOutputs> {
        let mut outputs = HandlerOutputs::new();

        let class = classify_event(event);
        if class == ItemClass::Ignored {
            return Ok(outputs);
        }

        let record = self.process_transfer_event(event, class, ctx)?;
        debug!(
            block = ctx.block.number,
            event = event.index,
            token = %record.token,
            "Extracted transfer"
        );
        record_transfer_extracted(&record.token);
        outputs.add(BUNDLE, ENTITY, &record)?;

        Ok(outputs)
    }

    async fn handle_extrinsic(
        &self,
        extrinsic: &RawExtrinsic,
        ctx: &ItemContext<'_>,
    ) -> DomainResult<HandlerOutputs> {
        let mut outputs = HandlerOutputs::new();

        if classify_extrinsic(extrinsic, &self.policy) != ItemClass::FailedTransferCall {
            return Ok(outputs);
        }

        let record = self.process_failed_call(extrinsic, ctx)?;
        debug!(
            block = ctx.block.number,
            extrinsic = extrinsic.index,
            token = %record.token,
            "Reconstructed failed transfer"
        );
        record_transfer_extracted(&record.token);
        outputs.add(BUNDLE, ENTITY, &record)?;

        Ok(outputs)
    }

    async fn on_block_end(
        &self,
        block: &Block,
        outputs: &HandlerOutputs,
    ) -> DomainResult<HandlerOutputs> {
        let transfers: Vec<TransferRecord> = outputs.get_typed(BUNDLE, ENTITY);

        if transfers.is_empty() {
            return Ok(HandlerOutputs::new());
        }

        // Participant accounts must exist before the records that reference
        // them are written.
        let mut participants = BTreeSet::new();
        for transfer in &transfers {
            participants.insert(transfer.from.clone());
            participants.insert(transfer.to.clone());
        }
        self.ensure_accounts(&participants).await?;

        debug!(
            block = block.number,
            count = transfers.len(),
            "Persisting transfers"
        );

        if let Err(e) = self.storage.insert_transfers(&transfers).await {
            warn!(block = block.number, error = ?e, "Failed to persist transfers");
            return Err(e.into());
        }

        Ok(HandlerOutputs::new())
    }

    fn priority(&self) -> i32 {
        10
    }
}
