//! Port trait for pallet-specific item handlers.
//!
//! This is the main extensibility point of the engine. A handler declares
//! the pallets it covers and is invoked by the host framework once per
//! decoded event or extrinsic from those pallets.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DomainError, DomainResult};
use crate::models::Block;
use crate::ports::source::{ItemContext, RawEvent, RawExtrinsic};

/// Default maximum size for handler outputs (50 MB).
pub const DEFAULT_HANDLER_OUTPUTS_MAX_SIZE: usize = 50 * 1024 * 1024;

/// Accumulated outputs from pallet handlers.
///
/// Entities produced while processing a block are staged here as JSON and
/// read back typed at block end, when the producing handler persists them.
#[derive(Debug)]
pub struct HandlerOutputs {
    /// Generic key-value storage for handler outputs.
    /// Key format: "bundle_name:entity_type" (e.g., "transfers:records")
    pub data: HashMap<String, Vec<serde_json::Value>>,
    /// Approximate current size in bytes.
    current_size: usize,
    /// Maximum allowed size in bytes.
    max_size: usize,
}

impl Default for HandlerOutputs {
    fn default() -> Self {
        Self {
            data: HashMap::new(),
            current_size: 0,
            max_size: DEFAULT_HANDLER_OUTPUTS_MAX_SIZE,
        }
    }
}

impl HandlerOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom size limit.
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            data: HashMap::new(),
            current_size: 0,
            max_size,
        }
    }

    /// Add an output entity.
    /// Returns an error if serialization fails or if the size limit would be exceeded.
    pub fn add<T: serde::Serialize>(
        &mut self,
        bundle: &str,
        entity_type: &str,
        value: T,
    ) -> DomainResult<()> {
        let json = serde_json::to_value(value).map_err(|e| {
            DomainError::DecodingError(format!(
                "Failed to serialize handler output for {}:{}: {}",
                bundle, entity_type, e
            ))
        })?;

        let value_size = estimate_json_size(&json);

        if self.current_size + value_size > self.max_size {
            return Err(DomainError::ValidationError(format!(
                "Handler outputs size limit exceeded: {} + {} > {} bytes",
                self.current_size, value_size, self.max_size
            )));
        }

        let key = format!("{}:{}", bundle, entity_type);
        self.data.entry(key).or_default().push(json);
        self.current_size += value_size;

        Ok(())
    }

    /// Get the current approximate size in bytes.
    pub fn current_size(&self) -> usize {
        self.current_size
    }

    /// Get outputs for a specific bundle and entity type.
    pub fn get(&self, bundle: &str, entity_type: &str) -> Option<&Vec<serde_json::Value>> {
        let key = format!("{}:{}", bundle, entity_type);
        self.data.get(&key)
    }

    /// Get typed outputs.
    pub fn get_typed<T: serde::de::DeserializeOwned>(
        &self,
        bundle: &str,
        entity_type: &str,
    ) -> Vec<T> {
        self.get(bundle, entity_type)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Merge another outputs into this one.
    /// Note: This does not check size limits to avoid failing mid-block processing.
    /// The size is still tracked for monitoring purposes.
    pub fn merge(&mut self, other: HandlerOutputs) {
        for (key, values) in other.data {
            self.data.entry(key).or_default().extend(values);
        }
        self.current_size += other.current_size;
    }
}

/// Estimate the size of a JSON value in bytes.
/// This is an approximation for memory tracking purposes.
fn estimate_json_size(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Null => 4,
        serde_json::Value::Bool(_) => 5,
        serde_json::Value::Number(n) => n.to_string().len(),
        serde_json::Value::String(s) => s.len() + 2, // quotes
        serde_json::Value::Array(arr) => {
            2 + arr.iter().map(estimate_json_size).sum::<usize>() + arr.len().saturating_sub(1) // commas
        }
        serde_json::Value::Object(obj) => {
            2 + obj
                .iter()
                .map(|(k, v)| k.len() + 3 + estimate_json_size(v)) // key + quotes + colon
                .sum::<usize>()
                + obj.len().saturating_sub(1) // commas
        }
    }
}

/// Trait for pallet-specific item handlers.
///
/// Implement this trait to extract domain entities from chain items. The
/// handler is called for each event or extrinsic whose pallet appears in
/// [`PalletHandler::pallets`].
#[async_trait]
pub trait PalletHandler: Send + Sync {
    /// Pallet names this handler processes (e.g., `["Balances", "Currencies"]`).
    ///
    /// One handler may cover several pallets when their items feed the same
    /// entity set.
    fn pallets(&self) -> &'static [&'static str];

    /// Process an event from one of this handler's pallets.
    ///
    /// Returns extracted entities to be persisted at block end.
    async fn handle_event(
        &self,
        event: &RawEvent,
        ctx: &ItemContext<'_>,
    ) -> DomainResult<HandlerOutputs>;

    /// Process an extrinsic call from one of this handler's pallets (optional).
    ///
    /// Override this to extract data from dispatched calls themselves, not
    /// just events — e.g. reconstructing intent from a failed call that
    /// emitted no effect event.
    async fn handle_extrinsic(
        &self,
        _extrinsic: &RawExtrinsic,
        _ctx: &ItemContext<'_>,
    ) -> DomainResult<HandlerOutputs> {
        Ok(HandlerOutputs::new())
    }

    /// Called at the end of processing a block (optional).
    ///
    /// This is where accumulated outputs are persisted.
    async fn on_block_end(
        &self,
        _block: &Block,
        _outputs: &HandlerOutputs,
    ) -> DomainResult<HandlerOutputs> {
        Ok(HandlerOutputs::new())
    }

    /// Priority for handler execution (higher = earlier).
    /// Default is 0. System handlers should use negative values.
    fn priority(&self) -> i32 {
        0
    }
}

/// Registry for pallet handlers.
///
/// Maps each declared pallet name to its handler and keeps a priority-ordered
/// list for lifecycle calls.
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn PalletHandler>>,
    ordered_handlers: Vec<Arc<dyn PalletHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            ordered_handlers: Vec::new(),
        }
    }

    /// Register a handler under every pallet name it declares.
    pub fn register(&mut self, handler: Arc<dyn PalletHandler>) {
        for pallet in handler.pallets() {
            self.handlers.insert((*pallet).to_string(), handler.clone());
        }
        self.ordered_handlers.push(handler);
        // Sort by priority (descending)
        self.ordered_handlers
            .sort_by_key(|b| std::cmp::Reverse(b.priority()));
    }

    /// Get the handler covering a specific pallet.
    pub fn get(&self, pallet: &str) -> Option<&Arc<dyn PalletHandler>> {
        self.handlers.get(pallet)
    }

    /// Get all handlers in priority order, each once regardless of how many
    /// pallets it covers.
    pub fn all(&self) -> &[Arc<dyn PalletHandler>] {
        &self.ordered_handlers
    }

    /// Check if a pallet has a registered handler.
    pub fn has_handler(&self, pallet: &str) -> bool {
        self.handlers.contains_key(pallet)
    }

    /// List all pallet names with a registered handler.
    pub fn registered_pallets(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
