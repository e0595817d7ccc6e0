//! Metrics definitions for the transfer-extraction engine.
//!
//! Metrics are recorded through the `metrics` crate facade; the host binary
//! decides whether and how to install an exporter.

use metrics::{counter, describe_counter};

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "transfers_extracted_total",
        "Total number of transfer records extracted"
    );
    describe_counter!(
        "accounts_created_total",
        "Total number of participant accounts created on first reference"
    );
    describe_counter!(
        "decode_errors_total",
        "Total number of decode errors during item processing"
    );
    describe_counter!(
        "handler_errors_total",
        "Total number of handler errors during event/extrinsic processing"
    );
}

/// Record an extracted transfer, labeled by token symbol.
pub fn record_transfer_extracted(token: &str) {
    counter!("transfers_extracted_total", "token" => token.to_string()).increment(1);
}

/// Record a newly created account.
pub fn record_account_created() {
    counter!("accounts_created_total").increment(1);
}

/// Record a decode error.
///
/// # Arguments
/// * `item_type` - The item type ("event" or "extrinsic")
/// * `pallet` - The pallet name
pub fn record_decode_error(item_type: &str, pallet: &str) {
    counter!("decode_errors_total", "type" => item_type.to_string(), "pallet" => pallet.to_string())
        .increment(1);
}

/// Record a handler error.
///
/// # Arguments
/// * `handler_type` - The handler entry point ("event" or "extrinsic")
/// * `pallet` - The pallet name
pub fn record_handler_error(handler_type: &str, pallet: &str) {
    counter!("handler_errors_total", "type" => handler_type.to_string(), "pallet" => pallet.to_string())
        .increment(1);
}
