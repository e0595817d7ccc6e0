//! Currency resolution for multi-asset transfer events.
//!
//! On multi-asset chains a transfer event carries a currency descriptor
//! naming the asset moved; native-pallet transfers carry none and resolve to
//! the chain's default token. Descriptors arrive as generic decoded values
//! whose runtime shape varies, so they are normalized by re-parsing through
//! serde rather than accessed field-by-field.

use serde::Deserialize;

use tally_core::error::{DomainError, DomainResult};

use super::tokens::{TokenInfo, TokenRegistry};

/// Normalized currency descriptor shape: an object exposing a token symbol.
///
/// Chains emit the enum-variant form `{ "Token": "KAR" }`; some decoders
/// lowercase the tag.
#[derive(Debug, Deserialize)]
struct CurrencyDescriptor {
    #[serde(rename = "Token", alias = "token")]
    token: String,
}

/// Resolve the token a transfer moved.
///
/// - No descriptor: the chain-default token.
/// - Descriptor parsing to a `{token}` shape: that symbol's registry entry;
///   an unknown symbol is fatal ([`DomainError::UnknownToken`]) since no
///   decimal scale is known for it.
/// - Descriptor of any other shape: treated as no descriptor (default
///   token) rather than an error.
pub fn resolve<'r>(
    registry: &'r TokenRegistry,
    default_token: &str,
    descriptor: Option<&serde_json::Value>,
) -> DomainResult<&'r TokenInfo> {
    let symbol = match descriptor {
        Some(value) => {
            // Deep-copy through serde: the descriptor may be a rich decoded
            // value, not a plain map.
            match serde_json::from_value::<CurrencyDescriptor>(value.clone()) {
                Ok(descriptor) => {
                    return registry
                        .get(&descriptor.token)
                        .ok_or(DomainError::UnknownToken(descriptor.token));
                }
                Err(_) => default_token,
            }
        }
        None => default_token,
    };

    registry
        .get(symbol)
        .ok_or_else(|| DomainError::UnknownToken(symbol.to_string()))
}
