//! Shared payload parsing for pallet handlers.
//!
//! Decoded event and call payloads arrive as JSON whose shape varies with
//! runtime metadata versions: fields may be named or positional, accounts
//! may be raw hex, wrapped in `{ "Id": ... }`, or byte arrays. The helpers
//! here normalize those shapes.

use tally_core::models::AccountId;

/// Extract a field from a JSON payload, trying named keys first and falling
/// back to positional access.
///
/// ```ignore
/// let from = extract_field(data, &["from", "who"], 0, parse_account);
/// ```
pub fn extract_field<T>(
    data: &serde_json::Value,
    keys: &[&str],
    index: usize,
    parser: fn(&serde_json::Value) -> Option<T>,
) -> Option<T> {
    keys.iter()
        .find_map(|key| data.get(*key))
        .or_else(|| data.get(index))
        .and_then(parser)
}

/// Parse an account ID from the JSON representations Substrate nodes emit:
///
/// - Hex string: `"0x1234..."` (with or without prefix)
/// - Wrapped object: `{ "Id": "0x..." }` (metadata v14+ MultiAddress)
/// - Array wrapper: `["0x..."]`
/// - Byte array: `[b0, b1, ..., b31]`
pub fn parse_account(value: &serde_json::Value) -> Option<AccountId> {
    match value {
        serde_json::Value::String(s) => {
            let hex_str = s.strip_prefix("0x").unwrap_or(s);
            let bytes = hex::decode(hex_str).ok()?;
            let arr: [u8; 32] = bytes.try_into().ok()?;
            Some(AccountId(arr))
        }
        serde_json::Value::Object(obj) => obj
            .get("Id")
            .or_else(|| obj.get("id"))
            .and_then(parse_account),
        serde_json::Value::Array(arr) => {
            if arr.len() == 1 {
                return parse_account(&arr[0]);
            }
            if arr.len() != 32 {
                return None;
            }
            let mut bytes = [0u8; 32];
            for (i, v) in arr.iter().enumerate() {
                bytes[i] = v.as_u64()? as u8;
            }
            Some(AccountId(bytes))
        }
        _ => None,
    }
}

/// Parse an amount (u128) from JSON.
///
/// Both numeric and string forms occur: JSON numbers cap at u64, so nodes
/// serialize larger balances as decimal strings.
pub fn parse_amount(value: &serde_json::Value) -> Option<u128> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().map(u128::from),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_account_hex_forms() {
        let hex = "0x".to_string() + &"ab".repeat(32);
        assert_eq!(parse_account(&json!(hex)).unwrap().0, [0xab; 32]);
        // without prefix
        assert_eq!(
            parse_account(&json!("cd".repeat(32))).unwrap().0,
            [0xcd; 32]
        );
    }

    #[test]
    fn test_parse_account_wrapped_and_array_forms() {
        let hex = "0x".to_string() + &"ef".repeat(32);
        assert!(parse_account(&json!({ "Id": hex })).is_some());
        assert!(parse_account(&json!({ "id": hex })).is_some());
        assert!(parse_account(&json!([hex])).is_some());

        let bytes: Vec<u8> = (0..32).collect();
        let expected: [u8; 32] = (0..32).collect::<Vec<u8>>().try_into().unwrap();
        assert_eq!(parse_account(&json!(bytes)).unwrap().0, expected);
    }

    #[test]
    fn test_parse_account_rejects_invalid() {
        assert!(parse_account(&json!("ab".repeat(16))).is_none());
        assert!(parse_account(&json!("not_valid_hex")).is_none());
        assert!(parse_account(&json!([1, 2, 3])).is_none());
        assert!(parse_account(&json!(42)).is_none());
    }

    #[test]
    fn test_parse_amount_number_and_string() {
        assert_eq!(parse_amount(&json!(12345)), Some(12345));
        assert_eq!(parse_amount(&json!(u64::MAX)), Some(u64::MAX as u128));
        // amounts above u64 arrive as strings
        let large = "340282366920938463463374607431768211455"; // u128::MAX
        assert_eq!(parse_amount(&json!(large)), Some(u128::MAX));
        assert_eq!(parse_amount(&json!(null)), None);
    }

    #[test]
    fn test_extract_field_fallback_chain() {
        let hex = "0x".to_string() + &"aa".repeat(32);

        // first matching key wins
        let data = json!({"from": hex, "who": "0x".to_string() + &"bb".repeat(32)});
        let result = extract_field(&data, &["from", "who"], 0, parse_account);
        assert_eq!(result.unwrap().0, [0xaa; 32]);

        // second key when the first is absent
        let data = json!({ "who": hex });
        assert!(extract_field(&data, &["from", "who"], 0, parse_account).is_some());

        // positional fallback when no key matches
        let data = json!([hex, 1000]);
        assert!(extract_field(&data, &["from", "who"], 0, parse_account).is_some());
        assert_eq!(
            extract_field(&data, &["amount", "value"], 1, parse_amount),
            Some(1000)
        );
    }
}
