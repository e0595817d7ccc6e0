//! Fee derivation from an extrinsic's event list.
//!
//! The net fee debited from a signer is not a field on the extrinsic; it has
//! to be read back out of the bookkeeping events the runtime emitted while
//! executing it. Which events exist depends on the runtime generation:
//! newer runtimes emit an explicit `Balances::Withdraw` from the signer,
//! older ones only emit the deposit side, split between the block author's
//! `Balances::Deposit` and the `Treasury::Deposit` cut.

use tally_core::models::AccountId;
use tally_core::ports::RawEvent;

use crate::utils::{extract_field, parse_account, parse_amount};

/// Derive the net fee debited from `signer`, given the ordered events
/// emitted by one extrinsic.
///
/// Policy (first matching rule wins, rules are not summed):
///
/// 1. The first `Balances::Withdraw` event is authoritative when present.
///    If its account is the signer, its amount is the fee; if it withdrew
///    from some other account, the extrinsic cost the signer nothing.
/// 2. With no Withdraw event, the fee is the first `Balances::Deposit`
///    amount plus the first `Treasury::Deposit` amount (either may be
///    absent and counts as zero).
///
/// Never fails: events that don't parse contribute zero.
pub fn fee_for_extrinsic(events: &[RawEvent], signer: &AccountId) -> u128 {
    if let Some(withdraw) = events
        .iter()
        .find(|e| e.pallet == "Balances" && e.name == "Withdraw")
    {
        let account = extract_field(&withdraw.data, &["who", "account"], 0, parse_account);
        if account.as_ref() == Some(signer) {
            return extract_field(&withdraw.data, &["amount", "value"], 1, parse_amount)
                .unwrap_or(0);
        }
        return 0;
    }

    let balances_deposit = events
        .iter()
        .find(|e| e.pallet == "Balances" && e.name == "Deposit")
        .and_then(|e| extract_field(&e.data, &["amount", "value"], 1, parse_amount))
        .unwrap_or(0);

    let treasury_deposit = events
        .iter()
        .find(|e| e.pallet == "Treasury" && e.name == "Deposit")
        .and_then(|e| extract_field(&e.data, &["value", "amount"], 0, parse_amount))
        .unwrap_or(0);

    balances_deposit.saturating_add(treasury_deposit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signer() -> AccountId {
        AccountId([0x11; 32])
    }

    fn other() -> AccountId {
        AccountId([0x22; 32])
    }

    fn event(pallet: &str, name: &str, data: serde_json::Value) -> RawEvent {
        RawEvent {
            index: 0,
            extrinsic_index: Some(1),
            pallet: pallet.to_string(),
            name: name.to_string(),
            data,
        }
    }

    fn withdraw(who: &AccountId, amount: u64) -> RawEvent {
        event(
            "Balances",
            "Withdraw",
            json!({ "who": who.to_hex(), "amount": amount }),
        )
    }

    #[test]
    fn withdraw_from_signer_is_the_fee() {
        let events = vec![withdraw(&signer(), 100)];
        assert_eq!(fee_for_extrinsic(&events, &signer()), 100);
    }

    #[test]
    fn withdraw_from_other_account_means_zero() {
        let events = vec![withdraw(&other(), 100)];
        assert_eq!(fee_for_extrinsic(&events, &signer()), 0);
    }

    #[test]
    fn deposits_sum_when_no_withdraw() {
        let events = vec![
            event(
                "Balances",
                "Deposit",
                json!({ "who": other().to_hex(), "amount": 30 }),
            ),
            event("Treasury", "Deposit", json!({ "value": 20 })),
        ];
        assert_eq!(fee_for_extrinsic(&events, &signer()), 50);
    }

    #[test]
    fn withdraw_short_circuits_deposits() {
        let events = vec![
            withdraw(&signer(), 100),
            event(
                "Balances",
                "Deposit",
                json!({ "who": other().to_hex(), "amount": 30 }),
            ),
        ];
        assert_eq!(fee_for_extrinsic(&events, &signer()), 100);
    }

    #[test]
    fn only_first_matching_events_count() {
        let events = vec![
            event(
                "Balances",
                "Deposit",
                json!({ "who": other().to_hex(), "amount": 30 }),
            ),
            event(
                "Balances",
                "Deposit",
                json!({ "who": other().to_hex(), "amount": 999 }),
            ),
            event("Treasury", "Deposit", json!({ "value": 20 })),
        ];
        assert_eq!(fee_for_extrinsic(&events, &signer()), 50);
    }

    #[test]
    fn no_matching_events_is_zero() {
        assert_eq!(fee_for_extrinsic(&[], &signer()), 0);

        let events = vec![event(
            "Balances",
            "Transfer",
            json!({ "from": signer().to_hex(), "to": other().to_hex(), "amount": 5 }),
        )];
        assert_eq!(fee_for_extrinsic(&events, &signer()), 0);
    }

    #[test]
    fn positional_payloads_parse() {
        // older metadata delivers tuple-shaped event data
        let events = vec![event(
            "Balances",
            "Withdraw",
            json!([signer().to_hex(), 77]),
        )];
        assert_eq!(fee_for_extrinsic(&events, &signer()), 77);
    }

    #[test]
    fn unparseable_withdraw_amount_is_zero() {
        let events = vec![event(
            "Balances",
            "Withdraw",
            json!({ "who": signer().to_hex(), "amount": {"nested": true} }),
        )];
        assert_eq!(fee_for_extrinsic(&events, &signer()), 0);
    }
}
