// WalletLens — Row Classifier
// Turns one raw transaction into one display row. The same decision feeds the
// aggregator, so a row and the totals can never disagree about a transaction.

use super::abi::decode_call;
use super::primitives::{is_zero, parse_u256_decimal, units_to_decimal};
use super::registry::TokenRegistry;
use crate::atoms::constants::{
    APPROVAL_PREFIX, CONTRACT_CALL_PREFIX, CONTRACT_CREATION_LABEL, NO_TRANSFER_LABEL,
    UNHANDLED_CALL_LABEL, UNKNOWN_TOKEN_LABEL, UNKNOWN_TOKEN_TRANSFER_LABEL,
};
use crate::atoms::types::{DecodedCall, DisplayRow, RawTransaction, RowKind, TokenDescriptor};
use chrono::{DateTime, Utc};

/// What a transaction means for the wallet, before any formatting.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Decision<'a> {
    /// Positive `value`; always wins over any method call.
    Native { raw: [u8; 32], token: &'a TokenDescriptor },
    /// Decoded `transfer` on a registered token contract.
    Token { raw: [u8; 32], token: &'a TokenDescriptor, contract: &'a str, to: String },
    UnknownToken { contract: &'a str, to: String },
    /// Approvals never carry a value amount.
    Approval { token: Option<&'a TokenDescriptor>, contract: &'a str, spender: String },
    /// Method present but input did not decode.
    ContractCall { signature: &'a str },
    /// Decoded call with no contract to resolve against (contract creation).
    Unhandled,
    NoTransfer,
}

/// Positive native value, if any. Unparseable values count as zero.
fn native_value(tx: &RawTransaction) -> Option<[u8; 32]> {
    parse_u256_decimal(&tx.value_wei).ok().filter(|v| !is_zero(v))
}

fn method_signature(tx: &RawTransaction) -> Option<&str> {
    tx.method_signature.as_deref().map(str::trim).filter(|m| !m.is_empty())
}

/// First matching rule wins: native value, then decoded call, then nothing.
pub(crate) fn decide<'a>(tx: &'a RawTransaction, registry: &'a TokenRegistry) -> Decision<'a> {
    if let Some(raw) = native_value(tx) {
        return Decision::Native { raw, token: registry.native_descriptor() };
    }

    let Some(signature) = method_signature(tx) else {
        return Decision::NoTransfer;
    };

    let Some(call) = tx.raw_input.as_deref().and_then(decode_call) else {
        return Decision::ContractCall { signature };
    };

    let Some(contract) = tx.to_address.as_deref() else {
        return Decision::Unhandled;
    };
    let token = registry.lookup(contract);

    match call {
        DecodedCall::Transfer { to_address, raw_amount } => match token {
            Some(token) => Decision::Token { raw: raw_amount, token, contract, to: to_address },
            None => Decision::UnknownToken { contract, to: to_address },
        },
        DecodedCall::Approve { spender, .. } => Decision::Approval { token, contract, spender },
    }
}

/// Build the display row for `tx` at zero-based position `index`.
pub fn classify(tx: &RawTransaction, index: usize, registry: &TokenRegistry) -> DisplayRow {
    let listed_to = || tx.to_address.clone().unwrap_or_else(|| CONTRACT_CREATION_LABEL.to_string());

    let (to_address, formatted_amount, kind) = match decide(tx, registry) {
        Decision::Native { raw, token } => {
            let amount = units_to_decimal(&raw, token.decimals);
            (
                listed_to(),
                format!("{} {}", amount, token.symbol),
                RowKind::NativeTransfer { symbol: token.symbol.clone(), amount },
            )
        }
        Decision::Token { raw, token, contract, to } => {
            let amount = units_to_decimal(&raw, token.decimals);
            (
                to,
                format!("{} {}", amount, token.symbol),
                RowKind::TokenTransfer {
                    symbol: token.symbol.clone(),
                    amount,
                    contract: contract.to_string(),
                },
            )
        }
        Decision::UnknownToken { contract, to } => (
            to,
            UNKNOWN_TOKEN_TRANSFER_LABEL.to_string(),
            RowKind::UnknownTokenTransfer { contract: contract.to_string() },
        ),
        Decision::Approval { token, contract, spender } => {
            let label = token.map(|t| t.symbol.as_str()).unwrap_or(UNKNOWN_TOKEN_LABEL);
            (
                spender,
                format!("{}: {}", APPROVAL_PREFIX, label),
                RowKind::Approval {
                    symbol: token.map(|t| t.symbol.clone()),
                    contract: contract.to_string(),
                },
            )
        }
        Decision::ContractCall { signature } => (
            listed_to(),
            format!("{}: {}", CONTRACT_CALL_PREFIX, signature),
            RowKind::ContractCall { method_signature: signature.to_string() },
        ),
        Decision::Unhandled => (listed_to(), UNHANDLED_CALL_LABEL.to_string(), RowKind::UnhandledCall),
        Decision::NoTransfer => {
            let symbol = registry.native_descriptor().symbol.clone();
            (
                listed_to(),
                format!("{} (0 {})", NO_TRANSFER_LABEL, symbol),
                RowKind::NoTransfer { symbol },
            )
        }
    };

    DisplayRow {
        sequence_number: index + 1,
        hash: tx.hash.clone(),
        from_address: tx.from_address.clone(),
        to_address,
        formatted_amount,
        formatted_date: format_timestamp(&tx.timestamp),
        kind,
    }
}

/// Classify a whole history, numbering rows from 1.
pub fn classify_all(transactions: &[RawTransaction], registry: &TokenRegistry) -> Vec<DisplayRow> {
    transactions
        .iter()
        .enumerate()
        .map(|(i, tx)| classify(tx, i, registry))
        .collect()
}

/// "2025-02-03T22:31:35.000000Z" → "2025-02-03 22:31:35 UTC". Unparseable input is echoed.
pub fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp.trim()) {
        Ok(dt) => dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::abi::{encode_approve, encode_transfer};
    use crate::engine::primitives::{hex_encode, parse_address_bytes};

    const WALLET: &str = "0x8861186d9513cfd5d1beb199355448ce5e96f105";
    const USDC: &str = "0xff9f502976e7bd2b4901ad7dd1131bb81e5567de";
    const Y: &str = "0x00000000000000000000000000000000000000aa";

    fn tx(value: &str, to: Option<&str>, input: Option<String>, method: Option<&str>) -> RawTransaction {
        RawTransaction {
            hash: "0xabc".into(),
            from_address: WALLET.into(),
            to_address: to.map(String::from),
            value_wei: value.into(),
            raw_input: input,
            method_signature: method.map(String::from),
            timestamp: "2025-02-03T22:31:35.000000Z".into(),
        }
    }

    fn transfer_input(to: &str, amount: &str) -> String {
        let to = parse_address_bytes(to).unwrap();
        let amount = parse_u256_decimal(amount).unwrap();
        hex_encode(&encode_transfer(&to, &amount))
    }

    #[test]
    fn native_value_formats_with_native_symbol() {
        let reg = TokenRegistry::airdao();
        let row = classify(&tx("10000000000000000000", Some(Y), None, None), 0, &reg);
        assert_eq!(row.sequence_number, 1);
        assert_eq!(row.formatted_amount, "10 AMB");
        assert_eq!(row.to_address, Y);
        assert_eq!(row.formatted_date, "2025-02-03 22:31:35 UTC");
    }

    #[test]
    fn native_value_wins_over_method() {
        let reg = TokenRegistry::airdao();
        let input = transfer_input(Y, "5000000");
        let row = classify(&tx("1", Some(USDC), Some(input), Some("transfer")), 3, &reg);
        assert_eq!(row.kind, RowKind::NativeTransfer { symbol: "AMB".into(), amount: "0.000000000000000001".into() });
        assert_eq!(row.to_address, USDC);
        assert_eq!(row.sequence_number, 4);
    }

    #[test]
    fn token_transfer_uses_decoded_destination() {
        let reg = TokenRegistry::airdao();
        let input = transfer_input(Y, "5000000");
        let row = classify(&tx("0", Some(USDC), Some(input), Some("transfer")), 0, &reg);
        assert_eq!(row.formatted_amount, "5 USDC");
        assert_eq!(row.to_address, Y);
    }

    #[test]
    fn unknown_contract_transfer_placeholder() {
        let reg = TokenRegistry::airdao();
        let input = transfer_input(Y, "5000000");
        let unknown = "0x1234567890123456789012345678901234567890";
        let row = classify(&tx("0", Some(unknown), Some(input), Some("transfer")), 0, &reg);
        assert_eq!(row.formatted_amount, UNKNOWN_TOKEN_TRANSFER_LABEL);
        assert_eq!(row.to_address, Y);
        assert_eq!(row.kind, RowKind::UnknownTokenTransfer { contract: unknown.into() });
    }

    #[test]
    fn approval_labels_spender_without_amount() {
        let reg = TokenRegistry::airdao();
        let spender = parse_address_bytes(Y).unwrap();
        let input = hex_encode(&encode_approve(&spender, &[0xff; 32]));
        let row = classify(&tx("0", Some(USDC), Some(input), Some("approve")), 0, &reg);
        assert_eq!(row.formatted_amount, "Approval: USDC");
        assert_eq!(row.to_address, Y);
        assert!(matches!(row.kind, RowKind::Approval { symbol: Some(ref s), .. } if s == "USDC"));
    }

    #[test]
    fn undecodable_call_shows_signature() {
        let reg = TokenRegistry::airdao();
        let row = classify(&tx("0", Some(USDC), Some("0xdeadbeef".into()), Some("swapExactTokens")), 0, &reg);
        assert_eq!(row.formatted_amount, "Contract call: swapExactTokens");
        assert_eq!(row.to_address, USDC);
    }

    #[test]
    fn decoded_call_on_contract_creation_is_unhandled() {
        let reg = TokenRegistry::airdao();
        let input = transfer_input(Y, "1");
        let row = classify(&tx("0", None, Some(input), Some("transfer")), 0, &reg);
        assert_eq!(row.kind, RowKind::UnhandledCall);
        assert_eq!(row.to_address, CONTRACT_CREATION_LABEL);
    }

    #[test]
    fn no_value_no_method_is_no_transfer() {
        let reg = TokenRegistry::airdao();
        let row = classify(&tx("0", Some(Y), Some("0x".into()), None), 0, &reg);
        assert_eq!(row.formatted_amount, "No transfer (0 AMB)");
        assert_eq!(row.kind, RowKind::NoTransfer { symbol: "AMB".into() });

        // Garbage value is not a positive value either.
        let row = classify(&tx("abc", Some(Y), None, Some("  ")), 0, &reg);
        assert_eq!(row.kind, RowKind::NoTransfer { symbol: "AMB".into() });
    }

    #[test]
    fn timestamp_fallback_echoes_input() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp("2025-02-03T22:31:35+02:00"), "2025-02-03 20:31:35 UTC");
    }

    #[test]
    fn classify_all_numbers_rows() {
        let reg = TokenRegistry::airdao();
        let txs = vec![tx("1", Some(Y), None, None), tx("0", Some(Y), None, None)];
        let rows = classify_all(&txs, &reg);
        assert_eq!(rows.iter().map(|r| r.sequence_number).collect::<Vec<_>>(), vec![1, 2]);
    }
}
