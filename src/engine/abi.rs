// WalletLens — ERC-20 ABI Encoding / Decoding
// Selector hashing, fixed-width call encoders, and the transfer/approve decoder.

use super::primitives::{address_from_word, hex_decode, keccak256};
use crate::atoms::constants::{
    APPROVE_SELECTOR, APPROVE_SIGNATURE, BALANCE_OF_SIGNATURE, TRANSFER_SELECTOR,
    TRANSFER_SIGNATURE, TWO_ARG_CALL_LEN,
};
use crate::atoms::types::DecodedCall;

/// Compute 4-byte function selector from signature
pub fn function_selector(sig: &str) -> [u8; 4] {
    let hash = keccak256(sig.as_bytes());
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&hash[..4]);
    sel
}

/// ABI-encode an address (left-padded to 32 bytes)
pub fn abi_encode_address(addr: &[u8; 20]) -> Vec<u8> {
    let mut encoded = vec![0u8; 12];
    encoded.extend_from_slice(addr);
    encoded
}

/// Encode ERC-20 balanceOf(address)
pub fn encode_balance_of(owner: &[u8; 20]) -> Vec<u8> {
    let mut data = function_selector(BALANCE_OF_SIGNATURE).to_vec();
    data.extend_from_slice(&abi_encode_address(owner));
    data
}

/// Encode ERC-20 transfer(address, uint256)
pub fn encode_transfer(to: &[u8; 20], amount: &[u8; 32]) -> Vec<u8> {
    let mut data = function_selector(TRANSFER_SIGNATURE).to_vec();
    data.extend_from_slice(&abi_encode_address(to));
    data.extend_from_slice(amount);
    data
}

/// Encode ERC-20 approve(address, uint256)
pub fn encode_approve(spender: &[u8; 20], amount: &[u8; 32]) -> Vec<u8> {
    let mut data = function_selector(APPROVE_SIGNATURE).to_vec();
    data.extend_from_slice(&abi_encode_address(spender));
    data.extend_from_slice(amount);
    data
}

/// Decode raw transaction input into a transfer or approve call.
///
/// Layout is positional: selector at [0..4), address word at [4..36),
/// uint256 word at [36..68). Anything else (unknown selector, short or
/// malformed hex) yields `None`; callers treat that as an unrecognised call.
pub fn decode_call(raw_input_hex: &str) -> Option<DecodedCall> {
    let body = raw_input_hex.trim();
    let body = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")).unwrap_or(body);
    // Selector needs 8 hex chars; odd lengths are not valid calldata.
    if body.len() < 8 || body.len() % 2 != 0 {
        return None;
    }
    let bytes = hex_decode(body).ok()?;
    let selector: [u8; 4] = bytes.get(..4)?.try_into().ok()?;

    if selector != TRANSFER_SELECTOR && selector != APPROVE_SELECTOR {
        return None;
    }
    if bytes.len() < TWO_ARG_CALL_LEN {
        return None;
    }

    let address = address_from_word(&bytes[4..36]);
    let mut raw_amount = [0u8; 32];
    raw_amount.copy_from_slice(&bytes[36..68]);

    if selector == TRANSFER_SELECTOR {
        Some(DecodedCall::Transfer { to_address: address, raw_amount })
    } else {
        Some(DecodedCall::Approve { spender: address, raw_amount })
    }
}

impl DecodedCall {
    pub fn method_name(&self) -> &'static str {
        match self {
            DecodedCall::Transfer { .. } => "transfer",
            DecodedCall::Approve { .. } => "approve",
        }
    }

    /// Decoded recipient (transfer) or spender (approve).
    pub fn destination(&self) -> &str {
        match self {
            DecodedCall::Transfer { to_address, .. } => to_address,
            DecodedCall::Approve { spender, .. } => spender,
        }
    }

    pub fn raw_amount(&self) -> &[u8; 32] {
        match self {
            DecodedCall::Transfer { raw_amount, .. } | DecodedCall::Approve { raw_amount, .. } => {
                raw_amount
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::primitives::{hex_encode, parse_u256_decimal};

    #[test]
    fn function_selector_transfer() {
        // keccak256("transfer(address,uint256)") first 4 bytes = 0xa9059cbb
        let sel = function_selector("transfer(address,uint256)");
        assert_eq!(hex_encode(&sel), "0xa9059cbb");
        assert_eq!(sel, TRANSFER_SELECTOR);
    }

    #[test]
    fn function_selector_approve() {
        // keccak256("approve(address,uint256)") first 4 bytes = 0x095ea7b3
        let sel = function_selector("approve(address,uint256)");
        assert_eq!(hex_encode(&sel), "0x095ea7b3");
        assert_eq!(sel, APPROVE_SELECTOR);
    }

    #[test]
    fn function_selector_balance_of() {
        // keccak256("balanceOf(address)") first 4 bytes = 0x70a08231
        assert_eq!(hex_encode(&function_selector("balanceOf(address)")), "0x70a08231");
    }

    #[test]
    fn abi_encode_address_padding() {
        let encoded = abi_encode_address(&[7u8; 20]);
        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..12], &[0u8; 12]);
    }

    #[test]
    fn encode_balance_of_length() {
        assert_eq!(encode_balance_of(&[1u8; 20]).len(), 4 + 32);
    }

    #[test]
    fn decode_transfer_roundtrip() {
        let to = [0xABu8; 20];
        let amount = parse_u256_decimal("5000000").unwrap();
        let input = hex_encode(&encode_transfer(&to, &amount));

        let call = decode_call(&input).expect("transfer decodes");
        assert_eq!(call.method_name(), "transfer");
        assert_eq!(call.destination(), hex_encode(&to));
        assert_eq!(call.raw_amount(), &amount);
    }

    #[test]
    fn decode_approve_names_spender() {
        let spender = [0x11u8; 20];
        let amount = [0xffu8; 32];
        let input = hex_encode(&encode_approve(&spender, &amount));

        match decode_call(&input) {
            Some(DecodedCall::Approve { spender: s, raw_amount }) => {
                assert_eq!(s, hex_encode(&spender));
                assert_eq!(raw_amount, amount);
            }
            other => panic!("expected approve, got {:?}", other),
        }
    }

    #[test]
    fn decode_without_prefix() {
        let input = hex_encode(&encode_transfer(&[2u8; 20], &[0u8; 32]));
        assert!(decode_call(input.trim_start_matches("0x")).is_some());
    }

    #[test]
    fn decode_rejects_short_and_unknown() {
        assert_eq!(decode_call(""), None);
        assert_eq!(decode_call("0x"), None);
        assert_eq!(decode_call("0xa9059c"), None);
        // Known selector, truncated arguments.
        assert_eq!(decode_call("0xa9059cbb0000"), None);
        // balanceOf is not a transfer event.
        let balance_call = hex_encode(&encode_balance_of(&[1u8; 20]));
        assert_eq!(decode_call(&balance_call), None);
    }

    #[test]
    fn decode_rejects_malformed_hex() {
        let mut input = hex_encode(&encode_transfer(&[2u8; 20], &[0u8; 32]));
        input.push('z');
        input.push('z');
        assert_eq!(decode_call(&input), None);
        // Odd length
        input.pop();
        input.pop();
        input.push('0');
        assert_eq!(decode_call(&input), None);
    }
}
