// WalletLens — EVM Primitives
// Hex, keccak, address normalisation, 256-bit unit conversion, and display helpers.

use crate::atoms::error::{LensError, LensResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keccak-256 hash (Ethereum's hash function)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    use tiny_keccak::{Hasher, Keccak};
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Hex-encode bytes with 0x prefix
pub fn hex_encode(data: &[u8]) -> String {
    format!("0x{}", data.iter().map(|b| format!("{:02x}", b)).collect::<String>())
}

/// Hex-decode a string with or without 0x prefix.
/// Odd-length input (minimal RPC quantities like "0x1a3") is left-padded.
pub fn hex_decode(s: &str) -> LensResult<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let padded;
    let hex_str = if s.len() % 2 != 0 {
        padded = format!("0{}", s);
        &padded
    } else {
        s
    };
    if !hex_str.is_ascii() {
        return Err(LensError::Other("Hex decode: non-ASCII input".into()));
    }
    (0..hex_str.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex_str[i..i + 2], 16)
                .map_err(|e| LensError::Other(format!("Hex decode: {}", e)))
        })
        .collect()
}

// ── Addresses ──────────────────────────────────────────────────────────────

/// Canonical map-key form of an address: trimmed and lower-cased.
pub fn normalize_address(addr: &str) -> String {
    addr.trim().to_lowercase()
}

/// `0x` followed by exactly 40 hex digits (any case).
pub fn is_valid_address(addr: &str) -> bool {
    let addr = addr.trim();
    match addr.strip_prefix("0x").or_else(|| addr.strip_prefix("0X")) {
        Some(body) => body.len() == 40 && body.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Case-insensitive address equality.
pub fn same_address(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Parse an address string to 20 bytes
pub fn parse_address_bytes(addr: &str) -> LensResult<[u8; 20]> {
    if !is_valid_address(addr) {
        return Err(LensError::InvalidAddress(addr.trim().to_string()));
    }
    let bytes = hex_decode(addr)?;
    let mut arr = [0u8; 20];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// Render the low 20 bytes of a 32-byte ABI word as a lower-case address.
pub fn address_from_word(word: &[u8]) -> String {
    let start = word.len().saturating_sub(20);
    hex_encode(&word[start..])
}

/// A syntactically valid, lower-cased wallet address.
///
/// Aggregation only accepts this type, so a malformed wallet is rejected
/// once, up front, instead of silently matching nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(addr: &str) -> LensResult<Self> {
        if !is_valid_address(addr) {
            return Err(LensError::InvalidAddress(addr.trim().to_string()));
        }
        Ok(Self(normalize_address(addr)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against an arbitrary address string.
    pub fn matches(&self, other: &str) -> bool {
        same_address(&self.0, other)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = LensError;

    fn try_from(value: String) -> LensResult<Self> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(addr: WalletAddress) -> Self {
        addr.0
    }
}

// ── 256-bit unit conversion ───────────────────────────────────────────────

/// Parse a U256 from a decimal string into big-endian bytes.
/// Rejects empty input, non-digits and values that do not fit in 256 bits.
pub fn parse_u256_decimal(s: &str) -> LensResult<[u8; 32]> {
    let s = s.trim();
    if s.is_empty() {
        return Err(LensError::Other("Empty decimal string".into()));
    }

    let mut digits: Vec<u8> = Vec::with_capacity(s.len());
    for c in s.chars() {
        if !c.is_ascii_digit() {
            return Err(LensError::Other(format!("Invalid decimal character: {}", c)));
        }
        digits.push(c as u8 - b'0');
    }

    // Repeated division by 256, least significant byte first.
    let mut result = [0u8; 32];
    let mut big = digits;
    let mut byte_pos = 32usize;
    while !big.iter().all(|&d| d == 0) {
        if byte_pos == 0 {
            return Err(LensError::Other(format!("Value exceeds 256 bits: {}", s)));
        }
        let mut remainder = 0u16;
        let mut quotient = Vec::with_capacity(big.len());
        for &d in &big {
            let val = remainder * 10 + d as u16;
            let q = val / 256;
            remainder = val % 256;
            if !quotient.is_empty() || q > 0 {
                quotient.push(q as u8);
            }
        }
        byte_pos -= 1;
        result[byte_pos] = remainder as u8;
        big = quotient;
    }
    Ok(result)
}

/// Parse a JSON-RPC quantity ("0x1a3", or a full 32-byte word) into U256 bytes.
pub fn quantity_to_u256(hex: &str) -> LensResult<[u8; 32]> {
    let bytes = hex_decode(hex)?;
    let significant = match bytes.iter().position(|&b| b != 0) {
        Some(pos) => &bytes[pos..],
        None => &[][..],
    };
    if significant.len() > 32 {
        return Err(LensError::Other(format!("Quantity exceeds 256 bits: {}", hex)));
    }
    let mut out = [0u8; 32];
    out[32 - significant.len()..].copy_from_slice(significant);
    Ok(out)
}

pub fn is_zero(value: &[u8; 32]) -> bool {
    value.iter().all(|&b| b == 0)
}

/// Convert raw units to a human-readable decimal string, trailing zeros trimmed.
/// e.g. 5_000_000 with 6 decimals → "5", 1_500_000 → "1.5"
pub fn units_to_decimal(raw: &[u8; 32], decimals: u8) -> String {
    // Big-endian bytes → decimal digits (most significant first)
    let mut value: Vec<u8> = Vec::new();
    for &b in raw {
        let mut carry = b as u16;
        for d in value.iter_mut().rev() {
            let val = *d as u16 * 256 + carry;
            *d = (val % 10) as u8;
            carry = val / 10;
        }
        while carry > 0 {
            value.insert(0, (carry % 10) as u8);
            carry /= 10;
        }
    }
    if value.is_empty() {
        value.push(0);
    }

    let decimal_str: String = value.iter().map(|d| (d + b'0') as char).collect();

    if decimals == 0 {
        return decimal_str;
    }

    let dec = decimals as usize;
    let padded = if decimal_str.len() <= dec {
        format!("{:0>width$}", decimal_str, width = dec + 1)
    } else {
        decimal_str
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - dec);
    let trimmed_frac = frac_part.trim_end_matches('0');
    if trimmed_frac.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, trimmed_frac)
    }
}

/// Float view of raw units, used for totals and USD valuation.
pub fn units_to_f64(raw: &[u8; 32], decimals: u8) -> f64 {
    units_to_decimal(raw, decimals).parse().unwrap_or(0.0)
}

// ── Display helpers ───────────────────────────────────────────────────────

/// Shorten a hash or address to `front...back`. Short strings pass through.
pub fn truncate_middle(s: &str, front: usize, back: usize) -> String {
    let len = s.chars().count();
    if len < front + back {
        return s.to_string();
    }
    let head: String = s.chars().take(front).collect();
    let tail: String = s.chars().skip(len - back).collect();
    format!("{}...{}", head, tail)
}

/// Two fixed decimals with thousands separators, e.g. 12345.678 → "12,345.68"
pub fn format_fixed2(n: f64) -> String {
    let fixed = format!("{:.2}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if n < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
