// WalletLens — Token Registry
// Static contract-address → {symbol, decimals} resolution, plus the native asset.

use super::primitives::{is_valid_address, normalize_address};
use crate::atoms::constants::{KNOWN_TOKENS, NATIVE_DECIMALS, NATIVE_PRICE_ID, NATIVE_SYMBOL};
use crate::atoms::error::{LensError, LensResult};
use crate::atoms::types::TokenDescriptor;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Immutable after construction; share it behind an `Arc` across sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRegistry {
    native: TokenDescriptor,
    /// Keyed by lower-cased contract address, in configuration order.
    tokens: IndexMap<String, TokenDescriptor>,
}

impl TokenRegistry {
    /// Build a registry, normalising addresses and rejecting duplicates.
    pub fn new(native: TokenDescriptor, tokens: Vec<TokenDescriptor>) -> LensResult<Self> {
        let mut native = native;
        native.contract_address = None;
        native.symbol = native.symbol.trim().to_uppercase();

        let mut symbols: HashSet<String> = HashSet::new();
        symbols.insert(native.symbol.clone());

        let mut map = IndexMap::with_capacity(tokens.len());
        for mut token in tokens {
            let addr = token
                .contract_address
                .as_deref()
                .ok_or_else(|| LensError::Config(format!("Token '{}' has no contract address", token.symbol)))?;
            if !is_valid_address(addr) {
                return Err(LensError::InvalidAddress(addr.to_string()));
            }
            let key = normalize_address(addr);
            token.symbol = token.symbol.trim().to_uppercase();
            if !symbols.insert(token.symbol.clone()) {
                return Err(LensError::Config(format!("Duplicate token symbol '{}'", token.symbol)));
            }
            if map.contains_key(&key) {
                return Err(LensError::Config(format!("Duplicate token contract '{}'", key)));
            }
            token.contract_address = Some(key.clone());
            map.insert(key, token);
        }

        Ok(Self { native, tokens: map })
    }

    /// AMB plus the well-known AirDAO ERC-20 tokens.
    pub fn airdao() -> Self {
        let native = TokenDescriptor {
            symbol: NATIVE_SYMBOL.to_string(),
            decimals: NATIVE_DECIMALS,
            contract_address: None,
            price_id: Some(NATIVE_PRICE_ID.to_string()),
        };
        let tokens = KNOWN_TOKENS
            .iter()
            .map(|(sym, addr, dec, price_id)| {
                let key = normalize_address(addr);
                let desc = TokenDescriptor {
                    symbol: sym.to_string(),
                    decimals: *dec,
                    contract_address: Some(key.clone()),
                    price_id: Some(price_id.to_string()),
                };
                (key, desc)
            })
            .collect();
        Self { native, tokens }
    }

    /// Case-insensitive contract lookup. Unknown contracts yield `None`.
    pub fn lookup(&self, contract_address: &str) -> Option<&TokenDescriptor> {
        self.tokens.get(&normalize_address(contract_address))
    }

    pub fn native_descriptor(&self) -> &TokenDescriptor {
        &self.native
    }

    /// ERC-20 entries in configuration order.
    pub fn tokens(&self) -> impl Iterator<Item = &TokenDescriptor> {
        self.tokens.values()
    }

    /// Native asset first, then every ERC-20 entry.
    pub fn all(&self) -> impl Iterator<Item = &TokenDescriptor> {
        std::iter::once(&self.native).chain(self.tokens.values())
    }

    /// Number of ERC-20 entries (the native asset is not counted).
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::airdao()
    }
}
