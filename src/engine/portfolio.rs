// WalletLens — Portfolio / Balance Queries
// Reads the wallet's balance of every registered asset and values it in USD.

use super::abi::encode_balance_of;
use super::price::PriceLookup;
use super::primitives::{parse_address_bytes, quantity_to_u256, units_to_decimal, units_to_f64, WalletAddress};
use super::registry::TokenRegistry;
use super::rpc::{eth_call, eth_get_balance};
use crate::atoms::constants::USER_AGENT;
use crate::atoms::error::LensResult;
use crate::atoms::types::{Holding, PortfolioSnapshot, TokenDescriptor};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;

/// Source of on-chain balances, in raw 32-byte units.
#[async_trait]
pub trait BalanceReader: Send + Sync {
    async fn native_balance(&self, wallet: &WalletAddress) -> LensResult<[u8; 32]>;
    async fn token_balance(&self, contract: &str, wallet: &WalletAddress) -> LensResult<[u8; 32]>;
}

/// `eth_getBalance` / `balanceOf` over JSON-RPC.
pub struct RpcBalanceReader {
    client: reqwest::Client,
    rpc_url: String,
    timeout: Duration,
}

impl RpcBalanceReader {
    pub fn new(rpc_url: &str, timeout: Duration) -> LensResult<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, rpc_url: rpc_url.to_string(), timeout })
    }
}

#[async_trait]
impl BalanceReader for RpcBalanceReader {
    async fn native_balance(&self, wallet: &WalletAddress) -> LensResult<[u8; 32]> {
        let hex = eth_get_balance(&self.client, &self.rpc_url, wallet.as_str(), self.timeout).await?;
        quantity_to_u256(&hex)
    }

    async fn token_balance(&self, contract: &str, wallet: &WalletAddress) -> LensResult<[u8; 32]> {
        let owner = parse_address_bytes(wallet.as_str())?;
        let calldata = encode_balance_of(&owner);
        let hex = eth_call(&self.client, &self.rpc_url, contract, &calldata, self.timeout).await?;
        quantity_to_u256(&hex)
    }
}

async fn read_one<R: BalanceReader + ?Sized>(
    reader: &R,
    token: &TokenDescriptor,
    wallet: &WalletAddress,
) -> LensResult<[u8; 32]> {
    match token.contract_address.as_deref() {
        None => reader.native_balance(wallet).await,
        Some(contract) => reader.token_balance(contract, wallet).await,
    }
}

/// Balance and USD value of every registered asset, native first.
/// A failed read is reported as a zero holding.
pub async fn portfolio_snapshot<R, P>(
    reader: &R,
    registry: &TokenRegistry,
    prices: &P,
    wallet: &WalletAddress,
) -> PortfolioSnapshot
where
    R: BalanceReader + ?Sized,
    P: PriceLookup + ?Sized,
{
    let mut snapshot = PortfolioSnapshot::default();

    for token in registry.all() {
        let raw = match read_one(reader, token, wallet).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("[portfolio] {} balance read failed for {}: {}", token.symbol, wallet, e);
                [0u8; 32]
            }
        };

        let amount = units_to_f64(&raw, token.decimals);
        let price = prices.usd_price(&token.symbol);
        let usd_value = if price.is_finite() && price > 0.0 { amount * price } else { 0.0 };
        debug!("[portfolio] {} {} (${:.2})", token.symbol, amount, usd_value);

        snapshot.total_usd += usd_value;
        snapshot.holdings.push(Holding {
            symbol: token.symbol.clone(),
            balance: units_to_decimal(&raw, token.decimals),
            amount,
            usd_value,
        });
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::error::LensError;
    use crate::engine::primitives::parse_u256_decimal;
    use std::collections::HashMap;

    const WALLET: &str = "0x8861186d9513cfd5d1beb199355448ce5e96f105";

    struct MockReader {
        native: &'static str,
        tokens: HashMap<&'static str, &'static str>,
    }

    #[async_trait]
    impl BalanceReader for MockReader {
        async fn native_balance(&self, _wallet: &WalletAddress) -> LensResult<[u8; 32]> {
            parse_u256_decimal(self.native)
        }

        async fn token_balance(&self, contract: &str, _wallet: &WalletAddress) -> LensResult<[u8; 32]> {
            match self.tokens.get(contract) {
                Some(v) => parse_u256_decimal(v),
                None => Err(LensError::Rpc("execution reverted".into())),
            }
        }
    }

    #[tokio::test]
    async fn values_every_asset_native_first() {
        let reader = MockReader {
            native: "2500000000000000000",
            tokens: HashMap::from([("0xff9f502976e7bd2b4901ad7dd1131bb81e5567de", "12500000")]),
        };
        let prices = |sym: &str| match sym {
            "AMB" => 0.01,
            "USDC" => 1.0,
            _ => 0.0,
        };
        let wallet = WalletAddress::parse(WALLET).unwrap();
        let snap = portfolio_snapshot(&reader, &TokenRegistry::airdao(), &prices, &wallet).await;

        assert_eq!(snap.holdings.len(), 4);
        assert_eq!(snap.holdings[0].symbol, "AMB");
        assert_eq!(snap.holdings[0].balance, "2.5");
        assert!((snap.holdings[0].usd_value - 0.025).abs() < 1e-12);

        let usdc = snap.holdings.iter().find(|h| h.symbol == "USDC").unwrap();
        assert_eq!(usdc.balance, "12.5");
        assert_eq!(usdc.usd_value, 12.5);
        assert!((snap.total_usd - 12.525).abs() < 1e-9);
    }

    #[tokio::test]
    async fn failed_read_degrades_to_zero() {
        let reader = MockReader { native: "0", tokens: HashMap::new() };
        let wallet = WalletAddress::parse(WALLET).unwrap();
        let snap = portfolio_snapshot(&reader, &TokenRegistry::airdao(), &|_: &str| 1.0, &wallet).await;

        assert_eq!(snap.holdings.len(), 4);
        assert!(snap.holdings.iter().all(|h| h.balance == "0" && h.usd_value == 0.0));
        assert_eq!(snap.total_usd, 0.0);
    }
}
