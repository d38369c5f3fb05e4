// WalletLens — Aggregator
// Folds a wallet's history into per-token credit/debit totals and per-counterparty
// running totals. Every call starts from scratch; nothing is carried between passes.

use super::classify::{decide, Decision};
use super::primitives::{normalize_address, units_to_f64, WalletAddress};
use super::registry::TokenRegistry;
use crate::atoms::constants::CONTRACT_CREATION_KEY;
use crate::atoms::types::{
    CounterpartyKey, CounterpartyTotals, PortfolioAggregate, RawTransaction, TokenFlow, TokenTotals,
};

/// The value movement attributed to one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    pub symbol: String,
    pub amount: f64,
    pub from: String,
    pub to: String,
}

/// Native value or a decoded transfer on a registered token; anything else
/// (approvals, unknown tokens, undecodable calls) moves nothing.
pub fn attribute(tx: &RawTransaction, registry: &TokenRegistry) -> Option<Attribution> {
    match decide(tx, registry) {
        Decision::Native { raw, token } => Some(Attribution {
            symbol: token.symbol.clone(),
            amount: units_to_f64(&raw, token.decimals),
            from: normalize_address(&tx.from_address),
            to: tx
                .to_address
                .as_deref()
                .map(normalize_address)
                .unwrap_or_else(|| CONTRACT_CREATION_KEY.to_string()),
        }),
        Decision::Token { raw, token, to, .. } => Some(Attribution {
            symbol: token.symbol.clone(),
            amount: units_to_f64(&raw, token.decimals),
            from: normalize_address(&tx.from_address),
            to: normalize_address(&to),
        }),
        _ => None,
    }
}

/// Single pass over `transactions` for `wallet`.
///
/// A transfer to the wallet is a credit and records its sender in `received`;
/// a transfer from the wallet is a debit and records its recipient in `sent`.
/// Transactions where the wallet is neither party contribute nothing.
pub fn aggregate(
    transactions: &[RawTransaction],
    wallet: &WalletAddress,
    registry: &TokenRegistry,
) -> PortfolioAggregate {
    let mut result = PortfolioAggregate {
        totals: TokenTotals::seeded(registry),
        ..Default::default()
    };

    for tx in transactions {
        let Some(a) = attribute(tx, registry) else { continue };

        if wallet.matches(&a.to) {
            result.totals.credit(&a.symbol, a.amount);
            result.received.add(&a.from, &a.symbol, a.amount);
        }
        if wallet.matches(&a.from) {
            result.totals.debit(&a.symbol, a.amount);
            result.sent.add(&a.to, &a.symbol, a.amount);
        }
    }

    result
}

// ── TokenTotals ────────────────────────────────────────────────────────────

impl TokenTotals {
    /// Zeroed flow for every registered asset, native first.
    pub fn seeded(registry: &TokenRegistry) -> Self {
        let flows = registry
            .all()
            .map(|t| (t.symbol.clone(), TokenFlow::default()))
            .collect();
        Self { flows }
    }

    pub fn get(&self, symbol: &str) -> Option<&TokenFlow> {
        self.flows.get(symbol)
    }

    pub fn credit(&mut self, symbol: &str, amount: f64) {
        let flow = self.flows.entry(symbol.to_string()).or_default();
        flow.credited += amount;
        flow.credit_count += 1;
    }

    pub fn debit(&mut self, symbol: &str, amount: f64) {
        let flow = self.flows.entry(symbol.to_string()).or_default();
        flow.debited += amount;
        flow.debit_count += 1;
    }

    pub fn total_credited(&self) -> f64 {
        self.flows.values().map(|f| f.credited).sum()
    }

    pub fn total_debited(&self) -> f64 {
        self.flows.values().map(|f| f.debited).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TokenFlow)> {
        self.flows.iter()
    }

    pub fn is_all_zero(&self) -> bool {
        self.flows.values().all(|f| *f == TokenFlow::default())
    }
}

impl TokenFlow {
    pub fn net(&self) -> f64 {
        self.credited - self.debited
    }
}

// ── CounterpartyTotals ────────────────────────────────────────────────────

impl CounterpartyTotals {
    /// Accumulate `amount` under (address, symbol). Addresses are lower-cased
    /// so differently-cased renderings land in the same entry.
    pub fn add(&mut self, address: &str, symbol: &str, amount: f64) {
        let key = CounterpartyKey { address: normalize_address(address), symbol: symbol.to_string() };
        *self.entries.entry(key).or_insert(0.0) += amount;
    }

    pub fn get(&self, address: &str, symbol: &str) -> Option<f64> {
        let key = CounterpartyKey { address: normalize_address(address), symbol: symbol.to_string() };
        self.entries.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CounterpartyKey, &f64)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
