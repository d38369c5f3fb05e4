// ── WalletLens Atoms: Data Types ───────────────────────────────────────────
//
// Pure data definitions shared by every layer (no logic, no I/O).
// Follows the project pattern: structs in atoms/, impls in engine/.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════════
// SECTION 1: Inputs
// ═══════════════════════════════════════════════════════════════════════════

/// One on-chain transaction as delivered by the transaction source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub hash: String,
    pub from_address: String,
    /// None for contract-creation transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
    /// Native value in wei, as a decimal integer string.
    pub value_wei: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_signature: Option<String>,
    /// ISO 8601 / RFC 3339 timestamp.
    pub timestamp: String,
}

/// Symbol and precision of an asset. `contract_address == None` is the native asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub symbol: String,
    pub decimals: u8,
    /// Lower-cased ERC-20 contract address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    /// Price-feed identifier (CoinGecko coin id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════
// SECTION 2: Decoded calls and display rows
// ═══════════════════════════════════════════════════════════════════════════

/// An ERC-20 call recovered from transaction input. Each method carries its
/// own argument names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedCall {
    Transfer { to_address: String, raw_amount: [u8; 32] },
    Approve { spender: String, raw_amount: [u8; 32] },
}

/// The classification decision behind a display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowKind {
    NativeTransfer { symbol: String, amount: String },
    TokenTransfer { symbol: String, amount: String, contract: String },
    UnknownTokenTransfer { contract: String },
    Approval {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<String>,
        contract: String,
    },
    ContractCall { method_signature: String },
    UnhandledCall,
    NoTransfer { symbol: String },
}

/// One rendered line of the transaction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    /// 1-based position in the history.
    pub sequence_number: usize,
    pub hash: String,
    pub from_address: String,
    pub to_address: String,
    pub formatted_amount: String,
    pub formatted_date: String,
    pub kind: RowKind,
}

// ═══════════════════════════════════════════════════════════════════════════
// SECTION 3: Aggregates
// ═══════════════════════════════════════════════════════════════════════════

/// Credits and debits of one asset for the tracked wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenFlow {
    pub credited: f64,
    pub debited: f64,
    pub credit_count: u32,
    pub debit_count: u32,
}

/// Per-symbol flows, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenTotals {
    pub flows: IndexMap<String, TokenFlow>,
}

/// Key of a counterparty table entry. `address` is lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterpartyKey {
    pub address: String,
    pub symbol: String,
}

/// Running totals per (counterparty, symbol), in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterpartyTotals {
    pub entries: IndexMap<CounterpartyKey, f64>,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioAggregate {
    pub totals: TokenTotals,
    /// Addresses the wallet sent to (beneficiaries).
    pub sent: CounterpartyTotals,
    /// Addresses the wallet received from (benefactors).
    pub received: CounterpartyTotals,
}

/// A counterparty entry valued in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCounterparty {
    pub address: String,
    pub symbol: String,
    pub amount: f64,
    pub usd_value: f64,
}

// ═══════════════════════════════════════════════════════════════════════════
// SECTION 4: Prices and holdings
// ═══════════════════════════════════════════════════════════════════════════

/// USD unit prices keyed by upper-case symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    pub prices: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    /// Exact balance, trailing zeros trimmed.
    pub balance: String,
    pub amount: f64,
    pub usd_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub holdings: Vec<Holding>,
    pub total_usd: f64,
}

/// Everything the history widgets render for one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub wallet: String,
    pub rows: Vec<DisplayRow>,
    pub totals: TokenTotals,
    pub top_beneficiaries: Vec<RankedCounterparty>,
    pub top_benefactors: Vec<RankedCounterparty>,
}
