// WalletLens Engine — wallet history classification and portfolio views
//
// Submodules:
//   primitives — keccak256, hex encode/decode, address utils, U256 unit conversion
//   abi        — ERC-20 call encoding + transfer/approve decoding
//   registry   — contract address → token descriptor resolution
//   classify   — raw transaction → display row
//   aggregate  — per-token credit/debit totals, per-counterparty sums
//   rank       — USD-valued top-N counterparties
//   price      — price lookup, CoinGecko source, TTL cache
//   explorer   — Blockscout transaction history source
//   rpc        — JSON-RPC helpers (eth_getBalance, eth_call)
//   portfolio  — balance reads + USD valuation
//   session    — connected wallet, refresh and polling loop

pub mod primitives;
pub mod abi;
pub mod registry;
pub mod classify;
pub mod aggregate;
pub mod rank;
pub mod price;
pub mod explorer;
pub(crate) mod rpc;
pub mod portfolio;
pub mod session;

pub use aggregate::{aggregate, attribute, Attribution};
pub use classify::{classify, classify_all, format_timestamp};
pub use explorer::{BlockscoutSource, TransactionSource};
pub use portfolio::{portfolio_snapshot, BalanceReader, RpcBalanceReader};
pub use price::{CoinGeckoPriceSource, PriceCache, PriceLookup, PriceSource};
pub use primitives::WalletAddress;
pub use rank::{top_five, top_n};
pub use registry::TokenRegistry;
pub use session::{SessionEvent, SessionSettings, WalletSession};
