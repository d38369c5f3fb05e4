// WalletLens — transaction classification and portfolio aggregation for an
// EVM wallet.
//
// Layout:
//   atoms  — pure types, constants and the error enum (no I/O)
//   engine — decoder, registry, classifier, aggregator, ranker and the
//            network adapters that feed them
//   config — TOML configuration with environment overrides

pub mod atoms;
pub mod config;
pub mod engine;

pub use atoms::error::{LensError, LensResult};
pub use atoms::types::{
    CounterpartyKey, CounterpartyTotals, DashboardView, DecodedCall, DisplayRow, Holding, PortfolioAggregate,
    PortfolioSnapshot, PriceTable, RankedCounterparty, RawTransaction, RowKind, TokenDescriptor, TokenFlow,
    TokenTotals,
};
pub use config::LensConfig;
