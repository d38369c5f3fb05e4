// ── WalletLens Atoms: Error Types ──────────────────────────────────────────
// Single canonical error enum for the crate, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (I/O, Network, Config, RPC…).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • The classification core (decoder, registry, classifier, aggregator,
//     ranker) never produces these; only the I/O adapters and config do.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LensError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Config file is not valid TOML or does not match the schema.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// HTTP / network failure (reqwest layer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON-RPC node returned an error object or a malformed result.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Block explorer returned an unusable page.
    #[error("Explorer error: {0}")]
    Explorer(String),

    /// Price API returned an unusable response.
    #[error("Price feed error: {0}")]
    PriceFeed(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A string that was required to be an EVM address is not one.
    #[error("Invalid address: '{0}'")]
    InvalidAddress(String),

    /// Catch-all for errors that do not yet have a dedicated variant.
    #[error("{0}")]
    Other(String),
}

// ── String bridges ─────────────────────────────────────────────────────────
// Allows `.ok_or("...")?` inside functions returning `LensResult<T>`.

impl From<String> for LensError {
    fn from(s: String) -> Self {
        LensError::Other(s)
    }
}

impl From<&str> for LensError {
    fn from(s: &str) -> Self {
        LensError::Other(s.to_string())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All fallible operations in the crate return this type.
pub type LensResult<T> = Result<T, LensError>;
