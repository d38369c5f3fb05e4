// WalletLens — Configuration
//
// Loads `~/.config/walletlens/config.toml` (or an explicit path), layers
// environment overrides on top, and validates the result. Every field has a
// default, so an empty file (or no file) reproduces the AirDAO deployment.

use crate::atoms::constants::{
    DEFAULT_BALANCES_POLL_SECS, DEFAULT_EXPLORER_MAX_PAGES, DEFAULT_EXPLORER_URL, DEFAULT_PRICE_API_URL,
    DEFAULT_PRICE_TTL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RPC_URL, DEFAULT_TOP_N,
    DEFAULT_TRANSACTIONS_POLL_SECS, ENV_EXPLORER_URL, ENV_PRICE_API_URL, ENV_RPC_URL, KNOWN_TOKENS,
    NATIVE_DECIMALS, NATIVE_PRICE_ID, NATIVE_SYMBOL,
};
use crate::atoms::error::{LensError, LensResult};
use crate::atoms::types::TokenDescriptor;
use crate::engine::registry::TokenRegistry;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ── Config Types ───────────────────────────────────────────────────────────

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub network: NetworkConfig,
    pub polling: PollingConfig,
    pub explorer: ExplorerConfig,
    pub display: DisplayConfig,
    pub native: NativeConfig,
    pub tokens: Vec<TokenConfig>,
}

/// `[network]` — remote endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub explorer_url: String,
    pub price_api_url: String,
    pub request_timeout_secs: u64,
}

/// `[polling]` — refresh cadence of the watch loop and the price cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub transactions_secs: u64,
    pub balances_secs: u64,
    pub price_ttl_secs: u64,
}

/// `[explorer]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Upper bound on pages followed per history fetch.
    pub max_pages: u32,
}

/// `[display]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub top_n: usize,
}

/// `[native]` — the chain's gas asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    pub symbol: String,
    pub decimals: u8,
    pub price_id: Option<String>,
}

/// `[[tokens]]` — repeatable ERC-20 registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub symbol: String,
    pub address: String,
    #[serde(default = "default_token_decimals")]
    pub decimals: u8,
    #[serde(default)]
    pub price_id: Option<String>,
}

fn default_token_decimals() -> u8 {
    18
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            polling: PollingConfig::default(),
            explorer: ExplorerConfig::default(),
            display: DisplayConfig::default(),
            native: NativeConfig::default(),
            tokens: KNOWN_TOKENS
                .iter()
                .map(|(symbol, address, decimals, price_id)| TokenConfig {
                    symbol: symbol.to_string(),
                    address: address.to_string(),
                    decimals: *decimals,
                    price_id: Some(price_id.to_string()),
                })
                .collect(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            transactions_secs: DEFAULT_TRANSACTIONS_POLL_SECS,
            balances_secs: DEFAULT_BALANCES_POLL_SECS,
            price_ttl_secs: DEFAULT_PRICE_TTL_SECS,
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self { max_pages: DEFAULT_EXPLORER_MAX_PAGES }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            symbol: NATIVE_SYMBOL.to_string(),
            decimals: NATIVE_DECIMALS,
            price_id: Some(NATIVE_PRICE_ID.to_string()),
        }
    }
}

// ── Loading ────────────────────────────────────────────────────────────────

/// Returns the default config path: `<config_dir>/walletlens/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("walletlens").join("config.toml"))
}

impl LensConfig {
    /// Parse a TOML document. Missing sections take their defaults.
    pub fn from_toml(content: &str) -> LensResult<Self> {
        Ok(toml::from_str::<LensConfig>(content)?)
    }

    /// Load, apply environment overrides, and validate.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> LensResult<Self> {
        let mut config = match path {
            Some(p) => {
                info!("[config] loading {}", p.display());
                Self::from_toml(&std::fs::read_to_string(p)?)?
            }
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(p) => {
                    info!("[config] loading {}", p.display());
                    Self::from_toml(&std::fs::read_to_string(&p)?)?
                }
                None => {
                    debug!("[config] no config file, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replace endpoint URLs from `lookup` (normally the process environment).
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets = [
            (ENV_RPC_URL, &mut self.network.rpc_url),
            (ENV_EXPLORER_URL, &mut self.network.explorer_url),
            (ENV_PRICE_API_URL, &mut self.network.price_api_url),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                debug!("[config] {} overridden from environment", key);
                *slot = value.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> LensResult<()> {
        if self.polling.transactions_secs == 0 || self.polling.balances_secs == 0 {
            return Err(LensError::Config("polling intervals must be positive".into()));
        }
        if self.network.request_timeout_secs == 0 {
            return Err(LensError::Config("network.request_timeout_secs must be positive".into()));
        }
        if self.display.top_n == 0 {
            return Err(LensError::Config("display.top_n must be positive".into()));
        }
        if self.explorer.max_pages == 0 {
            return Err(LensError::Config("explorer.max_pages must be positive".into()));
        }
        for (name, url) in [
            ("rpc_url", &self.network.rpc_url),
            ("explorer_url", &self.network.explorer_url),
            ("price_api_url", &self.network.price_api_url),
        ] {
            if url.trim().is_empty() {
                return Err(LensError::Config(format!("network.{} is empty", name)));
            }
        }
        // Address and symbol checks live in the registry constructor.
        self.registry().map(|_| ())
    }

    /// Build the token registry described by `[native]` and `[[tokens]]`.
    pub fn registry(&self) -> LensResult<TokenRegistry> {
        let native = TokenDescriptor {
            symbol: self.native.symbol.clone(),
            decimals: self.native.decimals,
            contract_address: None,
            price_id: self.native.price_id.clone(),
        };
        let tokens = self
            .tokens
            .iter()
            .map(|t| TokenDescriptor {
                symbol: t.symbol.clone(),
                decimals: t.decimals,
                contract_address: Some(t.address.clone()),
                price_id: t.price_id.clone(),
            })
            .collect();
        TokenRegistry::new(native, tokens)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.network.request_timeout_secs)
    }
}
