// WalletLens — Price Source & TTL Cache
// PriceLookup is the synchronous capability the ranker consumes; PriceSource is
// the async feed behind it; PriceCache bounds how often the feed is hit.

use super::registry::TokenRegistry;
use crate::atoms::constants::USER_AGENT;
use crate::atoms::error::{LensError, LensResult};
use crate::atoms::types::PriceTable;
use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

// ── Lookup ─────────────────────────────────────────────────────────────────

/// Symbol → USD unit price. Unknown symbols return 0.
pub trait PriceLookup {
    fn usd_price(&self, symbol: &str) -> f64;
}

impl<F> PriceLookup for F
where
    F: Fn(&str) -> f64,
{
    fn usd_price(&self, symbol: &str) -> f64 {
        self(symbol)
    }
}

impl PriceLookup for PriceTable {
    fn usd_price(&self, symbol: &str) -> f64 {
        self.prices.get(&symbol.trim().to_uppercase()).copied().unwrap_or(0.0)
    }
}

impl PriceTable {
    pub fn insert(&mut self, symbol: &str, usd: f64) {
        self.prices.insert(symbol.trim().to_uppercase(), usd);
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

// ── Source ────────────────────────────────────────────────────────────────

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(&self) -> LensResult<PriceTable>;
}

/// CoinGecko `simple/price` endpoint, one request for every registered asset.
pub struct CoinGeckoPriceSource {
    client: reqwest::Client,
    base_url: String,
    /// (symbol, coin id)
    ids: Vec<(String, String)>,
}

impl CoinGeckoPriceSource {
    pub fn new(base_url: &str, registry: &TokenRegistry, timeout: Duration) -> LensResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let ids = registry
            .all()
            .filter_map(|t| t.price_id.as_ref().map(|id| (t.symbol.clone(), id.clone())))
            .collect();
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), ids })
    }
}

/// Map a `{ "<id>": { "usd": <price> } }` body back onto registry symbols.
/// Ids absent from the body are left out (they price at 0).
pub fn parse_simple_price(body: &serde_json::Value, ids: &[(String, String)]) -> PriceTable {
    let mut table = PriceTable::default();
    for (symbol, id) in ids {
        if let Some(usd) = body[id.as_str()]["usd"].as_f64() {
            table.insert(symbol, usd);
        }
    }
    table
}

#[async_trait]
impl PriceSource for CoinGeckoPriceSource {
    async fn fetch_prices(&self) -> LensResult<PriceTable> {
        if self.ids.is_empty() {
            return Ok(PriceTable::default());
        }
        let ids = self.ids.iter().map(|(_, id)| id.as_str()).collect::<Vec<_>>().join(",");
        let url = format!("{}/simple/price", self.base_url);
        debug!("[price] GET {} ids={}", url, ids);

        let resp = self
            .client
            .get(&url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", "usd")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LensError::PriceFeed(format!("price API returned status {}", resp.status())));
        }

        let body: serde_json::Value = resp.json().await?;
        if !body.is_object() {
            return Err(LensError::PriceFeed("price API returned a non-object body".into()));
        }
        Ok(parse_simple_price(&body, &self.ids))
    }
}

// ── Cache ─────────────────────────────────────────────────────────────────

struct CachedPrices {
    table: PriceTable,
    fetched_at: Instant,
}

/// Time-boxed price cache. A stale table is still served when a refresh
/// fails; with nothing cached, every price reads as 0.
pub struct PriceCache {
    source: Arc<dyn PriceSource>,
    ttl: Duration,
    state: Mutex<Option<CachedPrices>>,
}

impl PriceCache {
    pub fn new(source: Arc<dyn PriceSource>, ttl: Duration) -> Self {
        Self { source, ttl, state: Mutex::new(None) }
    }

    fn fresh(&self) -> Option<PriceTable> {
        let state = self.state.lock();
        state
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| c.table.clone())
    }

    /// Current prices, refetching at most once per TTL window.
    pub async fn snapshot(&self) -> PriceTable {
        if let Some(table) = self.fresh() {
            return table;
        }

        // Lock is not held across the fetch.
        match self.source.fetch_prices().await {
            Ok(table) => {
                info!("[price] refreshed {} prices", table.prices.len());
                *self.state.lock() = Some(CachedPrices { table: table.clone(), fetched_at: Instant::now() });
                table
            }
            Err(e) => {
                let state = self.state.lock();
                match state.as_ref() {
                    Some(stale) => {
                        warn!("[price] refresh failed, serving stale prices: {}", e);
                        stale.table.clone()
                    }
                    None => {
                        warn!("[price] refresh failed, no cached prices: {}", e);
                        PriceTable::default()
                    }
                }
            }
        }
    }

    /// Drop the cached table so the next snapshot refetches.
    pub fn invalidate(&self) {
        *self.state.lock() = None;
    }
}
