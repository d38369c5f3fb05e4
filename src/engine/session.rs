// WalletLens — Wallet Session & Polling Loop
//
// One session tracks one connected wallet. It owns the adapters the pipeline
// reads from (history, balances, prices) and recomputes every view from
// scratch on each refresh; nothing accumulates between refreshes.

use super::aggregate::aggregate;
use super::classify::classify_all;
use super::explorer::{BlockscoutSource, TransactionSource};
use super::portfolio::{portfolio_snapshot, BalanceReader, RpcBalanceReader};
use super::price::{CoinGeckoPriceSource, PriceCache};
use super::primitives::WalletAddress;
use super::rank::top_n;
use super::registry::TokenRegistry;
use crate::atoms::constants::{DEFAULT_BALANCES_POLL_SECS, DEFAULT_TOP_N, DEFAULT_TRANSACTIONS_POLL_SECS};
use crate::atoms::error::{LensError, LensResult};
use crate::atoms::types::{DashboardView, PortfolioSnapshot};
use crate::config::LensConfig;
use log::{info, warn};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Refresh cadence and list length for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub transactions_interval: Duration,
    pub balances_interval: Duration,
    pub top_n: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            transactions_interval: Duration::from_secs(DEFAULT_TRANSACTIONS_POLL_SECS),
            balances_interval: Duration::from_secs(DEFAULT_BALANCES_POLL_SECS),
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Emitted by [`WalletSession::run`] on every refresh.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Dashboard(Box<DashboardView>),
    Portfolio(PortfolioSnapshot),
    /// A refresh failed; polling continues.
    Error(String),
}

pub struct WalletSession {
    wallet: RwLock<Option<WalletAddress>>,
    registry: Arc<TokenRegistry>,
    prices: PriceCache,
    transactions: Arc<dyn TransactionSource>,
    balances: Arc<dyn BalanceReader>,
    settings: SessionSettings,
}

impl WalletSession {
    pub fn new(
        registry: Arc<TokenRegistry>,
        prices: PriceCache,
        transactions: Arc<dyn TransactionSource>,
        balances: Arc<dyn BalanceReader>,
        settings: SessionSettings,
    ) -> Self {
        Self { wallet: RwLock::new(None), registry, prices, transactions, balances, settings }
    }

    /// Wire the Blockscout, JSON-RPC and CoinGecko adapters from `config`.
    pub fn from_config(config: &LensConfig) -> LensResult<Self> {
        let registry = Arc::new(config.registry()?);
        info!(
            "[session] registry: {} + {} tokens",
            registry.native_descriptor().symbol,
            registry.token_count()
        );
        let timeout = config.request_timeout();

        let price_source = CoinGeckoPriceSource::new(&config.network.price_api_url, &registry, timeout)?;
        let prices = PriceCache::new(Arc::new(price_source), Duration::from_secs(config.polling.price_ttl_secs));
        let transactions = BlockscoutSource::new(&config.network.explorer_url, timeout, config.explorer.max_pages)?;
        let balances = RpcBalanceReader::new(&config.network.rpc_url, timeout)?;

        let settings = SessionSettings {
            transactions_interval: Duration::from_secs(config.polling.transactions_secs),
            balances_interval: Duration::from_secs(config.polling.balances_secs),
            top_n: config.display.top_n,
        };

        Ok(Self::new(registry, prices, Arc::new(transactions), Arc::new(balances), settings))
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// Validate and track `address`, replacing any previous wallet.
    pub fn connect(&self, address: &str) -> LensResult<WalletAddress> {
        let wallet = WalletAddress::parse(address)?;
        info!("[session] connected {}", wallet);
        *self.wallet.write() = Some(wallet.clone());
        Ok(wallet)
    }

    /// Forget the wallet and drop cached prices.
    pub fn disconnect(&self) {
        if let Some(old) = self.wallet.write().take() {
            info!("[session] disconnected {}", old);
        }
        self.prices.invalidate();
    }

    pub fn wallet(&self) -> Option<WalletAddress> {
        self.wallet.read().clone()
    }

    fn require_wallet(&self) -> LensResult<WalletAddress> {
        self.wallet().ok_or_else(|| LensError::Other("No wallet connected".into()))
    }

    /// Fetch the history and rebuild rows, totals and the top counterparties.
    pub async fn dashboard(&self) -> LensResult<DashboardView> {
        let wallet = self.require_wallet()?;
        let history = self.transactions.fetch_transactions(&wallet).await?;

        let rows = classify_all(&history, &self.registry);
        let agg = aggregate(&history, &wallet, &self.registry);
        let prices = self.prices.snapshot().await;

        Ok(DashboardView {
            wallet: wallet.to_string(),
            rows,
            totals: agg.totals,
            top_beneficiaries: top_n(&agg.sent, &prices, self.settings.top_n),
            top_benefactors: top_n(&agg.received, &prices, self.settings.top_n),
        })
    }

    /// Current balances of every registered asset, valued in USD.
    pub async fn portfolio(&self) -> LensResult<PortfolioSnapshot> {
        let wallet = self.require_wallet()?;
        let prices = self.prices.snapshot().await;
        Ok(portfolio_snapshot(self.balances.as_ref(), &self.registry, &prices, &wallet).await)
    }

    /// Poll until `shutdown` flips to `true` (or its sender is dropped) or
    /// `events` is closed. Both timers fire immediately on start.
    pub async fn run(&self, events: mpsc::Sender<SessionEvent>, mut shutdown: watch::Receiver<bool>) {
        let mut tx_tick = tokio::time::interval(self.settings.transactions_interval);
        let mut bal_tick = tokio::time::interval(self.settings.balances_interval);
        tx_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        bal_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!("[session] polling started");
        loop {
            if *shutdown.borrow() {
                break;
            }

            let event = tokio::select! {
                _ = tx_tick.tick() => match self.dashboard().await {
                    Ok(view) => SessionEvent::Dashboard(Box::new(view)),
                    Err(e) => {
                        warn!("[session] transaction refresh failed: {}", e);
                        SessionEvent::Error(e.to_string())
                    }
                },
                _ = bal_tick.tick() => match self.portfolio().await {
                    Ok(snapshot) => SessionEvent::Portfolio(snapshot),
                    Err(e) => {
                        warn!("[session] balance refresh failed: {}", e);
                        SessionEvent::Error(e.to_string())
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            };

            if events.send(event).await.is_err() {
                break;
            }
        }
        info!("[session] polling stopped");
    }
}
