// WalletLens — Block Explorer Transaction Source
// Pulls a wallet's full history from a Blockscout v2 API, page by page.

use super::primitives::WalletAddress;
use crate::atoms::constants::USER_AGENT;
use crate::atoms::error::{LensError, LensResult};
use crate::atoms::types::RawTransaction;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;

#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Every transaction sent or received by `wallet`, newest first as the
    /// explorer returns them.
    async fn fetch_transactions(&self, wallet: &WalletAddress) -> LensResult<Vec<RawTransaction>>;
}

/// Blockscout `/api/v2/addresses/{addr}/transactions`.
pub struct BlockscoutSource {
    client: reqwest::Client,
    base_url: String,
    max_pages: u32,
}

/// Cursor keys Blockscout returns in `next_page_params`.
const CURSOR_KEYS: [&str; 3] = ["block_number", "index", "items_count"];

/// One decoded page: its transactions and the cursor for the next one.
#[derive(Debug, Default)]
pub struct Page {
    pub items: Vec<RawTransaction>,
    pub next: Option<Vec<(String, String)>>,
}

impl BlockscoutSource {
    pub fn new(base_url: &str, timeout: Duration, max_pages: u32) -> LensResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), max_pages })
    }
}

/// One page request. Split out so the paging loop runs without a network.
#[async_trait]
trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, wallet: &WalletAddress, cursor: &[(String, String)]) -> LensResult<Page>;
}

#[async_trait]
impl PageFetcher for BlockscoutSource {
    async fn fetch_page(&self, wallet: &WalletAddress, cursor: &[(String, String)]) -> LensResult<Page> {
        let url = format!("{}/api/v2/addresses/{}/transactions", self.base_url, wallet);
        let mut query: Vec<(&str, &str)> = vec![("filter", "to | from")];
        query.extend(cursor.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let resp = self.client.get(&url).query(&query).send().await?;
        if !resp.status().is_success() {
            return Err(LensError::Explorer(format!("{} returned status {}", url, resp.status())));
        }
        let body: serde_json::Value = resp.json().await?;
        parse_page(&body)
    }
}

#[async_trait]
impl TransactionSource for BlockscoutSource {
    async fn fetch_transactions(&self, wallet: &WalletAddress) -> LensResult<Vec<RawTransaction>> {
        collect_pages(self, wallet, self.max_pages).await
    }
}

/// Follow the cursor from the first page, concatenating items in page order.
/// Stops when no cursor is returned, when the cursor repeats, or at `max_pages`.
async fn collect_pages<F: PageFetcher + ?Sized>(
    fetcher: &F,
    wallet: &WalletAddress,
    max_pages: u32,
) -> LensResult<Vec<RawTransaction>> {
    let mut all = Vec::new();
    let mut cursor: Vec<(String, String)> = Vec::new();
    let mut pages = 0u32;

    loop {
        let page = fetcher.fetch_page(wallet, &cursor).await?;
        pages += 1;
        debug!("[explorer] page {} → {} items", pages, page.items.len());
        all.extend(page.items);

        match page.next {
            None => break,
            Some(next) if next == cursor => {
                warn!("[explorer] cursor repeated after {} pages for {}; stopping", pages, wallet);
                break;
            }
            Some(_) if pages >= max_pages => {
                warn!("[explorer] stopped after {} pages for {}; history is truncated", pages, wallet);
                break;
            }
            Some(next) => cursor = next,
        }
    }

    info!("[explorer] {} transactions for {} ({} pages)", all.len(), wallet, pages);
    Ok(all)
}

/// Decode one Blockscout page body. A `next_page_params` object carrying
/// none of the cursor keys ends paging.
pub fn parse_page(body: &serde_json::Value) -> LensResult<Page> {
    let items = match body.get("items") {
        Some(serde_json::Value::Array(items)) => items.iter().filter_map(parse_item).collect(),
        Some(serde_json::Value::Null) | None => Vec::new(),
        Some(_) => return Err(LensError::Explorer("'items' is not an array".into())),
    };

    let next = body
        .get("next_page_params")
        .filter(|p| p.is_object())
        .map(|params| {
            CURSOR_KEYS
                .iter()
                .filter_map(|k| scalar_string(&params[*k]).map(|v| (k.to_string(), v)))
                .collect::<Vec<_>>()
        })
        .filter(|cursor| !cursor.is_empty());

    Ok(Page { items, next })
}

/// Map one explorer item to a `RawTransaction`. Items missing a hash or a
/// sender are dropped.
pub fn parse_item(item: &serde_json::Value) -> Option<RawTransaction> {
    let Some(hash) = item["hash"].as_str() else {
        debug!("[explorer] skipping item without hash");
        return None;
    };
    let Some(from) = item["from"]["hash"].as_str() else {
        debug!("[explorer] skipping {} without sender", hash);
        return None;
    };

    Some(RawTransaction {
        hash: hash.to_string(),
        from_address: from.to_string(),
        to_address: item["to"]["hash"].as_str().map(String::from),
        value_wei: scalar_string(&item["value"]).unwrap_or_else(|| "0".to_string()),
        raw_input: item["raw_input"].as_str().map(String::from),
        method_signature: item["method"].as_str().map(String::from),
        timestamp: item["timestamp"].as_str().unwrap_or_default().to_string(),
    })
}

/// Blockscout emits numbers as either JSON strings or JSON numbers.
fn scalar_string(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(hash: &str, to: serde_json::Value) -> serde_json::Value {
        json!({
            "hash": hash,
            "from": { "hash": "0x1111111111111111111111111111111111111111" },
            "to": to,
            "value": "1000000000000000000",
            "raw_input": "0x",
            "method": null,
            "timestamp": "2024-05-01T12:00:00.000000Z"
        })
    }

    #[test]
    fn parses_items_and_cursor() {
        let body = json!({
            "items": [
                item("0xaa", json!({ "hash": "0x2222222222222222222222222222222222222222" })),
                item("0xbb", json!(null)),
            ],
            "next_page_params": { "block_number": 123, "index": 4, "items_count": 50 }
        });
        let page = parse_page(&body).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].to_address.as_deref(), Some("0x2222222222222222222222222222222222222222"));
        assert_eq!(page.items[1].to_address, None);
        assert_eq!(page.items[0].value_wei, "1000000000000000000");
        assert_eq!(page.items[0].method_signature, None);

        let next = page.next.unwrap();
        assert_eq!(
            next,
            vec![
                ("block_number".to_string(), "123".to_string()),
                ("index".to_string(), "4".to_string()),
                ("items_count".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn last_page_has_no_cursor() {
        let body = json!({ "items": [], "next_page_params": null });
        let page = parse_page(&body).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn malformed_items_are_rejected() {
        assert!(matches!(parse_page(&json!({ "items": "nope" })), Err(LensError::Explorer(_))));
    }

    #[test]
    fn item_without_sender_is_skipped() {
        let mut bad = item("0xcc", json!(null));
        bad["from"] = json!(null);
        assert!(parse_item(&bad).is_none());
        assert!(parse_item(&json!({ "from": { "hash": "0x1" } })).is_none());
    }

    #[test]
    fn missing_value_defaults_to_zero() {
        let mut it = item("0xdd", json!(null));
        it.as_object_mut().unwrap().remove("value");
        it["method"] = json!("transfer");
        let tx = parse_item(&it).unwrap();
        assert_eq!(tx.value_wei, "0");
        assert_eq!(tx.method_signature.as_deref(), Some("transfer"));
    }

    #[test]
    fn cursor_without_known_keys_ends_paging() {
        let page = parse_page(&json!({ "items": [], "next_page_params": {} })).unwrap();
        assert!(page.next.is_none());

        let body = json!({
            "items": [],
            "next_page_params": { "block_number": null, "index": null, "items_count": null }
        });
        assert!(parse_page(&body).unwrap().next.is_none());
    }

    // ── Paging loop ────────────────────────────────────────────────────────

    const WALLET: &str = "0x8861186d9513cfd5d1beb199355448ce5e96f105";

    /// Serves `bodies[n]` for the cursor whose `block_number` is `n`
    /// (the first request carries no cursor and gets `bodies[0]`).
    struct ScriptedExplorer {
        bodies: Vec<serde_json::Value>,
        requests: parking_lot::Mutex<Vec<Vec<(String, String)>>>,
    }

    impl ScriptedExplorer {
        fn new(bodies: Vec<serde_json::Value>) -> Self {
            Self { bodies, requests: parking_lot::Mutex::new(Vec::new()) }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().len()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedExplorer {
        async fn fetch_page(&self, _wallet: &WalletAddress, cursor: &[(String, String)]) -> LensResult<Page> {
            self.requests.lock().push(cursor.to_vec());
            let index = cursor
                .iter()
                .find(|(k, _)| k == "block_number")
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(0);
            let body = self.bodies.get(index).ok_or("no such page")?;
            parse_page(body)
        }
    }

    fn page_body(hashes: &[&str], next_block: Option<u64>) -> serde_json::Value {
        let items: Vec<_> = hashes.iter().map(|h| item(h, json!(null))).collect();
        let next = next_block.map(|b| json!({ "block_number": b, "index": 0, "items_count": 50 }));
        json!({ "items": items, "next_page_params": next })
    }

    fn hashes(txs: &[RawTransaction]) -> Vec<&str> {
        txs.iter().map(|t| t.hash.as_str()).collect()
    }

    #[tokio::test]
    async fn follows_cursor_and_keeps_page_order() {
        let explorer = ScriptedExplorer::new(vec![
            page_body(&["0x01", "0x02"], Some(1)),
            page_body(&["0x03"], Some(2)),
            page_body(&["0x04"], None),
        ]);
        let wallet = WalletAddress::parse(WALLET).unwrap();
        let txs = collect_pages(&explorer, &wallet, 100).await.unwrap();

        assert_eq!(hashes(&txs), vec!["0x01", "0x02", "0x03", "0x04"]);
        let requests = explorer.requests.lock();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].is_empty());
        assert_eq!(requests[1][0], ("block_number".to_string(), "1".to_string()));
    }

    #[tokio::test]
    async fn stops_at_page_cap() {
        let explorer = ScriptedExplorer::new(vec![
            page_body(&["0x01"], Some(1)),
            page_body(&["0x02"], Some(2)),
            page_body(&["0x03"], None),
        ]);
        let wallet = WalletAddress::parse(WALLET).unwrap();
        let txs = collect_pages(&explorer, &wallet, 2).await.unwrap();

        assert_eq!(hashes(&txs), vec!["0x01", "0x02"]);
        assert_eq!(explorer.request_count(), 2);
    }

    #[tokio::test]
    async fn empty_cursor_does_not_refetch_first_page() {
        let explorer = ScriptedExplorer::new(vec![json!({
            "items": [item("0x01", json!(null))],
            "next_page_params": {}
        })]);
        let wallet = WalletAddress::parse(WALLET).unwrap();
        let txs = collect_pages(&explorer, &wallet, 100).await.unwrap();

        assert_eq!(hashes(&txs), vec!["0x01"]);
        assert_eq!(explorer.request_count(), 1);
    }

    #[tokio::test]
    async fn repeated_cursor_stops_paging() {
        // Page 1 points back at itself.
        let explorer = ScriptedExplorer::new(vec![
            page_body(&["0x01"], Some(1)),
            page_body(&["0x02"], Some(1)),
        ]);
        let wallet = WalletAddress::parse(WALLET).unwrap();
        let txs = collect_pages(&explorer, &wallet, 100).await.unwrap();

        assert_eq!(hashes(&txs), vec!["0x01", "0x02"]);
        assert_eq!(explorer.request_count(), 2);
    }

    #[tokio::test]
    async fn page_error_propagates() {
        let explorer = ScriptedExplorer::new(vec![page_body(&["0x01"], Some(7))]);
        let wallet = WalletAddress::parse(WALLET).unwrap();
        assert!(collect_pages(&explorer, &wallet, 100).await.is_err());
    }
}
