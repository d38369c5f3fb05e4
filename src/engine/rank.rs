// WalletLens — Counterparty Ranker
// Values counterparty totals in USD and keeps the top N.

use super::price::PriceLookup;
use crate::atoms::constants::DEFAULT_TOP_N;
use crate::atoms::types::{CounterpartyTotals, RankedCounterparty};
use std::cmp::Ordering;

/// Rank entries by `amount * price`, descending. Equal values keep their
/// map order (the sort is stable). A missing or non-finite price counts as 0.
pub fn top_n<P: PriceLookup + ?Sized>(
    map: &CounterpartyTotals,
    prices: &P,
    n: usize,
) -> Vec<RankedCounterparty> {
    let mut ranked: Vec<RankedCounterparty> = map
        .iter()
        .map(|(key, amount)| {
            let price = prices.usd_price(&key.symbol);
            let price = if price.is_finite() && price > 0.0 { price } else { 0.0 };
            RankedCounterparty {
                address: key.address.clone(),
                symbol: key.symbol.clone(),
                amount: *amount,
                usd_value: amount * price,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.usd_value.partial_cmp(&a.usd_value).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// `top_n` with the dashboard's default of five entries.
pub fn top_five<P: PriceLookup + ?Sized>(map: &CounterpartyTotals, prices: &P) -> Vec<RankedCounterparty> {
    top_n(map, prices, DEFAULT_TOP_N)
}
