// WalletLens CLI — plain-text renderers for the dashboard views.

use walletlens::atoms::constants::{TABLE_TRUNCATE, WIDGET_TRUNCATE};
use walletlens::engine::primitives::{format_fixed2, truncate_middle};
use walletlens::{DisplayRow, PortfolioSnapshot, RankedCounterparty, TokenTotals};

fn table_cell(s: &str) -> String {
    truncate_middle(s, TABLE_TRUNCATE.0, TABLE_TRUNCATE.1)
}

fn widget_cell(s: &str) -> String {
    truncate_middle(s, WIDGET_TRUNCATE.0, WIDGET_TRUNCATE.1)
}

/// Transaction table: S/N, hash, from, to, amount, date.
pub fn rows(rows: &[DisplayRow]) -> String {
    if rows.is_empty() {
        return "No transactions found.\n".to_string();
    }
    let mut out = format!(
        "{:>5}  {:<23}  {:<23}  {:<23}  {:<28}  {}\n",
        "S/N", "Hash", "From", "To", "Amount", "Date"
    );
    for r in rows {
        out.push_str(&format!(
            "{:>5}  {:<23}  {:<23}  {:<23}  {:<28}  {}\n",
            r.sequence_number,
            table_cell(&r.hash),
            table_cell(&r.from_address),
            table_cell(&r.to_address),
            r.formatted_amount,
            r.formatted_date,
        ));
    }
    out
}

/// Per-token income/expenditure.
pub fn totals(totals: &TokenTotals) -> String {
    let mut out = format!(
        "{:<8} {:>18} {:>8} {:>18} {:>8} {:>18}\n",
        "Token", "Credited", "Count", "Debited", "Count", "Net"
    );
    for (symbol, flow) in totals.iter() {
        out.push_str(&format!(
            "{:<8} {:>18} {:>8} {:>18} {:>8} {:>18}\n",
            symbol,
            format_fixed2(flow.credited),
            flow.credit_count,
            format_fixed2(flow.debited),
            flow.debit_count,
            format_fixed2(flow.net()),
        ));
    }
    out
}

/// One titled top-N list.
pub fn ranked(title: &str, entries: &[RankedCounterparty]) -> String {
    let mut out = format!("{}\n", title);
    if entries.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for (i, e) in entries.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {:<14} {:>16} {:<6} ${}\n",
            i + 1,
            widget_cell(&e.address),
            format_fixed2(e.amount),
            e.symbol,
            format_fixed2(e.usd_value),
        ));
    }
    out
}

pub fn portfolio(wallet: &str, snapshot: &PortfolioSnapshot) -> String {
    let mut out = format!("Portfolio for {}\n\n", wallet);
    for h in &snapshot.holdings {
        out.push_str(&format!("  {:<8} {:>24}   ${}\n", h.symbol, h.balance, format_fixed2(h.usd_value)));
    }
    out.push_str(&format!("\n  Total: ${}\n", format_fixed2(snapshot.total_usd)));
    out
}
