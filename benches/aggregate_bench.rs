// Classification + aggregation over a synthetic 10k-transaction history.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use walletlens::engine::abi::encode_transfer;
use walletlens::engine::primitives::{hex_encode, parse_address_bytes, parse_u256_decimal};
use walletlens::engine::{aggregate, classify_all, top_five, TokenRegistry, WalletAddress};
use walletlens::RawTransaction;

const WALLET: &str = "0x8861186d9513cfd5d1beb199355448ce5e96f105";
const USDC: &str = "0xff9f502976e7bd2b4901ad7dd1131bb81e5567de";

fn synthetic_history(n: usize) -> Vec<RawTransaction> {
    (0..n)
        .map(|i| {
            let peer = format!("0x{:040x}", i % 97 + 1);
            let outgoing = i % 2 == 0;
            let (from, to) = if outgoing { (WALLET.to_string(), peer.clone()) } else { (peer.clone(), WALLET.to_string()) };
            if i % 3 == 0 {
                let data = encode_transfer(
                    &parse_address_bytes(&to).unwrap(),
                    &parse_u256_decimal(&format!("{}", (i + 1) * 1_000_000)).unwrap(),
                );
                RawTransaction {
                    hash: format!("0x{:064x}", i),
                    from_address: from,
                    to_address: Some(USDC.to_string()),
                    value_wei: "0".into(),
                    raw_input: Some(hex_encode(&data)),
                    method_signature: Some("transfer".into()),
                    timestamp: "2025-01-01T00:00:00Z".into(),
                }
            } else {
                RawTransaction {
                    hash: format!("0x{:064x}", i),
                    from_address: from,
                    to_address: Some(to),
                    value_wei: format!("{}000000000000000", i + 1),
                    raw_input: None,
                    method_signature: None,
                    timestamp: "2025-01-01T00:00:00Z".into(),
                }
            }
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let registry = TokenRegistry::airdao();
    let wallet = WalletAddress::parse(WALLET).unwrap();
    let history = synthetic_history(10_000);
    let prices = |sym: &str| if sym == "USDC" { 1.0 } else { 0.007 };

    c.bench_function("classify_all 10k", |b| {
        b.iter(|| classify_all(black_box(&history), &registry))
    });

    c.bench_function("aggregate + rank 10k", |b| {
        b.iter(|| {
            let agg = aggregate(black_box(&history), &wallet, &registry);
            (top_five(&agg.sent, &prices), top_five(&agg.received, &prices))
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
