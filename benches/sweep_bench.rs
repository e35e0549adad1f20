use bourse::ledger::QUOTE_CURRENCY;
use bourse::matcher::Matcher;
use bourse::order::{Order, Side};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rust_decimal::Decimal;

const ASSET: &str = "BTC";
const LEVELS: u64 = 1_000;

/// Matcher with one resting ask of quantity 1 at each price 1..=LEVELS.
fn seeded_matcher() -> (Matcher, bourse::ledger::UserId) {
    let mut m = Matcher::new();
    let maker = m.register_user().id;
    let taker = m.register_user().id;
    m.deposit(maker, ASSET, Decimal::from(LEVELS)).unwrap();
    m.deposit(taker, QUOTE_CURRENCY, Decimal::from(LEVELS * LEVELS))
        .unwrap();

    for price in 1..=LEVELS {
        m.submit_order(Order::new(
            maker,
            Side::Sell,
            1,
            Decimal::from(price),
            ASSET.to_string(),
        ))
        .unwrap();
    }

    (m, taker)
}

fn bench_full_sweep(c: &mut Criterion) {
    c.bench_function("submit sweeping 1000 resting levels", |b| {
        b.iter_batched(
            seeded_matcher,
            |(mut m, taker)| {
                let outcome = m
                    .submit_order(Order::new(
                        taker,
                        Side::Buy,
                        LEVELS,
                        Decimal::from(LEVELS),
                        ASSET.to_string(),
                    ))
                    .unwrap();
                black_box(outcome);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_full_sweep);
criterion_main!(benches);
