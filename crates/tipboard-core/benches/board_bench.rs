use criterion::{black_box, criterion_group, criterion_main, Bencher, Criterion};
use tipboard_core::factory::{create_combined, create_live};
use tipboard_core::migrate::decode_collection;
use tipboard_core::model::{BetInput, Record, RecordKind, Status};
use tipboard_core::odds;
use tipboard_core::validate::LiveFields;
use tipboard_core::view::{view, StatusFilter, ViewState};

// ---------------------------------------------------------------------------
// Fixture data
// ---------------------------------------------------------------------------

fn sample_board(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            if i % 3 == 0 {
                let bets = (0..4)
                    .map(|leg| BetInput {
                        league: "Süper Lig".to_string(),
                        home_team: format!("Home {i}-{leg}"),
                        away_team: format!("Away {i}-{leg}"),
                        prediction: "MS 1".to_string(),
                        odds: 1.2 + leg as f64 * 0.35,
                    })
                    .collect();
                Record::Combined(create_combined(format!("Coupon {i}"), bets))
            } else {
                let mut p = create_live(LiveFields {
                    league: "Premier League".to_string(),
                    home_team: format!("Home {i}"),
                    away_team: format!("Away {i}"),
                    prediction: "KG Var".to_string(),
                    minute: format!("{}", i % 90),
                });
                if i % 4 == 0 {
                    p.status = Status::Won;
                }
                Record::Live(p)
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_decode(c: &mut Criterion) {
    let blob = serde_json::to_string(&sample_board(1000)).expect("serialize fixture");

    c.bench_function("store/decode_1000_records", |b: &mut Bencher| {
        b.iter(|| decode_collection(black_box(&blob)))
    });
}

fn bench_view(c: &mut Criterion) {
    let records = sample_board(1000);
    let state = ViewState {
        kind: RecordKind::Live,
        filter: StatusFilter::Only(Status::Won),
    };

    c.bench_function("view/live_won_1000_records", |b: &mut Bencher| {
        b.iter(|| view(black_box(&records), black_box(&state)).items.len())
    });
}

fn bench_recompute(c: &mut Criterion) {
    let legs: Vec<f64> = (0..20).map(|i| 1.05 + i as f64 * 0.1).collect();

    c.bench_function("odds/recompute_20_legs", |b: &mut Bencher| {
        b.iter(|| odds::recompute(black_box(&legs).iter().copied()))
    });
}

criterion_group!(board_benches, bench_decode, bench_view, bench_recompute);
criterion_main!(board_benches);
