use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cronoweath::{build_view, Condition, DayOffsetAligner, DaySample, QueryResponse};

fn timeseries() -> Vec<DaySample> {
    (1985..2025)
        .flat_map(|year| {
            (1..=12).flat_map(move |month| {
                (1..=28).map(move |day| {
                    DaySample::new(format!("{year}-{month:02}-{day:02}"), Some(day % 3 == 0))
                        .with_metric("t2m_max", Some(20.0 + (day as f64) / 2.0))
                })
            })
        })
        .collect()
}

fn bench_views(c: &mut Criterion) {
    let target = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
    let samples = timeseries();
    let response = QueryResponse {
        query_id: Some("bench".to_string()),
        window_days: Some(15),
        probability_pct: Some(33.3),
        timeseries: samples.clone(),
        ..QueryResponse::default()
    };

    c.bench_function("align", |b| {
        let aligner = DayOffsetAligner::new(target, 15);
        b.iter(|| aligner.align(black_box(&samples), Condition::Hot.metrics()))
    });
    c.bench_function("build_view", |b| {
        b.iter(|| build_view(black_box(&response), Condition::Hot, target, "Bench"))
    });
}

criterion_group!(benches, bench_views);
criterion_main!(benches);
