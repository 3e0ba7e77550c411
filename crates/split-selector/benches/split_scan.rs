// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for split selection.

use channel_estimator::{ChannelEstimator, ChannelSample};
use cost_model::{CostModel, EnergyCoefficients, LayerProfile};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use split_selector::{CorrelationToken, EnergyMinimizing, SplitSelector};

fn selector(costs: CostModel<cost_model::model::Validated>) -> SplitSelector {
    SplitSelector::new(
        costs,
        EnergyCoefficients::default(),
        ChannelEstimator::default(),
        Box::new(EnergyMinimizing::new(1)),
    )
    .unwrap()
}

fn bench_mobilenet_scan(c: &mut Criterion) {
    let s = selector(CostModel::mobilenet_v2());
    let sample = ChannelSample::new(20.0, -60.0);
    c.bench_function("select_mobilenet_v2_snr20", |b| {
        b.iter(|| s.select(CorrelationToken::new("bench"), black_box(Some(&sample))))
    });
}

fn bench_deep_pipeline_scan(c: &mut Criterion) {
    let stages = (1..=1024u32)
        .map(|i| {
            let bytes = 2_000_000 / i as u64 + (i as u64 % 7) * 1000;
            (i, LayerProfile::new(1.0e6, 1.0e6, 1.0e3, bytes))
        })
        .collect();
    let costs = CostModel::new("deep".into(), stages).validate().unwrap();
    let s = selector(costs);
    let sample = ChannelSample::new(5.0, -80.0);
    c.bench_function("select_1024_stages", |b| {
        b.iter(|| s.select(CorrelationToken::new("bench"), black_box(Some(&sample))))
    });
}

criterion_group!(benches, bench_mobilenet_scan, bench_deep_pipeline_scan);
criterion_main!(benches);
