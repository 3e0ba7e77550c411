// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the artifact codec and a full in-process round trip.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use handoff::{Artifact, Boundary, MemoryArtifactStore};
use runtime::{InvocationRequest, RuntimeConfig, SplitRuntime};
use std::sync::Arc;
use telemetry::MemoryTelemetrySink;

fn bench_artifact_codec(c: &mut Criterion) {
    let artifact = Artifact::new(Boundary::EdgeToCloud, "bench".into(), Some(4), vec![7u8; 1 << 20]);
    let bytes = artifact.encode().expect("header serializes");

    c.bench_function("artifact_encode_1mib", |b| {
        b.iter(|| artifact.encode().expect("header serializes"))
    });
    c.bench_function("artifact_decode_1mib", |b| {
        b.iter(|| Artifact::decode(&bytes).expect("valid artifact"))
    });
}

fn bench_in_process_round_trip(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("tokio runtime");
    let runtime = SplitRuntime::new(RuntimeConfig::default())
        .with_store(Arc::new(MemoryArtifactStore::new()))
        .with_sink(Arc::new(MemoryTelemetrySink::new()))
        .load()
        .expect("default config loads");

    c.bench_function("round_trip_default_split", |b| {
        b.iter_batched(
            || InvocationRequest::new("bench", vec![1u8; 64]),
            |request| rt.block_on(runtime.invoke(request, None)).expect("invocation"),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_artifact_codec, bench_in_process_round_trip);
criterion_main!(benches);
