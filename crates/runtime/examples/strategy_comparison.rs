// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Compare split strategies across channel conditions.
//!
//! Sweeps the SNR from a dead link to a clean one and prints the cut and
//! predicted energy each strategy settles on, then runs one in-process
//! round trip per strategy over an in-memory store.
//!
//! ```bash
//! cargo run -p runtime --example strategy_comparison
//! ```

use channel_estimator::ChannelSample;
use handoff::MemoryArtifactStore;
use runtime::{InvocationRequest, RuntimeConfig, SplitRuntime};
use split_selector::CorrelationToken;
use std::sync::Arc;
use telemetry::MemoryTelemetrySink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .init();

    let strategies = [("energy-minimizing", None), ("fixed", Some(13)), ("fixed", Some(1))];
    let snrs = [-30.0, -20.0, -10.0, 0.0, 10.0, 20.0, 30.0];

    println!(
        "{:<22} {:>8} {:>6} {:>14} {:>14} {:>14}",
        "Strategy", "SNR dB", "Cut", "Compute µJ", "Transfer µJ", "Total µJ",
    );
    println!("{}", "-".repeat(84));

    for (name, fixed) in strategies {
        let mut config = RuntimeConfig::default();
        config.selection.strategy = name.to_string();
        config.selection.fixed_split = fixed;
        let selector = config.build_selector()?;
        let label = match fixed {
            Some(k) => format!("{name}({k})"),
            None => name.to_string(),
        };

        for snr in snrs {
            let sample = ChannelSample::new(snr, -70.0);
            let d = selector.select(CorrelationToken::new("sweep"), Some(&sample));
            println!(
                "{:<22} {:>8.1} {:>6} {:>14.2} {:>14.2} {:>14.2}",
                label,
                snr,
                d.layer_index,
                d.energy.compute_energy() + d.energy.memory_energy(),
                d.energy.transfer_energy(),
                d.energy.total_energy(),
            );
        }
    }

    println!("\nIn-process round trips (SNR -10 dB):");
    for (name, fixed) in strategies {
        let mut config = RuntimeConfig::default();
        config.selection.strategy = name.to_string();
        config.selection.fixed_split = fixed;
        config.handoff.poll_interval_ms = 5;

        let runtime = SplitRuntime::new(config)
            .with_store(Arc::new(MemoryArtifactStore::new()))
            .with_sink(Arc::new(MemoryTelemetrySink::new()))
            .load()?;
        let sample = ChannelSample::new(-10.0, -85.0);
        let request = InvocationRequest::new("3_example.bin", vec![3; 32]).with_true_label(3);
        let report = runtime.invoke(request, Some(&sample)).await?;
        println!("  {}", report.summary());
    }

    Ok(())
}
