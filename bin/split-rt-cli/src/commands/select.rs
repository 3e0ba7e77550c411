// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `split-rt select` command: choose the cut for one request.
//!
//! Writes the decision for the `edge` and `postprocess` steps and appends
//! the energy row.

use runtime::RuntimeConfig;
use split_selector::CorrelationToken;
use std::path::PathBuf;
use std::sync::Arc;
use telemetry::TelemetryAggregator;

pub async fn execute(
    config: RuntimeConfig,
    token: String,
    snr: Option<f64>,
    decision_path: PathBuf,
) -> anyhow::Result<()> {
    super::banner("Split Selector");

    let selector = config.build_selector()?;
    println!("  {}", selector.costs().summary());
    println!("  Strategy: {}", selector.strategy_name());
    println!();

    let sample = super::channel_sample(&config, snr);
    let decision = selector.select(CorrelationToken::new(token), sample.as_ref());

    TelemetryAggregator::new(Arc::new(config.csv_sink())).record_decision(&decision)?;
    super::write_decision(&decision_path, &decision)?;

    match decision.snr_db() {
        Some(snr) => println!("  SNR:         {snr:.2} dB"),
        None => println!("  SNR:         unavailable (default split)"),
    }
    println!("  Throughput:  {:.2} Mbps", decision.estimated_throughput_mbps);
    println!("  Cut:         {}", decision.layer_index);
    println!(
        "  Energy:      {:.2} µJ (compute {:.2}, memory {:.2}, transfer {:.2})",
        decision.energy.total_energy(),
        decision.energy.compute_energy(),
        decision.energy.memory_energy(),
        decision.energy.transfer_energy(),
    );
    println!("  Decision:    {}", decision_path.display());
    println!();
    Ok(())
}
