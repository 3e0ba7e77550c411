// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `split-rt edge` command: run the head and publish it.

use anyhow::Context;
use runtime::{InvocationRequest, RuntimeConfig};
use std::path::PathBuf;
use std::sync::Arc;
use telemetry::TelemetryAggregator;

pub async fn execute(config: RuntimeConfig, input: PathBuf, decision_path: PathBuf) -> anyhow::Result<()> {
    super::banner("Edge Site");

    let request = InvocationRequest::from_file(&input)
        .with_context(|| format!("cannot read input '{}'", input.display()))?;
    let site = super::edge_site(&config)?;

    let decision = match super::read_decision(&decision_path) {
        Ok(d) if d.token == request.token => d,
        _ => {
            tracing::info!(token = %request.token, "No matching decision, selecting now");
            let sample = super::channel_sample(&config, None);
            let d = site.selector().select(request.token.clone(), sample.as_ref());
            TelemetryAggregator::new(Arc::new(config.csv_sink())).record_decision(&d)?;
            super::write_decision(&decision_path, &d)?;
            d
        }
    };

    let latency = config.latency_files();
    latency.clear()?;
    let dispatched = site.run_decision(&request, decision)?;
    latency.write_edge(dispatched.latency_edge.as_secs_f64())?;

    println!("  Input:   {} ({} bytes)", input.display(), request.input.len());
    println!("  Cut:     {}", dispatched.decision.layer_index);
    println!("  Latency: {:.3}s", dispatched.latency_edge.as_secs_f64());
    if dispatched.empty {
        println!("  Output:  empty (nothing for the cloud to do)");
    }
    println!();
    Ok(())
}
