// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `split-rt postprocess` command: collect the result and record it.
//!
//! The invocation row is written only when all three latency files were
//! produced for this invocation. An empty round never has a cloud figure.

use runtime::{label_from_name, RuntimeConfig};
use std::path::PathBuf;
use std::sync::Arc;
use telemetry::{EnergyRecord, Prediction, TelemetryAggregator, TelemetryError};

pub async fn execute(config: RuntimeConfig, decision_path: PathBuf) -> anyhow::Result<()> {
    super::banner("Edge Post-processing");

    let decision = super::read_decision(&decision_path)?;
    let site = super::edge_site(&config)?;
    let collected = site.collect(&decision.token).await?;

    let latency = config.latency_files();
    if let Some(d) = collected.transfer {
        latency.add_transfer(d.as_secs_f64())?;
    }

    let measured = if collected.empty {
        println!("  {}: empty result, nothing to post-process", decision.token);
        Err(vec![latency.cloud.display().to_string()])
    } else {
        latency.read_complete()
    };

    let prediction = Prediction {
        predicted_label: collected.prediction,
        true_label: label_from_name(decision.token.as_str()),
    };
    match (prediction.predicted_label, prediction.true_label) {
        (Some(p), Some(t)) => println!("  Predicted: {p}, True: {t}"),
        (Some(p), None) => println!("  Predicted: {p}"),
        _ => {}
    }

    let aggregator = TelemetryAggregator::new(Arc::new(config.csv_sink()));
    let energy = EnergyRecord::from(&decision);
    match aggregator.complete_invocation(&decision.token, &energy, measured, prediction) {
        Ok(record) => {
            println!(
                "  Latency:   edge {:.3}s, transfer {:.3}s, cloud {:.3}s, total {:.3}s",
                record.latency_edge, record.latency_transfer, record.latency_cloud, record.latency_total
            );
        }
        Err(TelemetryError::MissingTelemetry { missing, .. }) => {
            println!("  Latency:   not recorded, missing {}", missing.join(", "));
        }
        Err(e) => return Err(e.into()),
    }
    println!();
    Ok(())
}
