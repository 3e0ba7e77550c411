// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `split-rt simulate` command: both sites in one process.
//!
//! Runs the full protocol over the configured store for every input and
//! keeps going when an invocation fails.

use anyhow::Context;
use runtime::{InvocationRequest, RuntimeConfig, SplitRuntime};
use std::path::PathBuf;

pub async fn execute(config: RuntimeConfig, inputs: Vec<PathBuf>, snr: Option<f64>) -> anyhow::Result<()> {
    super::banner("In-process Simulation");

    let sample_config = config.clone();
    let runtime = SplitRuntime::new(config).load()?;
    println!("  {}", runtime.selector().costs().summary());
    println!("  Strategy: {}", runtime.selector().strategy_name());
    println!();

    let mut ok = 0usize;
    let mut correct = 0usize;
    let mut labelled = 0usize;
    let mut energy = 0.0f64;

    for input in &inputs {
        let request = InvocationRequest::from_file(input)
            .with_context(|| format!("cannot read input '{}'", input.display()))?;
        let sample = super::channel_sample(&sample_config, snr);

        match runtime.invoke(request, sample.as_ref()).await {
            Ok(report) => {
                ok += 1;
                energy += report.decision.energy.total_energy();
                if report.prediction.true_label.is_some() {
                    labelled += 1;
                    if report.prediction.is_correct() {
                        correct += 1;
                    }
                }
                println!("  {}", report.summary());
            }
            Err(e) => {
                tracing::error!("{e}");
                println!("  FAILED: {e}");
            }
        }
    }

    println!();
    println!("  Completed: {ok}/{}", inputs.len());
    if ok > 0 {
        println!("  Mean energy: {:.2} µJ", energy / ok as f64);
    }
    if labelled > 0 {
        println!(
            "  Accuracy: {correct}/{labelled} ({:.1}%)",
            correct as f64 / labelled as f64 * 100.0
        );
    }
    println!();
    Ok(())
}
