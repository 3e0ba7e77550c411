// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `split-rt cloud` command: serve edge artifacts.
//!
//! Each round is independent: a failed round is reported and the next one
//! starts with a fresh handoff.

use runtime::RuntimeConfig;

pub async fn execute(config: RuntimeConfig, count: usize) -> anyhow::Result<()> {
    super::banner("Cloud Site");

    let site = super::cloud_site(&config)?.with_latency_files(config.latency_files());
    let mut failures = 0usize;

    for round in 1..=count {
        match site.serve_one().await {
            Ok(served) => {
                let token = served
                    .token
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".into());
                match served.latency_cloud {
                    Some(d) => println!(
                        "  [{round}/{count}] {token}: cut {} served in {:.3}s",
                        served.cut.unwrap_or_default(),
                        d.as_secs_f64()
                    ),
                    None => println!("  [{round}/{count}] {token}: empty, forwarded"),
                }
            }
            Err(e) => {
                failures += 1;
                tracing::error!("{e}");
                println!("  [{round}/{count}] FAILED: {e}");
            }
        }
    }

    println!();
    if failures > 0 {
        anyhow::bail!("{failures} of {count} rounds failed");
    }
    Ok(())
}
