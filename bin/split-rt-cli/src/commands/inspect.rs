// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `split-rt inspect` command: display the cost table and per-cut energy.

use channel_estimator::ChannelSample;
use runtime::RuntimeConfig;

pub async fn execute(config: RuntimeConfig, snr: Option<f64>) -> anyhow::Result<()> {
    super::banner("Cost Inspector");

    let selector = config.build_selector()?;
    let costs = selector.costs();
    println!("  {}", costs.summary());
    println!(
        "  Coefficients: E_MUL={:e} E_ADD={:e} E_MEM={:e} µJ/op",
        config.energy.e_mul, config.energy.e_add, config.energy.e_mem
    );

    let sample = snr.map(|s| ChannelSample::new(s, 0.0));
    match &sample {
        Some(s) => println!(
            "  Channel: SNR {:.1} dB → {:.2} Mbps",
            s.snr_db,
            selector.estimator().estimate_throughput(s.snr_db)
        ),
        None => println!(
            "  Channel: none, flat {} µJ/byte",
            config.channel.tx_energy_per_byte
        ),
    }
    println!();

    let candidates: Vec<_> = selector.context().scan(sample.as_ref()).collect();
    let best = candidates
        .iter()
        .fold(None::<&split_selector::Candidate>, |best, c| match best {
            Some(b) if b.energy.total_energy() <= c.energy.total_energy() => Some(b),
            _ => Some(c),
        })
        .map(|c| c.index);

    println!(
        "  {:<4} {:>12} {:>14} {:>14} {:>14}",
        "Cut", "Output", "Prefix µJ", "Transfer µJ", "Total µJ",
    );
    println!("  {}", "-".repeat(64));
    for c in &candidates {
        let bytes = costs.profile(c.index)?.output_bytes;
        println!(
            "  {:<4} {:>9.1} KB {:>14.2} {:>14.2} {:>14.2}{}",
            c.index,
            bytes as f64 / 1024.0,
            c.energy.compute_energy() + c.energy.memory_energy(),
            c.energy.transfer_energy(),
            c.energy.total_energy(),
            if Some(c.index) == best { "  ◄ min" } else { "" },
        );
    }
    println!();

    let decision = selector.select("inspect".into(), sample.as_ref());
    println!("  Strategy '{}' selects cut {}", decision.strategy, decision.layer_index);
    println!();
    Ok(())
}
