// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and the helpers they share.

pub mod cloud;
pub mod edge;
pub mod inspect;
pub mod postprocess;
pub mod select;
pub mod simulate;

use anyhow::Context;
use channel_estimator::ChannelSample;
use handoff::ArtifactStore;
use runtime::{CloudSite, EdgeSite, RuntimeConfig, StageExecutor, SyntheticExecutor};
use split_selector::SplitDecision;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const BANNER_WIDTH: usize = 54;

/// Installs the global tracing subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads and validates the configuration; defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    let config = match path {
        Some(p) => RuntimeConfig::from_file(p)?,
        None => RuntimeConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

pub fn banner(title: &str) {
    let text = format!("split-rt · {title}");
    let pad = BANNER_WIDTH.saturating_sub(text.chars().count());
    let left = pad / 2;
    println!("╔{}╗", "═".repeat(BANNER_WIDTH));
    println!("║{}{}{}║", " ".repeat(left), text, " ".repeat(pad - left));
    println!("╚{}╝", "═".repeat(BANNER_WIDTH));
    println!();
}

/// An explicit SNR wins; otherwise the configured channel log, if any.
pub fn channel_sample(config: &RuntimeConfig, snr: Option<f64>) -> Option<ChannelSample> {
    if let Some(snr) = snr {
        // RSSI is informational; the selector only reads the SNR.
        return Some(ChannelSample::new(snr, 0.0));
    }
    let log = config.channel_log()?;
    match log.latest() {
        Ok(sample) => sample,
        Err(e) => {
            tracing::warn!(error = %e, "Channel sample unavailable, using default split");
            None
        }
    }
}

fn store(config: &RuntimeConfig) -> anyhow::Result<Arc<dyn ArtifactStore>> {
    Ok(Arc::new(config.open_store()?))
}

pub fn edge_site(config: &RuntimeConfig) -> anyhow::Result<EdgeSite> {
    let selector = config.build_selector()?;
    let executor: Arc<dyn StageExecutor> = Arc::new(SyntheticExecutor::new(selector.costs(), 10));
    Ok(EdgeSite::new(
        Arc::new(selector),
        executor,
        store(config)?,
        &config.handoff.edge_to_cloud_slot,
        &config.handoff.cloud_to_edge_slot,
        config.handoff_config(),
    ))
}

pub fn cloud_site(config: &RuntimeConfig) -> anyhow::Result<CloudSite> {
    let costs = config.cost_model()?;
    let executor: Arc<dyn StageExecutor> = Arc::new(SyntheticExecutor::new(&costs, 10));
    Ok(CloudSite::new(
        costs.num_layers(),
        executor,
        store(config)?,
        &config.handoff.edge_to_cloud_slot,
        &config.handoff.cloud_to_edge_slot,
        config.handoff_config(),
    ))
}

pub fn write_decision(path: &Path, decision: &SplitDecision) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(decision)?;
    std::fs::write(path, json).with_context(|| format!("cannot write '{}'", path.display()))
}

pub fn read_decision(path: &Path) -> anyhow::Result<SplitDecision> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read decision '{}'", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("malformed decision '{}'", path.display()))
}
