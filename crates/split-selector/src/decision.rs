// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Split decisions: the output of the selector.
//!
//! A [`SplitDecision`] is created once per invocation and never mutated.
//! It is the contract between the selector, the stage executors and the
//! telemetry aggregator.

use crate::SelectorError;
use channel_estimator::ChannelSample;
use std::fmt;

/// Identifies the request an invocation (and all its artifacts) belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Energy split into its three components, in µJ.
///
/// `total == compute + memory + transfer` holds for every value of this
/// type: [`EnergyBreakdown::new`] computes the total, and
/// [`EnergyBreakdown::with_total`] (also used on deserialization) rejects
/// a mismatching one.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawBreakdown")]
pub struct EnergyBreakdown {
    compute_energy: f64,
    memory_energy: f64,
    transfer_energy: f64,
    total_energy: f64,
}

#[derive(serde::Deserialize)]
struct RawBreakdown {
    compute_energy: f64,
    memory_energy: f64,
    transfer_energy: f64,
    total_energy: f64,
}

impl TryFrom<RawBreakdown> for EnergyBreakdown {
    type Error = SelectorError;

    fn try_from(raw: RawBreakdown) -> Result<Self, Self::Error> {
        Self::with_total(
            raw.compute_energy,
            raw.memory_energy,
            raw.transfer_energy,
            raw.total_energy,
        )
    }
}

impl EnergyBreakdown {
    pub fn new(compute: f64, memory: f64, transfer: f64) -> Self {
        Self {
            compute_energy: compute,
            memory_energy: memory,
            transfer_energy: transfer,
            total_energy: compute + memory + transfer,
        }
    }

    /// Builds a breakdown from an externally supplied total, checking that
    /// it matches the parts (relative tolerance 1e-9).
    pub fn with_total(
        compute: f64,
        memory: f64,
        transfer: f64,
        total: f64,
    ) -> Result<Self, SelectorError> {
        let sum = compute + memory + transfer;
        let tolerance = 1e-9 * sum.abs().max(1.0);
        if sum == total || (sum - total).abs() <= tolerance {
            Ok(Self {
                compute_energy: compute,
                memory_energy: memory,
                transfer_energy: transfer,
                total_energy: total,
            })
        } else {
            Err(SelectorError::InconsistentEnergy {
                compute,
                memory,
                transfer,
                total,
            })
        }
    }

    pub fn compute_energy(&self) -> f64 {
        self.compute_energy
    }

    pub fn memory_energy(&self) -> f64 {
        self.memory_energy
    }

    pub fn transfer_energy(&self) -> f64 {
        self.transfer_energy
    }

    pub fn total_energy(&self) -> f64 {
        self.total_energy
    }
}

/// The selector's verdict for one invocation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SplitDecision {
    /// Request this decision was made for.
    pub token: CorrelationToken,
    /// Cut point in `[1, N]`: stages `1..=layer_index` run on the edge.
    pub layer_index: u32,
    /// Channel sample the decision was based on (`None` = degraded mode).
    pub channel: Option<ChannelSample>,
    /// Predicted energy at the chosen cut.
    pub energy: EnergyBreakdown,
    /// Shannon throughput estimate, `0.0` without a sample.
    pub estimated_throughput_mbps: f64,
    /// Name of the strategy that produced this decision.
    pub strategy: String,
}

impl SplitDecision {
    /// SNR the decision was based on, if any.
    pub fn snr_db(&self) -> Option<f64> {
        self.channel.map(|c| c.snr_db)
    }

    /// Returns a one-line summary for logging.
    pub fn summary(&self) -> String {
        let snr = match self.snr_db() {
            Some(s) => format!("{s:.2} dB"),
            None => "n/a".to_string(),
        };
        format!(
            "[{}] split={} via '{}' (SNR {snr}, {:.2} Mbps): E_c={:.2} µJ, E_m={:.2} µJ, E_tr={:.2} µJ, total={:.2} µJ",
            self.token,
            self.layer_index,
            self.strategy,
            self.estimated_throughput_mbps,
            self.energy.compute_energy(),
            self.energy.memory_energy(),
            self.energy.transfer_energy(),
            self.energy.total_energy(),
        )
    }
}
