// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-invocation results.

use split_selector::SplitDecision;
use std::time::Duration;
use telemetry::{InvocationRecord, PartialLatency, Prediction};

/// Everything one round trip produced.
#[derive(Debug, Clone)]
pub struct InvocationReport {
    pub decision: SplitDecision,
    pub prediction: Prediction,
    /// Latencies in seconds; `None` where a figure was not measured.
    pub latency: PartialLatency,
    /// The appended invocation row. `None` when telemetry was incomplete.
    pub record: Option<InvocationRecord>,
    /// Latency figures that kept the row from being written.
    pub missing_latency: Vec<String>,
    /// True when the edge produced nothing to transfer.
    pub empty: bool,
    /// Wall-clock time of the whole round trip.
    pub wall_time: Duration,
}

impl InvocationReport {
    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let secs = |v: Option<f64>| v.map(|s| format!("{s:.3}s")).unwrap_or_else(|| "n/a".into());
        let label = |v: Option<u32>| v.map(|l| l.to_string()).unwrap_or_else(|| "-".into());
        format!(
            "{} | cut {} ({}) | {:.2} µJ | edge {}, transfer {}, cloud {} | predicted {} / true {}{}{} | {:.2}ms wall",
            self.decision.token,
            self.decision.layer_index,
            self.decision.strategy,
            self.decision.energy.total_energy(),
            secs(self.latency.edge),
            secs(self.latency.transfer),
            secs(self.latency.cloud),
            label(self.prediction.predicted_label),
            label(self.prediction.true_label),
            if self.empty { " | empty" } else { "" },
            if self.missing_latency.is_empty() {
                String::new()
            } else {
                format!(" | not recorded, missing {}", self.missing_latency.join(", "))
            },
            self.wall_time.as_secs_f64() * 1000.0,
        )
    }
}
