// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Record types written to the telemetry logs.

use serde::{Deserialize, Serialize};
use split_selector::SplitDecision;

/// Analytic energy of one decision. Mirrors the energy log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRecord {
    pub layer_index: u32,
    pub snr_db: Option<f64>,
    pub throughput_mbps: f64,
    pub compute_energy: f64,
    pub memory_energy: f64,
    pub transfer_energy: f64,
    pub total_energy: f64,
}

impl From<&SplitDecision> for EnergyRecord {
    fn from(d: &SplitDecision) -> Self {
        Self {
            layer_index: d.layer_index,
            snr_db: d.snr_db(),
            throughput_mbps: d.estimated_throughput_mbps,
            compute_energy: d.energy.compute_energy(),
            memory_energy: d.energy.memory_energy(),
            transfer_energy: d.energy.transfer_energy(),
            total_energy: d.energy.total_energy(),
        }
    }
}

impl EnergyRecord {
    /// CSV fields, two decimals, empty SNR when no sample was available.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.layer_index.to_string(),
            self.snr_db.map(|s| format!("{s:.2}")).unwrap_or_default(),
            format!("{:.2}", self.throughput_mbps),
            format!("{:.2}", self.compute_energy),
            format!("{:.2}", self.memory_energy),
            format!("{:.2}", self.transfer_energy),
            format!("{:.2}", self.total_energy),
        ]
    }
}

/// The three measured latencies of one invocation, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySample {
    pub edge: f64,
    pub transfer: f64,
    pub cloud: f64,
}

impl LatencySample {
    pub fn total(&self) -> f64 {
        self.edge + self.transfer + self.cloud
    }
}

/// Predicted and expected class of one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_label: Option<u32>,
    pub true_label: Option<u32>,
}

impl Prediction {
    /// True only when both labels are known and equal.
    pub fn is_correct(&self) -> bool {
        matches!((self.predicted_label, self.true_label), (Some(p), Some(t)) if p == t)
    }
}

/// One completed invocation. Field order is the log column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRecord {
    pub layer_index: u32,
    pub snr_db: Option<f64>,
    pub throughput_mbps: f64,
    pub compute_energy: f64,
    pub memory_energy: f64,
    pub transfer_energy: f64,
    pub total_energy: f64,
    pub latency_edge: f64,
    pub latency_transfer: f64,
    pub latency_cloud: f64,
    pub latency_total: f64,
    pub predicted_label: Option<u32>,
    pub true_label: Option<u32>,
    pub correct: bool,
}

impl InvocationRecord {
    pub fn new(energy: &EnergyRecord, latency: LatencySample, prediction: Prediction) -> Self {
        Self {
            layer_index: energy.layer_index,
            snr_db: energy.snr_db,
            throughput_mbps: energy.throughput_mbps,
            compute_energy: energy.compute_energy,
            memory_energy: energy.memory_energy,
            transfer_energy: energy.transfer_energy,
            total_energy: energy.total_energy,
            latency_edge: latency.edge,
            latency_transfer: latency.transfer,
            latency_cloud: latency.cloud,
            latency_total: latency.total(),
            predicted_label: prediction.predicted_label,
            true_label: prediction.true_label,
            correct: prediction.is_correct(),
        }
    }

    /// CSV fields: energy at two decimals, latency at three.
    pub fn to_row(&self) -> Vec<String> {
        let label = |l: Option<u32>| l.map(|v| v.to_string()).unwrap_or_default();
        vec![
            self.layer_index.to_string(),
            self.snr_db.map(|s| format!("{s:.2}")).unwrap_or_default(),
            format!("{:.2}", self.throughput_mbps),
            format!("{:.2}", self.compute_energy),
            format!("{:.2}", self.memory_energy),
            format!("{:.2}", self.transfer_energy),
            format!("{:.2}", self.total_energy),
            format!("{:.3}", self.latency_edge),
            format!("{:.3}", self.latency_transfer),
            format!("{:.3}", self.latency_cloud),
            format!("{:.3}", self.latency_total),
            label(self.predicted_label),
            label(self.true_label),
            self.correct.to_string(),
        ]
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Invocation: cut {} | energy {:.2} µJ | latency {:.3}s \
             (edge {:.3}s, transfer {:.3}s, cloud {:.3}s) | predicted {} / true {} ({})",
            self.layer_index,
            self.total_energy,
            self.latency_total,
            self.latency_edge,
            self.latency_transfer,
            self.latency_cloud,
            self.predicted_label
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".into()),
            self.true_label
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".into()),
            if self.correct { "correct" } else { "incorrect" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy() -> EnergyRecord {
        EnergyRecord {
            layer_index: 3,
            snr_db: Some(12.345),
            throughput_mbps: 82.1,
            compute_energy: 10.0,
            memory_energy: 2.5,
            transfer_energy: 1.004,
            total_energy: 13.504,
        }
    }

    #[test]
    fn test_energy_row_format() {
        assert_eq!(
            energy().to_row(),
            vec!["3", "12.35", "82.10", "10.00", "2.50", "1.00", "13.50"]
        );
        let no_snr = EnergyRecord { snr_db: None, ..energy() };
        assert_eq!(no_snr.to_row()[1], "");
    }

    #[test]
    fn test_invocation_record_totals_latency() {
        let latency = LatencySample { edge: 0.1, transfer: 0.25, cloud: 0.05 };
        let prediction = Prediction { predicted_label: Some(7), true_label: Some(7) };
        let record = InvocationRecord::new(&energy(), latency, prediction);
        assert!((record.latency_total - 0.4).abs() < 1e-12);
        assert!(record.correct);
        let row = record.to_row();
        assert_eq!(row.len(), 14);
        assert_eq!(&row[7..], &["0.100", "0.250", "0.050", "0.400", "7", "7", "true"]);
    }

    #[test]
    fn test_unknown_labels_are_not_correct() {
        assert!(!Prediction::default().is_correct());
        assert!(!Prediction { predicted_label: Some(1), true_label: None }.is_correct());
        assert!(!Prediction { predicted_label: Some(1), true_label: Some(2) }.is_correct());
    }

    #[test]
    fn test_summary_mentions_cut() {
        let record = InvocationRecord::new(
            &energy(),
            LatencySample { edge: 0.0, transfer: 0.0, cloud: 0.0 },
            Prediction::default(),
        );
        assert!(record.summary().contains("cut 3"));
    }
}
