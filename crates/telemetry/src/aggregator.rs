// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-invocation recording policy.

use crate::{
    EnergyRecord, InvocationRecord, LatencySample, Prediction, TelemetryError, TelemetrySink,
};
use split_selector::{CorrelationToken, SplitDecision};
use std::sync::Arc;

/// Turns decisions and measurements into log rows.
#[derive(Clone)]
pub struct TelemetryAggregator {
    sink: Arc<dyn TelemetrySink>,
}

impl TelemetryAggregator {
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self { sink }
    }

    /// Append the energy row for `decision`.
    pub fn record_decision(&self, decision: &SplitDecision) -> Result<EnergyRecord, TelemetryError> {
        let record = EnergyRecord::from(decision);
        self.sink.append_energy(&record)?;
        tracing::debug!(token = %decision.token, layer = record.layer_index, "Energy recorded");
        Ok(record)
    }

    /// Append the invocation row once every latency figure is known.
    ///
    /// `latency` carries either the three figures or the names of the
    /// missing ones. Missing figures never become zeros: the row is
    /// withheld and [`TelemetryError::MissingTelemetry`] is returned.
    pub fn complete_invocation(
        &self,
        token: &CorrelationToken,
        energy: &EnergyRecord,
        latency: Result<LatencySample, Vec<String>>,
        prediction: Prediction,
    ) -> Result<InvocationRecord, TelemetryError> {
        let latency = latency.map_err(|missing| {
            tracing::warn!(token = %token, missing = ?missing, "Invocation row withheld");
            TelemetryError::MissingTelemetry {
                token: token.clone(),
                missing,
            }
        })?;

        let record = InvocationRecord::new(energy, latency, prediction);
        self.sink.append_invocation(&record)?;
        tracing::info!(token = %token, "{}", record.summary());
        Ok(record)
    }

    /// Energy row unconditionally, then the invocation row if possible.
    pub fn record(
        &self,
        decision: &SplitDecision,
        latency: Result<LatencySample, Vec<String>>,
        prediction: Prediction,
    ) -> Result<InvocationRecord, TelemetryError> {
        let energy = self.record_decision(decision)?;
        self.complete_invocation(&decision.token, &energy, latency, prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryTelemetrySink, PartialLatency};
    use channel_estimator::ChannelSample;
    use split_selector::EnergyBreakdown;
    use std::time::Duration;

    fn decision() -> SplitDecision {
        SplitDecision {
            token: CorrelationToken::new("3_img.png"),
            layer_index: 2,
            channel: Some(ChannelSample::at(10.0, -60.0, Duration::from_secs(1))),
            energy: EnergyBreakdown::new(4.0, 1.0, 0.5),
            estimated_throughput_mbps: 69.2,
            strategy: "energy-minimizing".into(),
        }
    }

    fn aggregator() -> (Arc<MemoryTelemetrySink>, TelemetryAggregator) {
        let sink = Arc::new(MemoryTelemetrySink::new());
        let agg = TelemetryAggregator::new(sink.clone());
        (sink, agg)
    }

    #[test]
    fn test_complete_invocation_appends_both() {
        let (sink, agg) = aggregator();
        let latency = LatencySample { edge: 0.1, transfer: 0.2, cloud: 0.3 };
        let record = agg
            .record(
                &decision(),
                Ok(latency),
                Prediction { predicted_label: Some(3), true_label: Some(3) },
            )
            .unwrap();
        assert!(record.correct);
        assert_eq!(record.total_energy, 5.5);
        assert_eq!(record.snr_db, Some(10.0));
        assert_eq!(sink.energy_records().len(), 1);
        assert_eq!(sink.invocation_records(), vec![record]);
    }

    #[test]
    fn test_missing_latency_still_records_energy() {
        let (sink, agg) = aggregator();
        let partial = PartialLatency { edge: Some(0.1), transfer: None, cloud: Some(0.3) };
        let err = agg
            .record(&decision(), partial.complete(), Prediction::default())
            .unwrap_err();

        match err {
            TelemetryError::MissingTelemetry { token, missing } => {
                assert_eq!(token.as_str(), "3_img.png");
                assert_eq!(missing, vec!["latency_transfer".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(sink.energy_records().len(), 1);
        assert!(sink.invocation_records().is_empty());
    }

    #[test]
    fn test_energy_record_matches_decision() {
        let (_, agg) = aggregator();
        let energy = agg.record_decision(&decision()).unwrap();
        assert_eq!(energy.layer_index, 2);
        assert_eq!(energy.compute_energy, 4.0);
        assert_eq!(energy.memory_energy, 1.0);
        assert_eq!(energy.transfer_energy, 0.5);
        assert_eq!(energy.throughput_mbps, 69.2);
    }
}
