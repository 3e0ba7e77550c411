// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration loaded from TOML files or constructed programmatically.
//!
//! Every section and every key is optional; omitted values take the
//! defaults shown below.
//!
//! # TOML Format
//! ```toml
//! [energy]
//! e_mul = 3.1e-3
//! e_add = 0.9e-3
//! e_mem = 0.5e-3
//!
//! [channel]
//! bandwidth_hz = 20e6
//! tx_power_dbm = 17.0
//! tx_energy_per_byte = 0.5
//!
//! [selection]
//! strategy = "energy-minimizing"
//! default_split = 13
//! # fixed_split = 5
//! # profile_path = "profiles/mobilenet_v2.json"
//! # channel_log = "files/channel.log"
//!
//! [handoff]
//! store_dir = "files"
//! edge_to_cloud_slot = "edge_to_cloud.bin"
//! cloud_to_edge_slot = "cloud_to_edge.bin"
//! poll_interval_ms = 500
//! timeout_ms = 30000
//!
//! [telemetry]
//! energy_log = "files/energy_log.csv"
//! invocation_log = "files/invocation_log.csv"
//! latency_edge_file = "files/latency_edge.log"
//! latency_transfer_file = "files/latency_transfer.log"
//! latency_cloud_file = "files/latency_cloud.log"
//! ```

use crate::RuntimeError;
use channel_estimator::{ChannelEstimator, ChannelLog, ChannelParams};
use cost_model::{model::Validated, CostModel, EnergyCoefficients};
use handoff::{FsArtifactStore, HandoffConfig};
use split_selector::{SplitSelector, SplitStrategy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use telemetry::{CsvTelemetrySink, LatencyFiles};

/// Configuration for the split runtime. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub energy: EnergyCoefficients,
    pub channel: ChannelParams,
    pub selection: SelectionConfig,
    pub handoff: HandoffSection,
    pub telemetry: TelemetryConfig,
}

/// `[selection]`: how the cut is chosen.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Strategy name: `"energy-minimizing"` or `"fixed"`.
    pub strategy: String,
    /// Cut used when no channel sample is available.
    pub default_split: u32,
    /// Cut pinned by the `fixed` strategy (defaults to `default_split`).
    pub fixed_split: Option<u32>,
    /// JSON cost manifest; the built-in MobileNetV2 table when absent.
    pub profile_path: Option<PathBuf>,
    /// Channel metrics log to sample from.
    pub channel_log: Option<PathBuf>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategy: "energy-minimizing".to_string(),
            default_split: 13,
            fixed_split: None,
            profile_path: None,
            channel_log: None,
        }
    }
}

/// `[handoff]`: artifact store location and polling bounds.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HandoffSection {
    pub store_dir: PathBuf,
    pub edge_to_cloud_slot: String,
    pub cloud_to_edge_slot: String,
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for HandoffSection {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("files"),
            edge_to_cloud_slot: "edge_to_cloud.bin".to_string(),
            cloud_to_edge_slot: "cloud_to_edge.bin".to_string(),
            poll_interval_ms: 500,
            timeout_ms: 30_000,
        }
    }
}

/// `[telemetry]`: log and latency file locations.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub energy_log: PathBuf,
    pub invocation_log: PathBuf,
    pub latency_edge_file: PathBuf,
    pub latency_transfer_file: PathBuf,
    pub latency_cloud_file: PathBuf,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            energy_log: PathBuf::from("files/energy_log.csv"),
            invocation_log: PathBuf::from("files/invocation_log.csv"),
            latency_edge_file: PathBuf::from("files/latency_edge.log"),
            latency_transfer_file: PathBuf::from("files/latency_transfer.log"),
            latency_cloud_file: PathBuf::from("files/latency_cloud.log"),
        }
    }
}

impl RuntimeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::Configuration(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        toml::from_str(toml_str)
            .map_err(|e| RuntimeError::Configuration(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::Configuration(format!("TOML serialise error: {e}")))
    }

    /// Checks everything that can be checked without touching the disk.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if !self.energy.is_valid() {
            return Err(RuntimeError::Configuration(format!(
                "energy coefficients must be finite and non-negative: {:?}",
                self.energy
            )));
        }
        self.channel.validate()?;

        if self.selection.default_split == 0 {
            return Err(RuntimeError::Configuration(
                "default_split must be at least 1".into(),
            ));
        }

        let h = &self.handoff;
        if h.poll_interval_ms == 0 || h.timeout_ms == 0 {
            return Err(RuntimeError::Configuration(
                "poll_interval_ms and timeout_ms must be positive".into(),
            ));
        }
        if h.edge_to_cloud_slot == h.cloud_to_edge_slot {
            return Err(RuntimeError::Configuration(format!(
                "edge_to_cloud_slot and cloud_to_edge_slot must differ (both '{}')",
                h.edge_to_cloud_slot
            )));
        }
        for slot in [&h.edge_to_cloud_slot, &h.cloud_to_edge_slot] {
            handoff::validate_slot(slot)
                .map_err(|e| RuntimeError::Configuration(format!("handoff slot: {e}")))?;
        }
        Ok(())
    }

    /// Polling bounds for every handoff.
    pub fn handoff_config(&self) -> HandoffConfig {
        HandoffConfig {
            poll_interval: Duration::from_millis(self.handoff.poll_interval_ms),
            timeout: Duration::from_millis(self.handoff.timeout_ms),
        }
    }

    /// Loads the configured cost table.
    pub fn cost_model(&self) -> Result<CostModel<Validated>, RuntimeError> {
        match &self.selection.profile_path {
            Some(path) => Ok(CostModel::from_manifest(path)?),
            None => Ok(CostModel::mobilenet_v2()),
        }
    }

    pub fn estimator(&self) -> Result<ChannelEstimator, RuntimeError> {
        self.channel.validate()?;
        Ok(ChannelEstimator::new(self.channel))
    }

    /// Creates the split strategy specified by this config.
    pub fn create_strategy(&self) -> Result<Box<dyn SplitStrategy>, RuntimeError> {
        let s = &self.selection;
        Ok(split_selector::strategy_by_name(
            &s.strategy,
            s.default_split,
            s.fixed_split,
        )?)
    }

    /// Builds a selector over the configured table. Fails if any configured
    /// cut lies outside the table.
    pub fn build_selector(&self) -> Result<SplitSelector, RuntimeError> {
        Ok(SplitSelector::new(
            self.cost_model()?,
            self.energy,
            self.estimator()?,
            self.create_strategy()?,
        )?)
    }

    pub fn open_store(&self) -> Result<FsArtifactStore, RuntimeError> {
        Ok(FsArtifactStore::open(&self.handoff.store_dir)?)
    }

    pub fn channel_log(&self) -> Option<ChannelLog> {
        self.selection.channel_log.as_ref().map(ChannelLog::new)
    }

    pub fn latency_files(&self) -> LatencyFiles {
        let t = &self.telemetry;
        LatencyFiles::new(
            &t.latency_edge_file,
            &t.latency_transfer_file,
            &t.latency_cloud_file,
        )
    }

    pub fn csv_sink(&self) -> CsvTelemetrySink {
        CsvTelemetrySink::new(&self.telemetry.energy_log, &self.telemetry.invocation_log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = RuntimeConfig::default();
        assert_eq!(c.selection.default_split, 13);
        assert_eq!(c.selection.strategy, "energy-minimizing");
        assert_eq!(c.handoff.poll_interval_ms, 500);
        assert_eq!(c.handoff.timeout_ms, 30_000);
        assert_eq!(c.energy, EnergyCoefficients::default());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let toml = r#"
[selection]
strategy = "fixed"
fixed_split = 5

[handoff]
timeout_ms = 2000

[energy]
e_mul = 4.0e-3
"#;
        let c = RuntimeConfig::from_toml(toml).unwrap();
        assert_eq!(c.selection.strategy, "fixed");
        assert_eq!(c.selection.fixed_split, Some(5));
        assert_eq!(c.selection.default_split, 13);
        assert_eq!(c.handoff.timeout_ms, 2000);
        assert_eq!(c.handoff.poll_interval_ms, 500);
        assert_eq!(c.energy.e_mul, 4.0e-3);
        assert_eq!(c.energy.e_add, 0.9e-3);
        assert_eq!(c.handoff_config().timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut c = RuntimeConfig::default();
        c.selection.profile_path = Some(PathBuf::from("/tmp/p.json"));
        let toml = c.to_toml().unwrap();
        assert_eq!(RuntimeConfig::from_toml(&toml).unwrap(), c);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            RuntimeConfig::from_toml("[handoff]\ntimeout_ms = \"soon\""),
            Err(RuntimeError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut c = RuntimeConfig::default();
        c.handoff.timeout_ms = 0;
        assert!(matches!(c.validate(), Err(RuntimeError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_shared_slot() {
        let mut c = RuntimeConfig::default();
        c.handoff.cloud_to_edge_slot = c.handoff.edge_to_cloud_slot.clone();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_slot_with_path() {
        for bad in ["sub/edge.bin", ".hidden", ""] {
            let mut c = RuntimeConfig::default();
            c.handoff.edge_to_cloud_slot = bad.to_string();
            assert!(matches!(c.validate(), Err(RuntimeError::Configuration(_))), "{bad:?}");
        }
        let mut c = RuntimeConfig::default();
        c.handoff.cloud_to_edge_slot = "..\\result.bin".into();
        assert!(matches!(c.validate(), Err(RuntimeError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_negative_coefficient() {
        let mut c = RuntimeConfig::default();
        c.energy.e_mem = -1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_build_selector_rejects_out_of_range_default() {
        let mut c = RuntimeConfig::default();
        c.selection.default_split = 18;
        assert!(matches!(c.build_selector(), Err(RuntimeError::Selector(_))));
    }

    #[test]
    fn test_create_strategy_unknown() {
        let mut c = RuntimeConfig::default();
        c.selection.strategy = "bogus".into();
        assert!(c.create_strategy().is_err());
    }

    #[test]
    fn test_create_strategy_fixed() {
        let mut c = RuntimeConfig::default();
        c.selection.strategy = "fixed".into();
        c.selection.fixed_split = Some(4);
        assert_eq!(c.create_strategy().unwrap().name(), "fixed");
        assert_eq!(c.build_selector().unwrap().strategy_name(), "fixed");
    }

    #[test]
    fn test_missing_profile_is_error() {
        let mut c = RuntimeConfig::default();
        c.selection.profile_path = Some(PathBuf::from("/definitely/not/here.json"));
        assert!(matches!(c.cost_model(), Err(RuntimeError::CostModel(_))));
    }
}
