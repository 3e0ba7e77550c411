// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Single-value latency files shared between the site processes.
//!
//! The edge and cloud sites each overwrite their file with their compute
//! latency in seconds. The transfer file is cumulative: each handoff adds
//! its transfer time to the stored value. The edge removes all three files
//! at the start of an invocation, so a figure that was never measured for
//! it reads as missing rather than as a stale or zero value.

use crate::{LatencySample, TelemetryError};
use std::path::{Path, PathBuf};

/// Latency figures gathered so far for one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialLatency {
    pub edge: Option<f64>,
    pub transfer: Option<f64>,
    pub cloud: Option<f64>,
}

impl PartialLatency {
    /// All three figures, or the names of those that are missing.
    pub fn complete(self) -> Result<LatencySample, Vec<String>> {
        match (self.edge, self.transfer, self.cloud) {
            (Some(edge), Some(transfer), Some(cloud)) => Ok(LatencySample {
                edge,
                transfer,
                cloud,
            }),
            _ => {
                let missing = [
                    ("latency_edge", self.edge),
                    ("latency_transfer", self.transfer),
                    ("latency_cloud", self.cloud),
                ]
                .into_iter()
                .filter(|(_, v)| v.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
                Err(missing)
            }
        }
    }
}

/// Paths of the three latency files.
#[derive(Debug, Clone)]
pub struct LatencyFiles {
    pub edge: PathBuf,
    pub transfer: PathBuf,
    pub cloud: PathBuf,
}

impl LatencyFiles {
    pub fn new(
        edge: impl Into<PathBuf>,
        transfer: impl Into<PathBuf>,
        cloud: impl Into<PathBuf>,
    ) -> Self {
        Self {
            edge: edge.into(),
            transfer: transfer.into(),
            cloud: cloud.into(),
        }
    }

    pub fn write_edge(&self, seconds: f64) -> Result<(), TelemetryError> {
        write_value(&self.edge, seconds)
    }

    pub fn write_cloud(&self, seconds: f64) -> Result<(), TelemetryError> {
        write_value(&self.cloud, seconds)
    }

    /// Remove all three files before a new invocation.
    pub fn clear(&self) -> Result<(), TelemetryError> {
        for path in [&self.edge, &self.transfer, &self.cloud] {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(TelemetryError::Io {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }
        Ok(())
    }

    /// Add one handoff's transfer time to the running total, creating the
    /// file on the first handoff.
    pub fn add_transfer(&self, seconds: f64) -> Result<f64, TelemetryError> {
        let total = read_value(&self.transfer).unwrap_or(0.0) + seconds;
        write_value(&self.transfer, total)?;
        Ok(total)
    }

    /// Read whatever figures are available. Missing or unparsable files
    /// are logged and left as `None`.
    pub fn read(&self) -> PartialLatency {
        PartialLatency {
            edge: read_logged(&self.edge),
            transfer: read_logged(&self.transfer),
            cloud: read_logged(&self.cloud),
        }
    }

    /// Like [`read`](Self::read) but names missing figures by path.
    pub fn read_complete(&self) -> Result<LatencySample, Vec<String>> {
        let partial = self.read();
        partial.complete().map_err(|_| {
            [
                (&self.edge, partial.edge),
                (&self.transfer, partial.transfer),
                (&self.cloud, partial.cloud),
            ]
            .into_iter()
            .filter(|(_, v)| v.is_none())
            .map(|(p, _)| p.display().to_string())
            .collect()
        })
    }
}

fn write_value(path: &Path, seconds: f64) -> Result<(), TelemetryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TelemetryError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, format!("{seconds}\n")).map_err(|source| TelemetryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_value(path: &Path) -> Option<f64> {
    std::fs::read_to_string(path)
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn read_logged(path: &Path) -> Option<f64> {
    let value = read_value(path);
    if value.is_none() {
        tracing::warn!(path = %path.display(), "Latency value unavailable");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(dir: &Path) -> LatencyFiles {
        LatencyFiles::new(
            dir.join("latency_edge.log"),
            dir.join("latency_transfer.log"),
            dir.join("latency_cloud.log"),
        )
    }

    #[test]
    fn test_write_and_read_all() {
        let dir = tempfile::tempdir().unwrap();
        let f = files(dir.path());
        f.write_edge(0.012).unwrap();
        f.write_cloud(0.034).unwrap();
        f.add_transfer(0.1).unwrap();
        let total = f.add_transfer(0.2).unwrap();
        assert!((total - 0.3).abs() < 1e-12);

        let sample = f.read_complete().unwrap();
        assert_eq!(sample.edge, 0.012);
        assert_eq!(sample.cloud, 0.034);
        assert!((sample.transfer - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file_named() {
        let dir = tempfile::tempdir().unwrap();
        let f = files(dir.path());
        f.write_edge(1.0).unwrap();
        f.write_cloud(1.0).unwrap();
        let missing = f.read_complete().unwrap_err();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].ends_with("latency_transfer.log"));
    }

    #[test]
    fn test_clear_removes_previous_figures() {
        let dir = tempfile::tempdir().unwrap();
        let f = files(dir.path());
        f.write_edge(0.5).unwrap();
        f.add_transfer(0.25).unwrap();
        f.write_cloud(0.125).unwrap();
        f.clear().unwrap();

        assert_eq!(f.read(), PartialLatency::default());
        f.write_edge(0.1).unwrap();
        assert_eq!(f.add_transfer(0.2).unwrap(), 0.2);
        let missing = f.read_complete().unwrap_err();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].ends_with("latency_cloud.log"));
    }

    #[test]
    fn test_clear_without_files() {
        let dir = tempfile::tempdir().unwrap();
        files(&dir.path().join("absent")).clear().unwrap();
    }

    #[test]
    fn test_unparsable_value_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let f = files(dir.path());
        std::fs::write(&f.edge, "not a number").unwrap();
        assert_eq!(f.read().edge, None);
    }

    #[test]
    fn test_transfer_accumulates_from_missing() {
        let dir = tempfile::tempdir().unwrap();
        let f = files(dir.path());
        assert_eq!(f.add_transfer(0.5).unwrap(), 0.5);
    }

    #[test]
    fn test_partial_complete_names() {
        let partial = PartialLatency {
            edge: Some(1.0),
            transfer: None,
            cloud: None,
        };
        assert_eq!(
            partial.complete().unwrap_err(),
            vec!["latency_transfer".to_string(), "latency_cloud".to_string()]
        );
    }
}
