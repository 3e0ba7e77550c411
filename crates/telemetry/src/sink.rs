// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Append-only record sinks.

use crate::{EnergyRecord, InvocationRecord, TelemetryError};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Destination for telemetry rows. Appends from concurrent invocations are
/// serialized by the implementation; no row is ever rewritten.
pub trait TelemetrySink: Send + Sync {
    fn append_energy(&self, record: &EnergyRecord) -> Result<(), TelemetryError>;

    fn append_invocation(&self, record: &InvocationRecord) -> Result<(), TelemetryError>;
}

/// Headerless CSV logs on disk, opened in append mode per row.
#[derive(Debug)]
pub struct CsvTelemetrySink {
    energy_log: PathBuf,
    invocation_log: PathBuf,
    append: Mutex<()>,
}

impl CsvTelemetrySink {
    pub fn new(energy_log: impl Into<PathBuf>, invocation_log: impl Into<PathBuf>) -> Self {
        Self {
            energy_log: energy_log.into(),
            invocation_log: invocation_log.into(),
            append: Mutex::new(()),
        }
    }

    pub fn energy_log(&self) -> &Path {
        &self.energy_log
    }

    pub fn invocation_log(&self) -> &Path {
        &self.invocation_log
    }

    fn append_row(&self, path: &Path, row: &[String]) -> Result<(), TelemetryError> {
        let _guard = self.append.lock().unwrap_or_else(|p| p.into_inner());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| TelemetryError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| TelemetryError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let csv_err = |source| TelemetryError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(row).map_err(csv_err)?;
        writer.flush().map_err(|source| TelemetryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl TelemetrySink for CsvTelemetrySink {
    fn append_energy(&self, record: &EnergyRecord) -> Result<(), TelemetryError> {
        self.append_row(&self.energy_log, &record.to_row())
    }

    fn append_invocation(&self, record: &InvocationRecord) -> Result<(), TelemetryError> {
        self.append_row(&self.invocation_log, &record.to_row())
    }
}

/// In-memory sink for tests and in-process simulation.
#[derive(Debug, Default)]
pub struct MemoryTelemetrySink {
    energy: Mutex<Vec<EnergyRecord>>,
    invocations: Mutex<Vec<InvocationRecord>>,
}

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

impl MemoryTelemetrySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn energy_records(&self) -> Vec<EnergyRecord> {
        locked(&self.energy).clone()
    }

    pub fn invocation_records(&self) -> Vec<InvocationRecord> {
        locked(&self.invocations).clone()
    }
}

impl TelemetrySink for MemoryTelemetrySink {
    fn append_energy(&self, record: &EnergyRecord) -> Result<(), TelemetryError> {
        locked(&self.energy).push(record.clone());
        Ok(())
    }

    fn append_invocation(&self, record: &InvocationRecord) -> Result<(), TelemetryError> {
        locked(&self.invocations).push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LatencySample, Prediction};
    use std::sync::Arc;

    fn energy(layer: u32) -> EnergyRecord {
        EnergyRecord {
            layer_index: layer,
            snr_db: None,
            throughput_mbps: 0.0,
            compute_energy: 1.0,
            memory_energy: 2.0,
            transfer_energy: 3.0,
            total_energy: 6.0,
        }
    }

    #[test]
    fn test_csv_sink_appends_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvTelemetrySink::new(
            dir.path().join("logs/energy_log.csv"),
            dir.path().join("logs/invocation_log.csv"),
        );
        sink.append_energy(&energy(13)).unwrap();
        sink.append_energy(&energy(2)).unwrap();
        let invocation = InvocationRecord::new(
            &energy(2),
            LatencySample { edge: 0.5, transfer: 0.25, cloud: 0.125 },
            Prediction { predicted_label: Some(4), true_label: Some(4) },
        );
        sink.append_invocation(&invocation).unwrap();

        let energy_log = std::fs::read_to_string(sink.energy_log()).unwrap();
        assert_eq!(
            energy_log,
            "13,,0.00,1.00,2.00,3.00,6.00\n2,,0.00,1.00,2.00,3.00,6.00\n"
        );
        let invocation_log = std::fs::read_to_string(sink.invocation_log()).unwrap();
        assert_eq!(
            invocation_log,
            "2,,0.00,1.00,2.00,3.00,6.00,0.500,0.250,0.125,0.875,4,4,true\n"
        );
    }

    #[test]
    fn test_concurrent_appends_keep_lines_whole() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(CsvTelemetrySink::new(
            dir.path().join("e.csv"),
            dir.path().join("i.csv"),
        ));
        let handles: Vec<_> = (1..=8)
            .map(|layer| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        sink.append_energy(&energy(layer)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let log = std::fs::read_to_string(sink.energy_log()).unwrap();
        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines.len(), 200);
        assert!(lines.iter().all(|l| l.split(',').count() == 7));
    }

    #[test]
    fn test_memory_sink_keeps_arrival_order() {
        let sink = MemoryTelemetrySink::new();
        for layer in [5, 1, 9] {
            sink.append_energy(&energy(layer)).unwrap();
        }
        let layers: Vec<_> = sink.energy_records().iter().map(|r| r.layer_index).collect();
        assert_eq!(layers, vec![5, 1, 9]);
        assert!(sink.invocation_records().is_empty());
    }
}
