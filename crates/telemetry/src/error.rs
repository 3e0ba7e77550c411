// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the telemetry crate.

use split_selector::CorrelationToken;
use std::path::PathBuf;

/// Errors raised while recording telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// One or more latency figures were unavailable; the invocation row
    /// was not appended. The energy row was.
    #[error("missing telemetry for invocation {token}: {}", missing.join(", "))]
    MissingTelemetry {
        token: CorrelationToken,
        missing: Vec<String>,
    },

    /// A log or latency file could not be written.
    #[error("telemetry I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A CSV row could not be written.
    #[error("telemetry CSV error on {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}
