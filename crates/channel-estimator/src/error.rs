// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for channel sample handling.

/// Errors that can occur when reading channel samples.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failed to read the channel metrics log.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// A log line does not follow `<time>,RSSI=<dBm>,SNR=<dB>`.
    #[error("failed to parse channel sample from {path}: {detail}")]
    ParseError { path: String, detail: String },

    /// Channel parameters are unusable (e.g., non-positive bandwidth).
    #[error("invalid channel parameters: {0}")]
    InvalidParams(String),
}
