// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for cost-model loading and lookup.

/// Errors that can occur when building or querying a cost model.
#[derive(Debug, thiserror::Error)]
pub enum CostModelError {
    /// A stage index outside `[1, N]` was requested.
    #[error("stage index {index} out of range: valid indices are 1..={num_layers}")]
    OutOfRange { index: u32, num_layers: u32 },

    /// The table contains no stages.
    #[error("cost model '{0}' contains no stages")]
    Empty(String),

    /// Stage indices are not the contiguous range `1..=N`.
    #[error("cost model '{model}': expected stage index {expected}, got {found}")]
    NonContiguous {
        model: String,
        expected: u32,
        found: u32,
    },

    /// A stage carries a negative or non-finite figure.
    #[error("invalid profile for stage {index}: {detail}")]
    InvalidProfile { index: u32, detail: String },

    /// The manifest file could not be read.
    #[error("failed to read cost manifest: {0}")]
    ManifestReadError(#[from] std::io::Error),

    /// The manifest JSON is malformed.
    #[error("failed to parse cost manifest: {0}")]
    ManifestParseError(#[from] serde_json::Error),
}
