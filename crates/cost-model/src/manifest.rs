// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON cost manifest parsing.
//!
//! # Format
//! ```json
//! {
//!   "name": "mobilenet_v2",
//!   "layers": [
//!     { "index": 1, "output_bytes": 1606127,
//!       "compute_macs": 1.2e7, "compute_adds": 1.2e7, "memory_accesses": 1860 },
//!     ...
//!   ]
//! }
//! ```

use crate::model::Validated;
use crate::{CostModel, CostModelError, LayerProfile};
use std::path::Path;

/// Top-level cost manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CostManifest {
    /// Table name.
    pub name: String,
    /// One entry per stage.
    pub layers: Vec<ManifestStage>,
}

/// A single stage entry in the manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManifestStage {
    /// 1-based stage index.
    pub index: u32,
    /// Output size at this boundary in bytes.
    pub output_bytes: u64,
    /// Multiply operations.
    pub compute_macs: f64,
    /// Add operations.
    pub compute_adds: f64,
    /// Memory accesses.
    pub memory_accesses: f64,
}

impl CostManifest {
    /// Loads a manifest from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, CostModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CostModelError> {
        let manifest: Self = serde_json::from_str(json)?;
        Ok(manifest)
    }

    /// Builds and validates the cost model described by this manifest.
    pub fn into_model(self) -> Result<CostModel<Validated>, CostModelError> {
        let stages = self
            .layers
            .into_iter()
            .map(|s| {
                (
                    s.index,
                    LayerProfile::new(s.compute_macs, s.compute_adds, s.memory_accesses, s.output_bytes),
                )
            })
            .collect();
        CostModel::new(self.name, stages).validate()
    }
}

impl CostModel<Validated> {
    /// Loads and validates a cost model from a JSON manifest file.
    pub fn from_manifest(path: &Path) -> Result<Self, CostModelError> {
        let model = CostManifest::from_file(path)?.into_model()?;
        tracing::info!("loaded {} from '{}'", model.summary(), path.display());
        Ok(model)
    }
}
