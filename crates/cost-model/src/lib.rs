// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cost-model
//!
//! A static, per-stage cost table for a layered inference pipeline that
//! can be cut between an edge device and a cloud server.
//!
//! - [`LayerProfile`]: compute, memory-access and output-size figures for
//!   one stage boundary.
//! - [`EnergyCoefficients`]: per-operation energy constants (µJ/op) that
//!   turn a profile into compute and memory energy.
//! - [`CostModel`]: the ordered table, with a **type-state pattern**
//!   (`Loaded` → `Validated`) so the selector only ever sees a checked table.
//! - [`CostManifest`]: the JSON descriptor used to load alternative tables.
//!
//! # Example
//! ```
//! use cost_model::{CostModel, EnergyCoefficients};
//!
//! let model = CostModel::mobilenet_v2();
//! let coeffs = EnergyCoefficients::default();
//! let first = model.profile(1).unwrap();
//! assert!(coeffs.compute_energy(first) > 0.0);
//! assert!(model.profile(0).is_err());
//! ```

mod error;
pub mod model;
pub(crate) mod manifest;
mod profile;

pub use error::CostModelError;
pub use manifest::{CostManifest, ManifestStage};
pub use model::CostModel;
pub use profile::{EnergyCoefficients, LayerProfile};
