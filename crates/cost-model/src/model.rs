// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The cost table: an ordered sequence of stage profiles.
//!
//! # Type-State Pattern
//!
//! ```text
//! CostModel<Loaded>  stages parsed, not yet checked.
//!       │  .validate()
//!       ▼
//! CostModel<Validated>  indices contiguous 1..=N, figures finite.
//! ```
//!
//! Only a `CostModel<Validated>` exposes lookups, so a malformed table is
//! caught once at startup and never surfaces during an invocation.

use crate::{CostModelError, EnergyCoefficients, LayerProfile};
use std::fmt;

/// Marker: table has been loaded but not validated.
#[derive(Debug, Clone)]
pub struct Loaded;

/// Marker: table has been validated and is safe to query.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for table states.
pub trait ModelState: fmt::Debug + Clone {}
impl ModelState for Loaded {}
impl ModelState for Validated {}

/// MobileNetV2 (MNIST head) profiles: (output bytes, M, A, Γ) per stage.
const MOBILENET_V2: [(u64, f64, f64, f64); 17] = [
    (1_606_127, 1.20e7, 1.20e7, 1.86e3),
    (803_313, 2.37e7, 2.37e7, 3.65e3),
    (301_553, 5.76e7, 5.76e7, 1.39e4),
    (301_553, 8.62e7, 8.62e7, 3.16e4),
    (100_843, 1.03e8, 1.03e8, 5.16e4),
    (100_843, 1.15e8, 1.15e8, 8.13e4),
    (100_843, 1.27e8, 1.27e8, 1.11e5),
    (50_657, 1.35e8, 1.35e8, 1.53e5),
    (50_657, 1.46e8, 1.46e8, 2.62e5),
    (50_657, 1.57e8, 1.57e8, 3.70e5),
    (50_657, 1.68e8, 1.68e8, 4.79e5),
    (75_756, 1.81e8, 1.81e8, 6.12e5),
    (75_756, 2.04e8, 2.04e8, 8.49e5),
    (75_756, 2.28e8, 2.28e8, 1.09e6),
    (31_844, 2.44e8, 2.44e8, 1.40e6),
    (31_844, 2.60e8, 2.60e8, 2.04e6),
    (31_844, 2.75e8, 2.75e8, 2.68e6),
];

/// The static cost table for an `N`-stage pipeline.
///
/// Stage indices are 1-based: index `i` describes a cut placed right
/// after stage `i`.
#[derive(Debug, Clone)]
pub struct CostModel<S: ModelState = Loaded> {
    /// Human-readable table name (e.g., `"mobilenet_v2"`).
    pub name: String,
    /// `(index, profile)` pairs in table order.
    stages: Vec<(u32, LayerProfile)>,
    _state: std::marker::PhantomData<S>,
}

impl CostModel<Loaded> {
    /// Creates an unchecked table.
    pub fn new(name: String, stages: Vec<(u32, LayerProfile)>) -> Self {
        Self {
            name,
            stages,
            _state: std::marker::PhantomData,
        }
    }

    /// Validates the table and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The table is non-empty.
    /// - Indices are exactly `1, 2, ..., N` in order.
    /// - Every figure is finite and non-negative, which keeps the
    ///   cumulative compute cost non-decreasing.
    pub fn validate(self) -> Result<CostModel<Validated>, CostModelError> {
        if self.stages.is_empty() {
            return Err(CostModelError::Empty(self.name));
        }

        for (position, (index, profile)) in self.stages.iter().enumerate() {
            let expected = position as u32 + 1;
            if *index != expected {
                return Err(CostModelError::NonContiguous {
                    model: self.name.clone(),
                    expected,
                    found: *index,
                });
            }
            if let Some(detail) = profile.check() {
                return Err(CostModelError::InvalidProfile {
                    index: *index,
                    detail,
                });
            }
        }

        tracing::debug!("cost model '{}' validated: {} stages", self.name, self.stages.len());

        Ok(CostModel {
            name: self.name,
            stages: self.stages,
            _state: std::marker::PhantomData,
        })
    }
}

impl CostModel<Validated> {
    /// The built-in 17-stage MobileNetV2 table.
    pub fn mobilenet_v2() -> Self {
        let stages = MOBILENET_V2
            .iter()
            .enumerate()
            .map(|(i, &(bytes, m, a, gamma))| (i as u32 + 1, LayerProfile::new(m, a, gamma, bytes)))
            .collect();
        CostModel {
            name: "mobilenet_v2".to_string(),
            stages,
            _state: std::marker::PhantomData,
        }
    }

    /// Returns `N`, the number of stages.
    pub fn num_layers(&self) -> u32 {
        self.stages.len() as u32
    }

    /// Returns `true` if `index` lies in `[1, N]`.
    pub fn contains(&self, index: u32) -> bool {
        index >= 1 && index <= self.num_layers()
    }

    /// Returns the profile for stage `index`.
    pub fn profile(&self, index: u32) -> Result<&LayerProfile, CostModelError> {
        if !self.contains(index) {
            return Err(CostModelError::OutOfRange {
                index,
                num_layers: self.num_layers(),
            });
        }
        Ok(&self.stages[index as usize - 1].1)
    }

    /// Iterates over `(index, profile)` in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &LayerProfile)> {
        self.stages.iter().map(|(i, p)| (*i, p))
    }

    /// Cumulative `(compute, memory)` energy of stages `1..=index`.
    pub fn prefix_energy(
        &self,
        index: u32,
        coeffs: &EnergyCoefficients,
    ) -> Result<(f64, f64), CostModelError> {
        self.profile(index)?;
        Ok(self
            .iter()
            .take(index as usize)
            .fold((0.0, 0.0), |(c, m), (_, p)| {
                (c + coeffs.compute_energy(p), m + coeffs.memory_energy(p))
            }))
    }

    /// Returns a summary string describing the table.
    pub fn summary(&self) -> String {
        let largest = self.iter().map(|(_, p)| p.output_bytes).max().unwrap_or(0);
        let smallest = self.iter().map(|(_, p)| p.output_bytes).min().unwrap_or(0);
        format!(
            "Cost model '{}': {} stages, boundary sizes {:.1}..{:.1} KB",
            self.name,
            self.num_layers(),
            smallest as f64 / 1024.0,
            largest as f64 / 1024.0,
        )
    }
}
