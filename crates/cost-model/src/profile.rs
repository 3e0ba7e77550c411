// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-stage cost figures and the energy coefficients applied to them.
//!
//! A [`LayerProfile`] describes the pipeline when cut right after a given
//! stage: how much arithmetic the stage costs, how many memory accesses it
//! performs, and how large the intermediate tensor is that would have to
//! cross the link if the cut is placed there.

/// Cost figures for one stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerProfile {
    /// Multiply operations (MACs) executed by this stage.
    pub compute_macs: f64,
    /// Add operations executed by this stage.
    pub compute_adds: f64,
    /// Memory accesses (Γ) performed by this stage.
    pub memory_accesses: f64,
    /// Size in bytes of the serialized output at this boundary.
    pub output_bytes: u64,
}

impl LayerProfile {
    /// Creates a profile from its raw figures.
    pub fn new(compute_macs: f64, compute_adds: f64, memory_accesses: f64, output_bytes: u64) -> Self {
        Self {
            compute_macs,
            compute_adds,
            memory_accesses,
            output_bytes,
        }
    }

    /// Returns a description of the first invalid figure, if any.
    pub(crate) fn check(&self) -> Option<String> {
        let figures = [
            ("compute_macs", self.compute_macs),
            ("compute_adds", self.compute_adds),
            ("memory_accesses", self.memory_accesses),
        ];
        figures.iter().find_map(|(name, value)| {
            if !value.is_finite() {
                Some(format!("{name} is not finite ({value})"))
            } else if *value < 0.0 {
                Some(format!("{name} is negative ({value})"))
            } else {
                None
            }
        })
    }
}

/// Per-operation energy constants, in µJ per operation.
///
/// Supplied once at process start and never mutated; every energy function
/// takes the coefficients explicitly.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EnergyCoefficients {
    /// Energy per multiply (`E_MUL`).
    pub e_mul: f64,
    /// Energy per add (`E_ADD`).
    pub e_add: f64,
    /// Energy per memory access (`E_MEM`).
    pub e_mem: f64,
}

impl EnergyCoefficients {
    /// Compute energy of one stage: `macs * E_MUL + adds * E_ADD`.
    pub fn compute_energy(&self, profile: &LayerProfile) -> f64 {
        profile.compute_macs * self.e_mul + profile.compute_adds * self.e_add
    }

    /// Memory energy of one stage: `accesses * E_MEM`.
    pub fn memory_energy(&self, profile: &LayerProfile) -> f64 {
        profile.memory_accesses * self.e_mem
    }

    /// Checks that every coefficient is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.e_mul, self.e_add, self.e_mem]
            .iter()
            .all(|c| c.is_finite() && *c >= 0.0)
    }
}

impl Default for EnergyCoefficients {
    fn default() -> Self {
        Self {
            e_mul: 3.1e-3,
            e_add: 0.9e-3,
            e_mem: 0.5e-3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_energy() {
        let p = LayerProfile::new(1.0e6, 2.0e6, 0.0, 100);
        let c = EnergyCoefficients::default();
        // 1e6 * 3.1e-3 + 2e6 * 0.9e-3 = 3100 + 1800
        assert!((c.compute_energy(&p) - 4900.0).abs() < 1e-9);
    }

    #[test]
    fn test_memory_energy() {
        let p = LayerProfile::new(0.0, 0.0, 1.86e3, 100);
        let c = EnergyCoefficients::default();
        assert!((c.memory_energy(&p) - 0.93).abs() < 1e-9);
    }

    #[test]
    fn test_check_rejects_negative() {
        let p = LayerProfile::new(-1.0, 0.0, 0.0, 0);
        assert!(p.check().unwrap().contains("compute_macs"));
    }

    #[test]
    fn test_check_rejects_nan() {
        let p = LayerProfile::new(0.0, 0.0, f64::NAN, 0);
        assert!(p.check().unwrap().contains("memory_accesses"));
    }

    #[test]
    fn test_coefficients_validity() {
        assert!(EnergyCoefficients::default().is_valid());
        let bad = EnergyCoefficients {
            e_mul: f64::INFINITY,
            ..Default::default()
        };
        assert!(!bad.is_valid());
    }
}
