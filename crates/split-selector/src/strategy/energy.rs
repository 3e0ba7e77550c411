// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Energy-minimizing split: the decision engine proper.
//!
//! Walks stage indices `1..=N` once, keeping a running prefix of
//! compute + memory energy, and adds the transfer energy of the boundary
//! tensor at each index:
//!
//! ```text
//! total(i) = Σ_{j ≤ i} (E_c(j) + E_m(j)) + E_tr(output_bytes(i), snr)
//! ```
//!
//! The scan is exhaustive, so it stays correct for transfer curves that
//! are not monotone (boundary sizes can grow again deeper in the network).
//! Ties keep the earliest index.
//!
//! Without a channel sample the scan is skipped and the configured default
//! index is returned.

use crate::selector::{Candidate, SelectionContext};
use crate::strategy::{check_index, SplitStrategy};
use crate::SelectorError;
use channel_estimator::ChannelSample;
use cost_model::{model::Validated, CostModel};

#[derive(Debug, Clone)]
pub struct EnergyMinimizing {
    default_split: u32,
}

impl EnergyMinimizing {
    pub fn new(default_split: u32) -> Self {
        Self { default_split }
    }

    pub fn default_split(&self) -> u32 {
        self.default_split
    }
}

impl SplitStrategy for EnergyMinimizing {
    fn name(&self) -> &str {
        "energy-minimizing"
    }

    fn validate(&self, costs: &CostModel<Validated>) -> Result<(), SelectorError> {
        check_index(self.name(), self.default_split, costs)
    }

    fn choose(&self, ctx: &SelectionContext<'_>, sample: Option<&ChannelSample>) -> Candidate {
        let Some(sample) = sample else {
            tracing::debug!("no channel sample, using default split {}", self.default_split);
            return ctx
                .evaluate(self.default_split, None)
                .expect("default split index validated at construction");
        };

        let mut best: Option<Candidate> = None;
        for candidate in ctx.scan(Some(sample)) {
            tracing::trace!(
                "split {}: total {:.2} µJ",
                candidate.index,
                candidate.energy.total_energy()
            );
            // Strict comparison: on a tie the earlier index stays.
            let better = match &best {
                None => true,
                Some(b) => candidate.energy.total_energy() < b.energy.total_energy(),
            };
            if better {
                best = Some(candidate);
            }
        }

        best.expect("validated cost model has at least one stage")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SplitSelector;
    use channel_estimator::{ChannelEstimator, ChannelParams};
    use cost_model::{EnergyCoefficients, LayerProfile};

    fn mobilenet_selector() -> SplitSelector {
        SplitSelector::new(
            CostModel::mobilenet_v2(),
            EnergyCoefficients::default(),
            ChannelEstimator::default(),
            Box::new(EnergyMinimizing::new(13)),
        )
        .unwrap()
    }

    fn custom_selector(stages: Vec<LayerProfile>, default_split: u32) -> SplitSelector {
        let stages = stages
            .into_iter()
            .enumerate()
            .map(|(i, p)| (i as u32 + 1, p))
            .collect();
        SplitSelector::new(
            CostModel::new("custom".into(), stages).validate().unwrap(),
            EnergyCoefficients::default(),
            ChannelEstimator::default(),
            Box::new(EnergyMinimizing::new(default_split)),
        )
        .unwrap()
    }

    /// Independent brute-force minimum over the raw table, written out
    /// from the formulas rather than through the selector.
    fn brute_force(snr_db: f64) -> u32 {
        let coeffs = EnergyCoefficients::default();
        let params = ChannelParams::default();
        let throughput_bps = params.bandwidth_hz * (1.0 + 10f64.powf(snr_db / 10.0)).log2();
        let p_tx = 10f64.powf((params.tx_power_dbm - 30.0) / 10.0);

        let model = CostModel::mobilenet_v2();
        let totals: Vec<(u32, f64)> = (1..=model.num_layers())
            .map(|i| {
                let prefix: f64 = (1..=i)
                    .map(|j| {
                        let p = model.profile(j).unwrap();
                        p.compute_macs * coeffs.e_mul
                            + p.compute_adds * coeffs.e_add
                            + p.memory_accesses * coeffs.e_mem
                    })
                    .sum();
                let bytes = model.profile(i).unwrap().output_bytes as f64;
                (i, prefix + p_tx * (bytes * 8.0 / throughput_bps) * 1e6)
            })
            .collect();

        let min = totals.iter().map(|(_, t)| *t).fold(f64::INFINITY, f64::min);
        totals.iter().find(|(_, t)| *t == min).unwrap().0
    }

    #[test]
    fn test_no_channel_returns_default() {
        let s = mobilenet_selector();
        assert_eq!(s.select("a".into(), None).layer_index, 13);
    }

    #[test]
    fn test_no_channel_is_stable() {
        let s = mobilenet_selector();
        assert_eq!(s.select("a".into(), None), s.select("a".into(), None));
    }

    #[test]
    fn test_index_always_in_range() {
        let s = mobilenet_selector();
        let mut snr = -40.0;
        while snr <= 60.0 {
            let d = s.select("r".into(), Some(&ChannelSample::new(snr, -70.0)));
            assert!((1..=17).contains(&d.layer_index), "snr {snr} → {}", d.layer_index);
            snr += 2.5;
        }
    }

    #[test]
    fn test_deterministic() {
        let s = mobilenet_selector();
        let sample = ChannelSample::new(12.5, -71.0);
        let a = s.select("x".into(), Some(&sample));
        let b = s.select("x".into(), Some(&sample));
        assert_eq!(a, b);
    }

    #[test]
    fn test_snr_20_matches_brute_force() {
        let s = mobilenet_selector();
        let d = s.select("img".into(), Some(&ChannelSample::new(20.0, -60.0)));
        assert_eq!(d.layer_index, brute_force(20.0));
        assert_eq!(d.layer_index, 1);
    }

    #[test]
    fn test_brute_force_agreement_across_snr() {
        let s = mobilenet_selector();
        for snr in [-30.0, -20.0, -10.0, 0.0, 5.0, 20.0, 40.0] {
            let d = s.select("img".into(), Some(&ChannelSample::new(snr, -60.0)));
            assert_eq!(d.layer_index, brute_force(snr), "snr {snr}");
        }
    }

    #[test]
    fn test_poor_channel_moves_cut_deeper() {
        let s = mobilenet_selector();
        let at = |snr: f64| s.select("p".into(), Some(&ChannelSample::new(snr, -90.0))).layer_index;
        assert_eq!(at(-10.0), 2);
        assert_eq!(at(-20.0), 3);
        assert!(at(-30.0) > at(-20.0));
    }

    #[test]
    fn test_constant_transfer_picks_first() {
        // Same boundary size everywhere: transfer is constant, the prefix
        // only grows, so the earliest cut wins.
        let stages = (0..17)
            .map(|i| LayerProfile::new(1.0e6 * (i + 1) as f64, 1.0e6, 10.0, 50_000))
            .collect();
        let s = custom_selector(stages, 13);
        let d = s.select("c".into(), Some(&ChannelSample::new(10.0, -70.0)));
        assert_eq!(d.layer_index, 1);
    }

    #[test]
    fn test_tie_keeps_earliest_index() {
        let stages = vec![
            LayerProfile::new(0.0, 0.0, 0.0, 1000),
            LayerProfile::new(0.0, 0.0, 0.0, 5000),
            LayerProfile::new(0.0, 0.0, 0.0, 1000),
        ];
        let s = custom_selector(stages, 2);
        let d = s.select("t".into(), Some(&ChannelSample::new(10.0, -70.0)));
        assert_eq!(d.layer_index, 1);
    }

    #[test]
    fn test_non_monotone_transfer_curve() {
        // Cheap compute; the boundary shrinks, grows, then shrinks to its
        // global minimum at stage 4.
        let stages = vec![
            LayerProfile::new(1.0, 1.0, 1.0, 100_000),
            LayerProfile::new(1.0, 1.0, 1.0, 20_000),
            LayerProfile::new(1.0, 1.0, 1.0, 400_000),
            LayerProfile::new(1.0, 1.0, 1.0, 500),
            LayerProfile::new(1.0, 1.0, 1.0, 900_000),
        ];
        let s = custom_selector(stages, 1);
        let d = s.select("n".into(), Some(&ChannelSample::new(0.0, -80.0)));
        assert_eq!(d.layer_index, 4);
    }

    #[test]
    fn test_decision_energy_matches_evaluate() {
        let s = mobilenet_selector();
        let sample = ChannelSample::new(-20.0, -90.0);
        let d = s.select("e".into(), Some(&sample));
        let direct = s.context().evaluate(d.layer_index, Some(&sample)).unwrap();
        assert!((d.energy.total_energy() - direct.energy.total_energy()).abs() < 1e-6);
    }
}
