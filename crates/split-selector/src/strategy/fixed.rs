// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed split: always cut at the same stage.
//!
//! The baseline the energy-minimizing scan is compared against, and the
//! way to pin a deployment to a known cut while debugging executors.

use crate::selector::{Candidate, SelectionContext};
use crate::strategy::{check_index, SplitStrategy};
use crate::SelectorError;
use channel_estimator::ChannelSample;
use cost_model::{model::Validated, CostModel};

#[derive(Debug, Clone)]
pub struct FixedSplit {
    index: u32,
}

impl FixedSplit {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

impl SplitStrategy for FixedSplit {
    fn name(&self) -> &str {
        "fixed"
    }

    fn validate(&self, costs: &CostModel<Validated>) -> Result<(), SelectorError> {
        check_index(self.name(), self.index, costs)
    }

    fn choose(&self, ctx: &SelectionContext<'_>, sample: Option<&ChannelSample>) -> Candidate {
        ctx.evaluate(self.index, sample)
            .expect("fixed split index validated at construction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SplitSelector;
    use channel_estimator::ChannelEstimator;
    use cost_model::EnergyCoefficients;

    fn selector(index: u32) -> Result<SplitSelector, SelectorError> {
        SplitSelector::new(
            CostModel::mobilenet_v2(),
            EnergyCoefficients::default(),
            ChannelEstimator::default(),
            Box::new(FixedSplit::new(index)),
        )
    }

    #[test]
    fn test_fixed_ignores_channel() {
        let s = selector(7).unwrap();
        let good = ChannelSample::new(40.0, -40.0);
        let bad = ChannelSample::new(-5.0, -95.0);
        assert_eq!(s.select("a".into(), Some(&good)).layer_index, 7);
        assert_eq!(s.select("b".into(), Some(&bad)).layer_index, 7);
        assert_eq!(s.select("c".into(), None).layer_index, 7);
    }

    #[test]
    fn test_fixed_energy_depends_on_channel() {
        let s = selector(7).unwrap();
        let good = s.select("a".into(), Some(&ChannelSample::new(40.0, -40.0)));
        let bad = s.select("b".into(), Some(&ChannelSample::new(-5.0, -95.0)));
        assert!(bad.energy.transfer_energy() > good.energy.transfer_energy());
        assert_eq!(good.energy.compute_energy(), bad.energy.compute_energy());
    }

    #[test]
    fn test_fixed_out_of_range() {
        assert!(selector(18).is_err());
        assert!(selector(17).is_ok());
        assert!(selector(1).is_ok());
    }
}
