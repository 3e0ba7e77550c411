// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The selector: cost model + estimator + strategy.

use crate::{CorrelationToken, EnergyBreakdown, SelectorError, SplitDecision, SplitStrategy};
use channel_estimator::{ChannelEstimator, ChannelSample};
use cost_model::{model::Validated, CostModel, EnergyCoefficients};

/// A candidate cut point with its predicted energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: u32,
    pub energy: EnergyBreakdown,
}

/// Read-only view handed to strategies.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub costs: &'a CostModel<Validated>,
    pub coeffs: &'a EnergyCoefficients,
    pub estimator: &'a ChannelEstimator,
}

impl<'a> SelectionContext<'a> {
    /// Evaluates every cut point `1..=N` in order, carrying a running
    /// prefix sum of compute and memory energy.
    pub fn scan(
        &self,
        sample: Option<&'a ChannelSample>,
    ) -> impl Iterator<Item = Candidate> + 'a {
        let costs = self.costs;
        let coeffs = self.coeffs;
        let estimator = self.estimator;
        costs
            .iter()
            .scan((0.0_f64, 0.0_f64), move |(compute, memory), (index, profile)| {
                *compute += coeffs.compute_energy(profile);
                *memory += coeffs.memory_energy(profile);
                let transfer = estimator.transfer_energy(profile.output_bytes, sample);
                Some(Candidate {
                    index,
                    energy: EnergyBreakdown::new(*compute, *memory, transfer),
                })
            })
    }

    /// Evaluates a single cut point.
    pub fn evaluate(
        &self,
        index: u32,
        sample: Option<&ChannelSample>,
    ) -> Result<Candidate, SelectorError> {
        let (compute, memory) = self.costs.prefix_energy(index, self.coeffs)?;
        let bytes = self.costs.profile(index)?.output_bytes;
        let transfer = self.estimator.transfer_energy(bytes, sample);
        Ok(Candidate {
            index,
            energy: EnergyBreakdown::new(compute, memory, transfer),
        })
    }
}

/// Validated, immutable split selector.
///
/// Building a selector checks the energy coefficients and the strategy's
/// configured indices against the cost model; afterwards [`select`]
/// cannot fail.
///
/// [`select`]: SplitSelector::select
#[derive(Debug)]
pub struct SplitSelector {
    costs: CostModel<Validated>,
    coeffs: EnergyCoefficients,
    estimator: ChannelEstimator,
    strategy: Box<dyn SplitStrategy>,
}

impl SplitSelector {
    pub fn new(
        costs: CostModel<Validated>,
        coeffs: EnergyCoefficients,
        estimator: ChannelEstimator,
        strategy: Box<dyn SplitStrategy>,
    ) -> Result<Self, SelectorError> {
        if !coeffs.is_valid() {
            return Err(SelectorError::InvalidCoefficients(format!("{coeffs:?}")));
        }
        strategy.validate(&costs)?;
        tracing::info!(
            "split selector ready: strategy '{}', {}",
            strategy.name(),
            costs.summary()
        );
        Ok(Self {
            costs,
            coeffs,
            estimator,
            strategy,
        })
    }

    pub fn costs(&self) -> &CostModel<Validated> {
        &self.costs
    }

    pub fn coefficients(&self) -> &EnergyCoefficients {
        &self.coeffs
    }

    pub fn estimator(&self) -> &ChannelEstimator {
        &self.estimator
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn context(&self) -> SelectionContext<'_> {
        SelectionContext {
            costs: &self.costs,
            coeffs: &self.coeffs,
            estimator: &self.estimator,
        }
    }

    /// Produces the split decision for one invocation.
    pub fn select(&self, token: CorrelationToken, sample: Option<&ChannelSample>) -> SplitDecision {
        let chosen = self.strategy.choose(&self.context(), sample);
        let estimated_throughput_mbps = sample
            .map(|s| self.estimator.estimate_throughput(s.snr_db))
            .unwrap_or(0.0);

        let decision = SplitDecision {
            token,
            layer_index: chosen.index,
            channel: sample.copied(),
            energy: chosen.energy,
            estimated_throughput_mbps,
            strategy: self.strategy.name().to_string(),
        };
        tracing::info!("{}", decision.summary());
        decision
    }
}
