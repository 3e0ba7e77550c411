// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`SplitStrategy`] trait and strategy implementations.

pub mod energy;
pub mod fixed;

use crate::selector::{Candidate, SelectionContext};
use crate::SelectorError;
use channel_estimator::ChannelSample;
use cost_model::{model::Validated, CostModel};

/// Trait for split strategies.
///
/// Strategies are purely algorithmic: no I/O, no shared mutable state,
/// safe to call concurrently for independent invocations.
pub trait SplitStrategy: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this strategy.
    fn name(&self) -> &str;

    /// Checks every configured stage index against the cost model.
    fn validate(&self, costs: &CostModel<Validated>) -> Result<(), SelectorError>;

    /// Picks the cut point. Only called after a successful [`validate`].
    ///
    /// [`validate`]: SplitStrategy::validate
    fn choose(&self, ctx: &SelectionContext<'_>, sample: Option<&ChannelSample>) -> Candidate;
}

/// Shared range check for configured indices.
pub(crate) fn check_index(
    strategy: &str,
    index: u32,
    costs: &CostModel<Validated>,
) -> Result<(), SelectorError> {
    if costs.contains(index) {
        Ok(())
    } else {
        Err(SelectorError::IndexOutOfRange {
            strategy: strategy.to_string(),
            index,
            num_layers: costs.num_layers(),
        })
    }
}
