// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # split-selector
//!
//! Chooses the stage index at which an `N`-stage pipeline is cut between
//! the edge device and the cloud, given the static [`cost_model::CostModel`]
//! and an optional [`channel_estimator::ChannelSample`].
//!
//! # Strategies
//!
//! | Strategy | Cut point | Needs channel |
//! |---|---|---|
//! | [`EnergyMinimizing`] | argmin of prefix(E_c + E_m) + E_tr | yes, else configured default |
//! | [`FixedSplit`] | configured index | no |
//!
//! Strategies are validated against the cost model once, when the
//! [`SplitSelector`] is built. After that, selection is a pure,
//! infallible function of the channel sample.
//!
//! # Example
//! ```
//! use split_selector::{CorrelationToken, EnergyMinimizing, SplitSelector};
//! use cost_model::{CostModel, EnergyCoefficients};
//! use channel_estimator::ChannelEstimator;
//!
//! let selector = SplitSelector::new(
//!     CostModel::mobilenet_v2(),
//!     EnergyCoefficients::default(),
//!     ChannelEstimator::default(),
//!     Box::new(EnergyMinimizing::new(13)),
//! ).unwrap();
//!
//! let decision = selector.select(CorrelationToken::new("img-0"), None);
//! assert_eq!(decision.layer_index, 13);
//! ```

mod decision;
mod error;
mod selector;
pub mod strategy;

pub use decision::{CorrelationToken, EnergyBreakdown, SplitDecision};
pub use error::SelectorError;
pub use selector::{Candidate, SelectionContext, SplitSelector};
pub use strategy::energy::EnergyMinimizing;
pub use strategy::fixed::FixedSplit;
pub use strategy::SplitStrategy;

/// Builds a strategy from its configured name.
///
/// Accepted names: `"energy-minimizing"` (alias `"energy"`) and `"fixed"`.
pub fn strategy_by_name(
    name: &str,
    default_split: u32,
    fixed_split: Option<u32>,
) -> Result<Box<dyn SplitStrategy>, SelectorError> {
    match name.to_lowercase().as_str() {
        "energy-minimizing" | "energy" => Ok(Box::new(EnergyMinimizing::new(default_split))),
        "fixed" => Ok(Box::new(FixedSplit::new(fixed_split.unwrap_or(default_split)))),
        other => Err(SelectorError::UnknownStrategy(other.to_string())),
    }
}
