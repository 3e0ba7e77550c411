// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the split selector.
//!
//! Every variant is a configuration error: it can only occur while a
//! [`crate::SplitSelector`] is being built, never during selection.

/// Errors that can occur while configuring split selection.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// A configured stage index lies outside `[1, N]`.
    #[error("strategy '{strategy}': stage index {index} outside 1..={num_layers}")]
    IndexOutOfRange {
        strategy: String,
        index: u32,
        num_layers: u32,
    },

    /// The strategy name is not recognised.
    #[error("unknown split strategy '{0}'; expected 'energy-minimizing' or 'fixed'")]
    UnknownStrategy(String),

    /// Energy coefficients are negative or non-finite.
    #[error("invalid energy coefficients: {0}")]
    InvalidCoefficients(String),

    /// An energy breakdown whose total does not match its parts.
    #[error("inconsistent energy breakdown: {compute} + {memory} + {transfer} != {total}")]
    InconsistentEnergy {
        compute: f64,
        memory: f64,
        transfer: f64,
        total: f64,
    },

    /// The cost model could not be queried.
    #[error("cost model error: {0}")]
    CostModel(#[from] cost_model::CostModelError),
}
