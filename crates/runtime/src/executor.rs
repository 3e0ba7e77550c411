// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Stage executors: the compute on either side of the cut.
//!
//! ```text
//!             cut k
//!  1 ─ 2 ─ … ─ k │ k+1 ─ … ─ N ─ classifier
//!  ── edge ────── │ ── cloud ───────────────
//!  run_head(k)    │ run_tail(k)
//! ```
//!
//! The runtime is agnostic to what the stages compute; it only moves the
//! bytes between them. [`SyntheticExecutor`] stands in for a real network
//! with outputs sized by the cost table.

use crate::InvocationFailure;
use cost_model::{model::Validated, CostModel};

/// Runs a contiguous range of stages.
pub trait StageExecutor: Send + Sync {
    /// Returns the executor's name (used in errors and logs).
    fn name(&self) -> &str;

    /// Stages `1..=cut` on the raw request input. An empty output means
    /// there is nothing for the cloud to do.
    fn run_head(&self, input: &[u8], cut: u32) -> Result<Vec<u8>, InvocationFailure>;

    /// Stages `cut+1..=N` plus the classifier on the head's output.
    /// Returns the logits as little-endian `f32`.
    fn run_tail(&self, activation: &[u8], cut: u32) -> Result<Vec<u8>, InvocationFailure>;
}

/// Deterministic stand-in for a real model.
///
/// The head emits exactly `output_bytes` of stage `cut`, filled by cycling
/// the input. The tail emits `num_classes` logits peaking at
/// `activation[0] % num_classes`, so the predicted class is traceable to
/// the input's first byte.
#[derive(Debug, Clone)]
pub struct SyntheticExecutor {
    output_sizes: Vec<u64>,
    num_classes: u32,
}

impl SyntheticExecutor {
    pub fn new(costs: &CostModel<Validated>, num_classes: u32) -> Self {
        Self {
            output_sizes: costs.iter().map(|(_, p)| p.output_bytes).collect(),
            num_classes: num_classes.max(1),
        }
    }

    fn output_size(&self, cut: u32) -> Result<usize, InvocationFailure> {
        let num_layers = self.output_sizes.len() as u32;
        cut.checked_sub(1)
            .and_then(|i| self.output_sizes.get(i as usize))
            .map(|&b| b as usize)
            .ok_or(InvocationFailure::InvalidCut {
                index: cut,
                num_layers,
            })
    }
}

impl StageExecutor for SyntheticExecutor {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn run_head(&self, input: &[u8], cut: u32) -> Result<Vec<u8>, InvocationFailure> {
        let size = self.output_size(cut)?;
        if input.is_empty() {
            return Ok(Vec::new());
        }
        Ok(input.iter().copied().cycle().take(size).collect())
    }

    fn run_tail(&self, activation: &[u8], cut: u32) -> Result<Vec<u8>, InvocationFailure> {
        self.output_size(cut)?;
        let Some(&first) = activation.first() else {
            return Err(InvocationFailure::Execution {
                executor: self.name().to_string(),
                detail: "empty activation".into(),
            });
        };
        let winner = u32::from(first) % self.num_classes;
        Ok((0..self.num_classes)
            .map(|c| if c == winner { 4.0f32 } else { -1.0 - c as f32 * 0.01 })
            .flat_map(f32::to_le_bytes)
            .collect())
    }
}

/// Index of the largest logit; the first one wins ties. `None` for an
/// empty result.
pub fn predict(logits: &[u8]) -> Result<Option<u32>, InvocationFailure> {
    if logits.len() % 4 != 0 {
        return Err(InvocationFailure::MalformedResult { len: logits.len() });
    }
    let mut best: Option<(u32, f32)> = None;
    for (i, chunk) in logits.chunks_exact(4).enumerate() {
        let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if value.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| value > b) {
            best = Some((i as u32, value));
        }
    }
    Ok(best.map(|(i, _)| i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor() -> SyntheticExecutor {
        SyntheticExecutor::new(&CostModel::mobilenet_v2(), 10)
    }

    fn logits(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_head_output_sized_by_table() {
        let costs = CostModel::mobilenet_v2();
        let exec = executor();
        for cut in [1, 5, 17] {
            let out = exec.run_head(&[1, 2, 3], cut).unwrap();
            assert_eq!(out.len() as u64, costs.profile(cut).unwrap().output_bytes);
        }
    }

    #[test]
    fn test_head_rejects_bad_cut() {
        assert!(matches!(
            executor().run_head(&[1], 0),
            Err(InvocationFailure::InvalidCut { index: 0, num_layers: 17 })
        ));
        assert!(executor().run_head(&[1], 18).is_err());
    }

    #[test]
    fn test_empty_input_gives_empty_head() {
        assert!(executor().run_head(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_tail_prediction_follows_first_byte() {
        let exec = executor();
        let head = exec.run_head(&[27, 0, 0], 4).unwrap();
        let out = exec.run_tail(&head, 4).unwrap();
        assert_eq!(out.len(), 40);
        assert_eq!(predict(&out).unwrap(), Some(7));
    }

    #[test]
    fn test_predict_first_max_wins() {
        assert_eq!(predict(&logits(&[0.1, 0.9, 0.9, 0.2])).unwrap(), Some(1));
        assert_eq!(predict(&logits(&[f32::NAN, -3.0])).unwrap(), Some(1));
        assert_eq!(predict(&[]).unwrap(), None);
    }

    #[test]
    fn test_predict_rejects_ragged_payload() {
        assert!(matches!(
            predict(&[0, 0, 0]),
            Err(InvocationFailure::MalformedResult { len: 3 })
        ));
    }
}
