// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the split runtime.
//!
//! [`RuntimeError`] is raised while building a runtime and is fatal: a
//! process that hits one must not start serving. [`InvocationError`] is
//! scoped to a single invocation and never affects the next one.

use handoff::HandoffError;
use split_selector::CorrelationToken;
use std::fmt;

/// Startup-time failures.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The configuration is inconsistent or unreadable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The cost model failed to load or validate.
    #[error("cost model error: {0}")]
    CostModel(#[from] cost_model::CostModelError),

    /// The split selector rejected its configuration.
    #[error("selector error: {0}")]
    Selector(#[from] split_selector::SelectorError),

    /// Radio parameters are invalid.
    #[error("channel error: {0}")]
    Channel(#[from] channel_estimator::ChannelError),

    /// The artifact store could not be opened.
    #[error("artifact store error: {0}")]
    Store(#[from] handoff::StoreError),
}

/// Step of an invocation at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    EdgeCompute,
    EdgeToCloud,
    CloudCompute,
    CloudToEdge,
    Postprocess,
    Telemetry,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EdgeCompute => "edge-compute",
            Self::EdgeToCloud => "edge-to-cloud handoff",
            Self::CloudCompute => "cloud-compute",
            Self::CloudToEdge => "cloud-to-edge handoff",
            Self::Postprocess => "postprocess",
            Self::Telemetry => "telemetry",
        };
        f.write_str(name)
    }
}

/// What went wrong inside a stage.
#[derive(Debug, thiserror::Error)]
pub enum InvocationFailure {
    #[error(transparent)]
    Handoff(#[from] HandoffError),

    #[error("executor '{executor}' failed: {detail}")]
    Execution { executor: String, detail: String },

    #[error("cut {index} outside 1..={num_layers}")]
    InvalidCut { index: u32, num_layers: u32 },

    #[error("artifact carries no cut index")]
    MissingCut,

    #[error("artifact belongs to {found}, expected {expected}")]
    TokenMismatch {
        expected: CorrelationToken,
        found: CorrelationToken,
    },

    #[error("result payload of {len} bytes is not a whole number of f32 logits")]
    MalformedResult { len: usize },

    #[error(transparent)]
    Telemetry(#[from] telemetry::TelemetryError),
}

/// A failed invocation, naming its correlation token and failing stage.
#[derive(Debug, thiserror::Error)]
#[error("invocation {} failed at {stage}: {source}", token_label(.token))]
pub struct InvocationError {
    /// `None` only when the token was never learned (a cloud site timing
    /// out before any artifact arrived).
    pub token: Option<CorrelationToken>,
    pub stage: Stage,
    #[source]
    pub source: InvocationFailure,
}

fn token_label(token: &Option<CorrelationToken>) -> String {
    token
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}

impl InvocationError {
    pub fn new(
        token: Option<CorrelationToken>,
        stage: Stage,
        source: impl Into<InvocationFailure>,
    ) -> Self {
        Self {
            token,
            stage,
            source: source.into(),
        }
    }

    /// True for a handoff that gave up waiting. The caller may retry the
    /// whole invocation.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.source,
            InvocationFailure::Handoff(HandoffError::Timeout { .. })
        )
    }

    /// True for an undecodable artifact. Never worth retrying.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self.source,
            InvocationFailure::Handoff(
                HandoffError::Corrupt { .. } | HandoffError::WrongBoundary { .. }
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_display_names_token_and_stage() {
        let err = InvocationError::new(
            Some(CorrelationToken::new("4_img.png")),
            Stage::CloudToEdge,
            HandoffError::Timeout {
                location: "/tmp/x".into(),
                waited: Duration::from_secs(30),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("4_img.png"));
        assert!(msg.contains("cloud-to-edge"));
        assert!(err.is_timeout());
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_stage_names() {
        let names: Vec<String> = [
            Stage::EdgeCompute,
            Stage::EdgeToCloud,
            Stage::CloudCompute,
            Stage::CloudToEdge,
            Stage::Postprocess,
            Stage::Telemetry,
        ]
        .iter()
        .map(Stage::to_string)
        .collect();
        assert_eq!(
            names,
            [
                "edge-compute",
                "edge-to-cloud handoff",
                "cloud-compute",
                "cloud-to-edge handoff",
                "postprocess",
                "telemetry"
            ]
        );
    }

    #[test]
    fn test_unknown_token_label() {
        let err = InvocationError::new(None, Stage::EdgeToCloud, InvocationFailure::MissingCut);
        assert!(err.to_string().contains("<unknown>"));
    }
}
