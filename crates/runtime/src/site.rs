// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The two execution sites.
//!
//! Sites share nothing but the artifact store. Each can run in its own
//! process (the CLI roles) or both in one process (the engine).
//!
//! ```text
//!  EdgeSite                      store                      CloudSite
//!  dispatch ── Artifact(E→C) ──► [edge_to_cloud] ──► serve_one
//!                                                       │ run_tail
//!  collect  ◄─────────────────── [cloud_to_edge] ◄── Artifact(C→E)
//! ```

use crate::{executor::predict, InvocationError, InvocationFailure, InvocationRequest, Stage, StageExecutor};
use channel_estimator::ChannelSample;
use handoff::{
    Artifact, ArtifactStore, Boundary, Consumer, HandoffConfig, HandoffOutcome, Producer,
};
use split_selector::{CorrelationToken, SplitDecision, SplitSelector};
use std::sync::Arc;
use std::time::{Duration, Instant};
use telemetry::LatencyFiles;

/// Result of the edge's first half.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub decision: SplitDecision,
    pub latency_edge: Duration,
    /// The head produced no data and an empty artifact was published.
    pub empty: bool,
}

/// Result of the edge's second half.
#[derive(Debug, Clone, PartialEq)]
pub struct Collected {
    pub prediction: Option<u32>,
    /// Cloud→edge transfer time, when the result carried a header.
    pub transfer: Option<Duration>,
    pub empty: bool,
}

/// Result of one cloud round.
#[derive(Debug, Clone, PartialEq)]
pub struct Served {
    pub token: Option<CorrelationToken>,
    pub cut: Option<u32>,
    /// `None` when there was nothing to compute.
    pub latency_cloud: Option<Duration>,
    /// Edge→cloud transfer time, when the artifact carried a header.
    pub transfer: Option<Duration>,
    pub empty: bool,
}

/// Selects the cut, runs the head and post-processes the result.
pub struct EdgeSite {
    selector: Arc<SplitSelector>,
    executor: Arc<dyn StageExecutor>,
    store: Arc<dyn ArtifactStore>,
    to_cloud: String,
    from_cloud: String,
    handoff: HandoffConfig,
}

impl EdgeSite {
    pub fn new(
        selector: Arc<SplitSelector>,
        executor: Arc<dyn StageExecutor>,
        store: Arc<dyn ArtifactStore>,
        to_cloud: impl Into<String>,
        from_cloud: impl Into<String>,
        handoff: HandoffConfig,
    ) -> Self {
        Self {
            selector,
            executor,
            store,
            to_cloud: to_cloud.into(),
            from_cloud: from_cloud.into(),
            handoff,
        }
    }

    pub fn selector(&self) -> &SplitSelector {
        &self.selector
    }

    /// Select, then run the head and publish.
    pub fn dispatch(
        &self,
        request: &InvocationRequest,
        channel: Option<&ChannelSample>,
    ) -> Result<Dispatched, InvocationError> {
        let decision = self.selector.select(request.token.clone(), channel);
        self.run_decision(request, decision)
    }

    /// Run the head for an already-made decision and publish its output.
    pub fn run_decision(
        &self,
        request: &InvocationRequest,
        decision: SplitDecision,
    ) -> Result<Dispatched, InvocationError> {
        let token = &request.token;
        let fail = |stage, e: InvocationFailure| InvocationError::new(Some(token.clone()), stage, e);

        // A stale result from an earlier invocation must not be collected.
        Producer::new(self.store.as_ref(), &self.from_cloud)
            .clear()
            .map_err(|e| fail(Stage::EdgeToCloud, e.into()))?;

        let started = Instant::now();
        let output = self
            .executor
            .run_head(&request.input, decision.layer_index)
            .map_err(|e| fail(Stage::EdgeCompute, e))?;
        let latency_edge = started.elapsed();

        let empty = output.is_empty();
        if empty {
            tracing::warn!(token = %token, "Edge output is empty, publishing empty artifact");
        }
        let artifact = Artifact::new(
            Boundary::EdgeToCloud,
            token.clone(),
            Some(decision.layer_index),
            output,
        );
        Producer::new(self.store.as_ref(), &self.to_cloud)
            .publish(&artifact)
            .map_err(|e| fail(Stage::EdgeToCloud, e.into()))?;

        tracing::info!(
            token = %token,
            cut = decision.layer_index,
            bytes = artifact.payload.len(),
            "Edge head complete in {:.3}ms",
            latency_edge.as_secs_f64() * 1000.0
        );
        Ok(Dispatched {
            decision,
            latency_edge,
            empty,
        })
    }

    /// Wait for the cloud's result and take its argmax.
    pub async fn collect(&self, token: &CorrelationToken) -> Result<Collected, InvocationError> {
        let fail =
            |stage, e: InvocationFailure| InvocationError::new(Some(token.clone()), stage, e);

        let mut consumer = Consumer::new(
            self.store.as_ref(),
            &self.from_cloud,
            Boundary::CloudToEdge,
            self.handoff,
        );
        let received = consumer
            .await_artifact()
            .await
            .map_err(|e| fail(Stage::CloudToEdge, e.into()))?;

        if let Some(header) = received.outcome.header() {
            if &header.token != token {
                return Err(fail(
                    Stage::CloudToEdge,
                    InvocationFailure::TokenMismatch {
                        expected: token.clone(),
                        found: header.token.clone(),
                    },
                ));
            }
        }
        let transfer = received.outcome.header().map(|h| h.age());

        match received.outcome {
            HandoffOutcome::Empty { .. } => {
                tracing::warn!(token = %token, "Empty result, skipping post-processing");
                Ok(Collected {
                    prediction: None,
                    transfer,
                    empty: true,
                })
            }
            HandoffOutcome::Ready(artifact) => {
                let prediction =
                    predict(&artifact.payload).map_err(|e| fail(Stage::Postprocess, e))?;
                tracing::info!(token = %token, ?prediction, "Final prediction");
                Ok(Collected {
                    prediction,
                    transfer,
                    empty: false,
                })
            }
        }
    }
}

/// Runs the tail for whatever the edge publishes.
pub struct CloudSite {
    num_layers: u32,
    executor: Arc<dyn StageExecutor>,
    store: Arc<dyn ArtifactStore>,
    from_edge: String,
    to_edge: String,
    handoff: HandoffConfig,
    latency: Option<LatencyFiles>,
}

impl CloudSite {
    pub fn new(
        num_layers: u32,
        executor: Arc<dyn StageExecutor>,
        store: Arc<dyn ArtifactStore>,
        from_edge: impl Into<String>,
        to_edge: impl Into<String>,
        handoff: HandoffConfig,
    ) -> Self {
        Self {
            num_layers,
            executor,
            store,
            from_edge: from_edge.into(),
            to_edge: to_edge.into(),
            handoff,
            latency: None,
        }
    }

    /// Write cloud latency and edge→cloud transfer time to `files` before
    /// each reply is published, so the edge never reads them early.
    pub fn with_latency_files(mut self, files: LatencyFiles) -> Self {
        self.latency = Some(files);
        self
    }

    fn record_latency(
        &self,
        cloud: Option<Duration>,
        transfer: Duration,
    ) -> Result<(), telemetry::TelemetryError> {
        let Some(files) = &self.latency else {
            return Ok(());
        };
        if let Some(cloud) = cloud {
            files.write_cloud(cloud.as_secs_f64())?;
        }
        files.add_transfer(transfer.as_secs_f64())?;
        Ok(())
    }

    /// Handle exactly one edge artifact.
    pub async fn serve_one(&self) -> Result<Served, InvocationError> {
        let mut consumer = Consumer::new(
            self.store.as_ref(),
            &self.from_edge,
            Boundary::EdgeToCloud,
            self.handoff,
        );
        let received = consumer
            .await_artifact()
            .await
            .map_err(|e| InvocationError::new(None, Stage::EdgeToCloud, e))?;
        let producer = Producer::new(self.store.as_ref(), &self.to_edge);

        let artifact = match received.outcome {
            HandoffOutcome::Empty { header: None } => {
                tracing::warn!("Empty marker from edge, propagating");
                producer
                    .publish_empty()
                    .map_err(|e| InvocationError::new(None, Stage::CloudToEdge, e))?;
                return Ok(Served {
                    token: None,
                    cut: None,
                    latency_cloud: None,
                    transfer: None,
                    empty: true,
                });
            }
            HandoffOutcome::Empty {
                header: Some(header),
            } => {
                tracing::warn!(token = %header.token, "Empty artifact from edge, skipping inference");
                self.record_latency(None, header.age()).map_err(|e| {
                    InvocationError::new(Some(header.token.clone()), Stage::Telemetry, e)
                })?;
                let reply = Artifact::new(Boundary::CloudToEdge, header.token.clone(), None, Vec::new());
                producer
                    .publish(&reply)
                    .map_err(|e| InvocationError::new(Some(header.token.clone()), Stage::CloudToEdge, e))?;
                return Ok(Served {
                    transfer: Some(header.age()),
                    token: Some(header.token),
                    cut: header.layer_index,
                    latency_cloud: None,
                    empty: true,
                });
            }
            HandoffOutcome::Ready(artifact) => artifact,
        };

        let transfer = artifact.header.age();
        let token = artifact.header.token.clone();
        let fail =
            |stage, e: InvocationFailure| InvocationError::new(Some(token.clone()), stage, e);

        let cut = artifact
            .header
            .layer_index
            .ok_or_else(|| fail(Stage::CloudCompute, InvocationFailure::MissingCut))?;
        if cut == 0 || cut > self.num_layers {
            return Err(fail(
                Stage::CloudCompute,
                InvocationFailure::InvalidCut {
                    index: cut,
                    num_layers: self.num_layers,
                },
            ));
        }

        let started = Instant::now();
        let logits = self
            .executor
            .run_tail(&artifact.payload, cut)
            .map_err(|e| fail(Stage::CloudCompute, e))?;
        let latency_cloud = started.elapsed();
        self.record_latency(Some(latency_cloud), transfer)
            .map_err(|e| fail(Stage::Telemetry, e.into()))?;

        let reply = Artifact::new(Boundary::CloudToEdge, token.clone(), None, logits);
        producer
            .publish(&reply)
            .map_err(|e| fail(Stage::CloudToEdge, e.into()))?;

        tracing::info!(
            token = %token,
            cut,
            "Cloud tail complete in {:.3}ms",
            latency_cloud.as_secs_f64() * 1000.0
        );
        Ok(Served {
            token: Some(token),
            cut: Some(cut),
            latency_cloud: Some(latency_cloud),
            transfer: Some(transfer),
            empty: false,
        })
    }
}
