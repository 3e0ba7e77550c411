// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The split runtime with a type-state–enforced lifecycle.
//!
//! ```text
//! SplitRuntime<Idle>
//!     │  .with_store() / .with_sink() / .with_executors()   (optional)
//!     │  .load()
//!     ▼
//! SplitRuntime<Ready>
//!     │  .invoke(request, channel)
//!     ▼
//!   InvocationReport | InvocationError
//! ```
//!
//! `load` is the only place configuration errors can surface. Once a
//! runtime is `Ready`, every failure is scoped to one invocation.

use crate::{
    CloudSite, EdgeSite, InvocationError, InvocationReport, InvocationRequest, RuntimeConfig,
    RuntimeError, Stage, StageExecutor, SyntheticExecutor,
};
use channel_estimator::{ChannelLog, ChannelSample};
use handoff::ArtifactStore;
use split_selector::SplitSelector;
use std::sync::Arc;
use std::time::Instant;
use telemetry::{PartialLatency, Prediction, TelemetryAggregator, TelemetryError, TelemetrySink};

// ── Type-state markers ─────────────────────────────────────────

/// Runtime is configured but nothing is built.
#[derive(Debug)]
pub struct Idle;

/// Selector, sites, store and telemetry are built.
#[derive(Debug)]
pub struct Ready;

/// Sealed trait for runtime states.
pub trait RuntimeState: std::fmt::Debug {}
impl RuntimeState for Idle {}
impl RuntimeState for Ready {}

/// Number of classes the synthetic executor emits.
const SYNTHETIC_CLASSES: u32 = 10;

// ── Runtime ────────────────────────────────────────────────────

/// Runs both sites in one process over a shared artifact store.
///
/// # Example
/// ```no_run
/// use runtime::{InvocationRequest, RuntimeConfig, SplitRuntime};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let runtime = SplitRuntime::new(RuntimeConfig::default()).load()?;
/// let sample = runtime.sample_channel();
/// let report = runtime
///     .invoke(InvocationRequest::new("7_img.bin", vec![7; 64]), sample.as_ref())
///     .await?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct SplitRuntime<S: RuntimeState = Idle> {
    config: RuntimeConfig,
    _state: std::marker::PhantomData<S>,
    store: Option<Arc<dyn ArtifactStore>>,
    sink: Option<Arc<dyn TelemetrySink>>,
    executors: Option<(Arc<dyn StageExecutor>, Arc<dyn StageExecutor>)>,
    // Populated by `load`:
    edge: Option<EdgeSite>,
    cloud: Option<CloudSite>,
    telemetry: Option<TelemetryAggregator>,
    channel_log: Option<ChannelLog>,
    // One slot per direction: invocations must not interleave.
    in_flight: tokio::sync::Mutex<()>,
}

// ── Idle → Ready ───────────────────────────────────────────────

impl SplitRuntime<Idle> {
    /// Creates a new runtime from the given configuration.
    pub fn new(config: RuntimeConfig) -> Self {
        tracing::info!("runtime created with strategy '{}'", config.selection.strategy);
        Self {
            config,
            _state: std::marker::PhantomData,
            store: None,
            sink: None,
            executors: None,
            edge: None,
            cloud: None,
            telemetry: None,
            channel_log: None,
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Uses `store` instead of the configured directory.
    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses `sink` instead of the configured CSV logs.
    pub fn with_sink(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Uses the given executors instead of the synthetic one.
    pub fn with_executors(
        mut self,
        edge: Arc<dyn StageExecutor>,
        cloud: Arc<dyn StageExecutor>,
    ) -> Self {
        self.executors = Some((edge, cloud));
        self
    }

    /// Validates the configuration and builds every component.
    ///
    /// Steps:
    /// 1. Validate the configuration.
    /// 2. Load the cost table and build the selector.
    /// 3. Open the artifact store and telemetry sink.
    /// 4. Wire the edge and cloud sites.
    pub fn load(self) -> Result<SplitRuntime<Ready>, RuntimeError> {
        self.config.validate()?;

        let selector = Arc::new(self.config.build_selector()?);
        let num_layers = selector.costs().num_layers();

        let store: Arc<dyn ArtifactStore> = match self.store {
            Some(store) => store,
            None => Arc::new(self.config.open_store()?),
        };
        let sink: Arc<dyn TelemetrySink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(self.config.csv_sink()),
        };
        let (edge_exec, cloud_exec) = match self.executors {
            Some(pair) => pair,
            None => {
                let synthetic: Arc<dyn StageExecutor> =
                    Arc::new(SyntheticExecutor::new(selector.costs(), SYNTHETIC_CLASSES));
                (Arc::clone(&synthetic), synthetic)
            }
        };

        let handoff = self.config.handoff_config();
        let slots = &self.config.handoff;
        let edge = EdgeSite::new(
            Arc::clone(&selector),
            edge_exec,
            Arc::clone(&store),
            &slots.edge_to_cloud_slot,
            &slots.cloud_to_edge_slot,
            handoff,
        );
        let cloud = CloudSite::new(
            num_layers,
            cloud_exec,
            store,
            &slots.edge_to_cloud_slot,
            &slots.cloud_to_edge_slot,
            handoff,
        );
        tracing::info!(
            "sites wired: {} stages, poll {:?}, timeout {:?}",
            num_layers,
            handoff.poll_interval,
            handoff.timeout
        );

        let channel_log = self.config.channel_log();
        Ok(SplitRuntime {
            config: self.config,
            _state: std::marker::PhantomData,
            store: None,
            sink: None,
            executors: None,
            edge: Some(edge),
            cloud: Some(cloud),
            telemetry: Some(TelemetryAggregator::new(sink)),
            channel_log,
            in_flight: self.in_flight,
        })
    }
}

// ── Ready: invoke ──────────────────────────────────────────────

impl SplitRuntime<Ready> {
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn selector(&self) -> &SplitSelector {
        self.edge().selector()
    }

    /// Latest sample from the configured channel log. Read failures are
    /// logged and degrade to `None`.
    pub fn sample_channel(&self) -> Option<ChannelSample> {
        let log = self.channel_log.as_ref()?;
        match log.latest() {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(error = %e, "Channel sample unavailable");
                None
            }
        }
    }

    /// Runs one complete round trip.
    ///
    /// 1. Select the cut and run the head (edge).
    /// 2. Record the energy row.
    /// 3. Serve the artifact (cloud) while waiting for the result (edge).
    /// 4. Record the invocation row if all latencies are known.
    pub async fn invoke(
        &self,
        request: InvocationRequest,
        channel: Option<&ChannelSample>,
    ) -> Result<InvocationReport, InvocationError> {
        let _guard = self.in_flight.lock().await;
        let started = Instant::now();
        let token = request.token.clone();
        let telemetry = self.telemetry();

        let dispatched = self.edge().dispatch(&request, channel)?;
        let energy = telemetry
            .record_decision(&dispatched.decision)
            .map_err(|e| InvocationError::new(Some(token.clone()), Stage::Telemetry, e))?;

        let (served, collected) = tokio::try_join!(
            async {
                self.cloud().serve_one().await.map_err(|mut e| {
                    e.token.get_or_insert_with(|| token.clone());
                    e
                })
            },
            self.edge().collect(&token),
        )?;

        let transfer = match (served.transfer, collected.transfer) {
            (Some(up), Some(down)) => Some((up + down).as_secs_f64()),
            _ => None,
        };
        let latency = PartialLatency {
            edge: Some(dispatched.latency_edge.as_secs_f64()),
            transfer,
            cloud: served.latency_cloud.map(|d| d.as_secs_f64()),
        };
        let prediction = Prediction {
            predicted_label: collected.prediction,
            true_label: request.true_label,
        };

        let (record, missing_latency) =
            match telemetry.complete_invocation(&token, &energy, latency.complete(), prediction) {
                Ok(record) => (Some(record), Vec::new()),
                Err(TelemetryError::MissingTelemetry { missing, .. }) => (None, missing),
                Err(e) => return Err(InvocationError::new(Some(token), Stage::Telemetry, e)),
            };

        Ok(InvocationReport {
            decision: dispatched.decision,
            prediction,
            latency,
            record,
            missing_latency,
            empty: dispatched.empty || collected.empty,
            wall_time: started.elapsed(),
        })
    }

    // ── Private helpers ────────────────────────────────────────

    fn edge(&self) -> &EdgeSite {
        self.edge.as_ref().expect("edge site exists in Ready state")
    }

    fn cloud(&self) -> &CloudSite {
        self.cloud.as_ref().expect("cloud site exists in Ready state")
    }

    fn telemetry(&self) -> &TelemetryAggregator {
        self.telemetry
            .as_ref()
            .expect("telemetry exists in Ready state")
    }
}

impl<S: RuntimeState> std::fmt::Debug for SplitRuntime<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitRuntime")
            .field("state", &std::any::type_name::<S>())
            .field("strategy", &self.config.selection.strategy)
            .field("has_sites", &self.edge.is_some())
            .field("has_channel_log", &self.channel_log.is_some())
            .finish()
    }
}
