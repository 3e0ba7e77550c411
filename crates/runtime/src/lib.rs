// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! Glue that turns the split-inference components into a running system.
//!
//! The runtime takes:
//! - A [`RuntimeConfig`] (TOML) naming the cost table, radio parameters,
//!   strategy, store location and telemetry files.
//! - Two [`StageExecutor`]s, one per side of the cut.
//!
//! And runs invocations through the full pipeline:
//!
//! ```text
//! ChannelSample ─► SplitSelector ─► EdgeSite::dispatch ─► [edge_to_cloud]
//!                                                             │
//!                          CloudSite::serve_one ◄─────────────┘
//!                                   │
//!  TelemetryAggregator ◄─ EdgeSite::collect ◄─ [cloud_to_edge]
//! ```
//!
//! # Type-State Pipeline
//! ```text
//! SplitRuntime<Idle> → SplitRuntime<Ready>
//! ```
//! Configuration errors can only surface in the transition; a `Ready`
//! runtime only produces per-invocation errors.
//!
//! The sites are usable on their own: the CLI runs each in a separate
//! process over a filesystem store.

mod config;
mod engine;
mod error;
mod executor;
mod report;
mod request;
mod site;

pub use config::{HandoffSection, RuntimeConfig, SelectionConfig, TelemetryConfig};
pub use engine::{Idle, Ready, RuntimeState, SplitRuntime};
pub use error::{InvocationError, InvocationFailure, RuntimeError, Stage};
pub use executor::{predict, StageExecutor, SyntheticExecutor};
pub use report::InvocationReport;
pub use request::{label_from_name, InvocationRequest};
pub use site::{CloudSite, Collected, Dispatched, EdgeSite, Served};
