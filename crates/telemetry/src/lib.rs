// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # telemetry
//!
//! Side-effect consumer of split decisions and measured timings.
//!
//! Two independent append-only logs are maintained:
//!
//! | Log | Row | Written when |
//! |---|---|---|
//! | energy | `layer,snr,throughput,E_c,E_m,E_tr,total` | every decision |
//! | invocation | [`InvocationRecord`] fields, fixed order | all three latencies known |
//!
//! Energy is analytic and always recorded. Latency is measured; when any
//! of the three figures is missing the invocation row is withheld and
//! [`TelemetryError::MissingTelemetry`] is returned instead of a row with
//! fabricated zeros.

mod aggregator;
mod error;
mod latency;
mod record;
mod sink;

pub use aggregator::TelemetryAggregator;
pub use error::TelemetryError;
pub use latency::{LatencyFiles, PartialLatency};
pub use record::{EnergyRecord, InvocationRecord, LatencySample, Prediction};
pub use sink::{CsvTelemetrySink, MemoryTelemetrySink, TelemetrySink};
