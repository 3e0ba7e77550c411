// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # channel-estimator
//!
//! Turns a wireless channel-quality reading into a throughput estimate and
//! a transfer-energy figure for a payload of a given size.
//!
//! # Components
//! - [`ChannelSample`]: one `(snr_db, rssi_db)` reading with its timestamp.
//! - [`ChannelLog`]: reads the most recent sample from a channel metrics
//!   log written by the radio simulator.
//! - [`ChannelEstimator`]: Shannon-capacity throughput and transfer energy.
//!
//! # Graceful Degradation
//! A missing sample never fails an invocation: [`ChannelEstimator::transfer_energy`]
//! falls back to a flat per-byte constant when no reading is available.
//!
//! # Example
//! ```
//! use channel_estimator::{ChannelEstimator, ChannelParams, ChannelSample};
//!
//! let est = ChannelEstimator::new(ChannelParams::default());
//! let sample = ChannelSample::new(20.0, -60.0);
//! assert!(est.estimate_throughput(sample.snr_db) > 100.0);
//! let degraded = est.transfer_energy(1000, None);
//! assert_eq!(degraded, 500.0);
//! ```

mod error;
mod estimator;
mod sample;

pub use error::ChannelError;
pub use estimator::{ChannelEstimator, ChannelParams};
pub use sample::{ChannelLog, ChannelSample};
