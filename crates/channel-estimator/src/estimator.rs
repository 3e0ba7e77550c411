// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Throughput and transfer-energy estimation.
//!
//! Throughput follows the Shannon capacity of an AWGN channel:
//!
//! ```text
//! throughput_mbps = W * log2(1 + 10^(snr_db / 10)) / 1e6
//! ```
//!
//! Transfer energy has two paths that are deliberately kept separate:
//!
//! | Channel knowledge | Energy (µJ) |
//! |---|---|
//! | sample available | `P_tx[W] * (bytes * 8 / throughput_bps) * 1e6` |
//! | no sample | `bytes * tx_energy_per_byte` |
//!
//! The two paths use different constants and are not calibrated against
//! each other.

use crate::{ChannelError, ChannelSample};

/// Static radio parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChannelParams {
    /// Channel bandwidth `W` in Hz.
    pub bandwidth_hz: f64,
    /// Transmit power in dBm.
    pub tx_power_dbm: f64,
    /// Flat per-byte transfer energy (µJ/byte) used when no sample exists.
    pub tx_energy_per_byte: f64,
}

impl ChannelParams {
    /// Checks that the parameters describe a usable channel.
    pub fn validate(&self) -> Result<(), ChannelError> {
        if !(self.bandwidth_hz.is_finite() && self.bandwidth_hz > 0.0) {
            return Err(ChannelError::InvalidParams(format!(
                "bandwidth must be positive, got {}",
                self.bandwidth_hz
            )));
        }
        if !self.tx_power_dbm.is_finite() {
            return Err(ChannelError::InvalidParams(format!(
                "transmit power must be finite, got {}",
                self.tx_power_dbm
            )));
        }
        if !(self.tx_energy_per_byte.is_finite() && self.tx_energy_per_byte >= 0.0) {
            return Err(ChannelError::InvalidParams(format!(
                "per-byte fallback energy must be non-negative, got {}",
                self.tx_energy_per_byte
            )));
        }
        Ok(())
    }

    /// Transmit power converted from dBm to watts.
    pub fn tx_power_watts(&self) -> f64 {
        10f64.powf((self.tx_power_dbm - 30.0) / 10.0)
    }
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            bandwidth_hz: 20e6,
            tx_power_dbm: 17.0,
            tx_energy_per_byte: 0.5,
        }
    }
}

/// Pure estimator over a fixed set of [`ChannelParams`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelEstimator {
    params: ChannelParams,
}

impl ChannelEstimator {
    pub fn new(params: ChannelParams) -> Self {
        Self { params }
    }

    /// Returns the radio parameters.
    pub fn params(&self) -> &ChannelParams {
        &self.params
    }

    /// Shannon-capacity throughput estimate in Mbps.
    pub fn estimate_throughput(&self, snr_db: f64) -> f64 {
        let snr_linear = 10f64.powf(snr_db / 10.0);
        self.params.bandwidth_hz * (1.0 + snr_linear).log2() / 1e6
    }

    /// Time in seconds to push `bytes` through the channel at `snr_db`.
    ///
    /// Returns `f64::INFINITY` when the estimated throughput is zero.
    pub fn transfer_time(&self, bytes: u64, snr_db: f64) -> f64 {
        let throughput_bps = self.estimate_throughput(snr_db) * 1e6;
        if throughput_bps > 0.0 {
            (bytes as f64 * 8.0) / throughput_bps
        } else {
            f64::INFINITY
        }
    }

    /// Energy in µJ to transfer `bytes`, given an optional channel sample.
    pub fn transfer_energy(&self, bytes: u64, sample: Option<&ChannelSample>) -> f64 {
        match sample {
            Some(s) => self.params.tx_power_watts() * self.transfer_time(bytes, s.snr_db) * 1e6,
            None => bytes as f64 * self.params.tx_energy_per_byte,
        }
    }
}

impl Default for ChannelEstimator {
    fn default() -> Self {
        Self::new(ChannelParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_zero_db() {
        // log2(1 + 1) = 1 → exactly the bandwidth in Mbps.
        let est = ChannelEstimator::default();
        assert!((est.estimate_throughput(0.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_twenty_db() {
        let est = ChannelEstimator::default();
        let expected = 20e6 * 101f64.log2() / 1e6;
        assert!((est.estimate_throughput(20.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_increases_with_snr() {
        let est = ChannelEstimator::default();
        assert!(est.estimate_throughput(30.0) > est.estimate_throughput(10.0));
    }

    #[test]
    fn test_tx_power_watts() {
        let p = ChannelParams::default();
        // 17 dBm ≈ 50.1 mW.
        assert!((p.tx_power_watts() - 0.050_118_7).abs() < 1e-6);
    }

    #[test]
    fn test_transfer_energy_with_sample() {
        let est = ChannelEstimator::default();
        let sample = ChannelSample::new(0.0, -80.0);
        // 20 Mbps, 2_500_000 bytes → 1 s → P_tx * 1e6 µJ.
        let e = est.transfer_energy(2_500_000, Some(&sample));
        let expected = ChannelParams::default().tx_power_watts() * 1e6;
        assert!((e - expected).abs() < 1e-6);
    }

    #[test]
    fn test_transfer_energy_fallback() {
        let est = ChannelEstimator::default();
        assert_eq!(est.transfer_energy(1000, None), 500.0);
        assert_eq!(est.transfer_energy(0, None), 0.0);
    }

    #[test]
    fn test_transfer_time_degenerate_channel() {
        let est = ChannelEstimator::default();
        assert!(est.transfer_time(10, -1000.0).is_infinite());
    }

    #[test]
    fn test_validate_params() {
        assert!(ChannelParams::default().validate().is_ok());
        let bad = ChannelParams {
            bandwidth_hz: 0.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ChannelError::InvalidParams(_))));
        let bad = ChannelParams {
            tx_energy_per_byte: -1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
