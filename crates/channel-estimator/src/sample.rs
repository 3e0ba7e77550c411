// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Channel samples and the channel metrics log.
//!
//! The radio simulator appends one line per received frame:
//!
//! ```text
//! 2.0413,RSSI=-48.27,SNR=46.73
//! ```
//!
//! Only the most recent line matters to the selector.

use crate::ChannelError;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// One channel-quality reading.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChannelSample {
    /// Signal-to-noise ratio in dB.
    pub snr_db: f64,
    /// Received signal strength in dBm.
    pub rssi_db: f64,
    /// Timestamp reported by the source (simulation time or time since the
    /// Unix epoch, depending on who produced the sample).
    pub observed_at: Duration,
}

impl ChannelSample {
    /// Creates a sample stamped with the current wall-clock time.
    pub fn new(snr_db: f64, rssi_db: f64) -> Self {
        let observed_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Self::at(snr_db, rssi_db, observed_at)
    }

    /// Creates a sample with an explicit timestamp.
    pub fn at(snr_db: f64, rssi_db: f64, observed_at: Duration) -> Self {
        Self {
            snr_db,
            rssi_db,
            observed_at,
        }
    }

    /// Parses a single `<time>,RSSI=<dBm>,SNR=<dB>` log line.
    pub fn parse_line(line: &str, source: &Path) -> Result<Self, ChannelError> {
        let parse_err = |detail: String| ChannelError::ParseError {
            path: source.display().to_string(),
            detail,
        };

        let mut time = None;
        let mut rssi = None;
        let mut snr = None;

        for (i, field) in line.trim().split(',').enumerate() {
            let field = field.trim();
            if let Some(v) = field.strip_prefix("RSSI=") {
                rssi = Some(parse_finite(v).ok_or_else(|| parse_err(format!("bad RSSI value '{v}'")))?);
            } else if let Some(v) = field.strip_prefix("SNR=") {
                snr = Some(parse_finite(v).ok_or_else(|| parse_err(format!("bad SNR value '{v}'")))?);
            } else if i == 0 {
                let at = parse_finite(field)
                    .and_then(|s| Duration::try_from_secs_f64(s).ok())
                    .ok_or_else(|| parse_err(format!("bad timestamp '{field}'")))?;
                time = Some(at);
            }
        }

        match (rssi, snr) {
            (Some(rssi_db), Some(snr_db)) => Ok(Self::at(snr_db, rssi_db, time.unwrap_or(Duration::ZERO))),
            _ => Err(parse_err(format!("expected RSSI= and SNR= fields in '{}'", line.trim()))),
        }
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reader for the append-only channel metrics log.
#[derive(Debug, Clone)]
pub struct ChannelLog {
    path: PathBuf,
}

impl ChannelLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the most recent sample, or `None` if the source has not
    /// produced a usable one yet.
    ///
    /// A missing or empty log and an unparsable last line all mean "no
    /// sample"; only an I/O failure on an existing file is an error.
    pub fn latest(&self) -> Result<Option<ChannelSample>, ChannelError> {
        if !self.path.exists() {
            tracing::debug!("channel log '{}' not present yet", self.path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| ChannelError::ReadError {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let Some(last) = content.lines().rev().find(|l| !l.trim().is_empty()) else {
            return Ok(None);
        };

        match ChannelSample::parse_line(last, &self.path) {
            Ok(sample) => Ok(Some(sample)),
            Err(e) => {
                tracing::warn!("ignoring last channel sample: {e}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_line() {
        let s = ChannelSample::parse_line("2.5,RSSI=-48.27,SNR=46.73", Path::new("x")).unwrap();
        assert!((s.snr_db - 46.73).abs() < 1e-9);
        assert!((s.rssi_db + 48.27).abs() < 1e-9);
        assert_eq!(s.observed_at, Duration::from_millis(2500));
    }

    #[test]
    fn test_parse_line_negative_snr() {
        let s = ChannelSample::parse_line("1,RSSI=-95,SNR=-3.5\n", Path::new("x")).unwrap();
        assert!((s.snr_db + 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_line_missing_snr() {
        let r = ChannelSample::parse_line("1,RSSI=-95", Path::new("x"));
        assert!(matches!(r, Err(ChannelError::ParseError { .. })));
    }

    #[test]
    fn test_parse_line_garbage_value() {
        let r = ChannelSample::parse_line("1,RSSI=abc,SNR=10", Path::new("x"));
        assert!(matches!(r, Err(ChannelError::ParseError { .. })));
    }

    #[test]
    fn test_parse_line_timestamp_out_of_range() {
        for line in ["1e300,RSSI=-60,SNR=20", "-1,RSSI=-60,SNR=20"] {
            let r = ChannelSample::parse_line(line, Path::new("x"));
            assert!(matches!(r, Err(ChannelError::ParseError { .. })), "{line}");
        }
    }

    #[test]
    fn test_latest_huge_timestamp_is_no_sample() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "1.0,RSSI=-40,SNR=50").unwrap();
        writeln!(f, "1e300,RSSI=-60,SNR=20").unwrap();
        assert!(ChannelLog::new(f.path()).latest().unwrap().is_none());
    }

    #[test]
    fn test_latest_takes_last_line() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "1.0,RSSI=-40,SNR=50").unwrap();
        writeln!(f, "1.1,RSSI=-60,SNR=20").unwrap();
        writeln!(f).unwrap();
        let s = ChannelLog::new(f.path()).latest().unwrap().unwrap();
        assert_eq!(s.snr_db, 20.0);
        assert_eq!(s.rssi_db, -60.0);
    }

    #[test]
    fn test_latest_missing_file() {
        let log = ChannelLog::new("/nonexistent/channel_metrics.log");
        assert!(log.latest().unwrap().is_none());
    }

    #[test]
    fn test_latest_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert!(ChannelLog::new(f.path()).latest().unwrap().is_none());
    }

    #[test]
    fn test_latest_unparsable_last_line() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "1.0,RSSI=-40,SNR=50").unwrap();
        writeln!(f, "truncated,RSS").unwrap();
        assert!(ChannelLog::new(f.path()).latest().unwrap().is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let s = ChannelSample::at(12.0, -70.0, Duration::from_secs(3));
        let json = serde_json::to_string(&s).unwrap();
        let back: ChannelSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
