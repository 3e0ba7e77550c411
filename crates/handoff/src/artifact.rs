// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact model and its on-store byte layout.
//!
//! ```text
//! offset  size  field
//! ──────  ────  ───────────────────────────────────────────
//!      0     4  magic  b"SPLT"
//!      4     1  format version
//!      5     4  header length H (u32, little endian)
//!      9     H  header (JSON, see ArtifactHeader)
//!    9+H     P  payload, P == header.payload_len
//! ```
//!
//! A zero-length blob is the "nothing to transfer" marker and is never
//! passed to [`Artifact::decode`].

use serde::{Deserialize, Serialize};
use split_selector::CorrelationToken;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Leading bytes of every encoded artifact.
pub const MAGIC: [u8; 4] = *b"SPLT";

/// Current layout version.
pub const FORMAT_VERSION: u8 = 1;

const PREAMBLE_LEN: usize = MAGIC.len() + 1 + 4;

/// Direction an artifact travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Head-segment output, consumed by the cloud.
    EdgeToCloud,
    /// Tail-segment output, consumed by the edge for post-processing.
    CloudToEdge,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EdgeToCloud => write!(f, "edge_to_cloud"),
            Self::CloudToEdge => write!(f, "cloud_to_edge"),
        }
    }
}

/// Metadata carried in front of every payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub boundary: Boundary,
    pub token: CorrelationToken,
    /// Split index the producer ran with. Absent on the cloud→edge result.
    pub layer_index: Option<u32>,
    /// Producer wall clock at publish time, in ms since the Unix epoch.
    pub produced_at_ms: u64,
    pub payload_len: u64,
}

impl ArtifactHeader {
    /// Time elapsed since the producer stamped this header, measured on the
    /// local wall clock. Clock skew between sites clamps to zero.
    pub fn age(&self) -> Duration {
        Duration::from_millis(now_ms().saturating_sub(self.produced_at_ms))
    }
}

/// Intermediate tensor (or final result) plus its header.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub header: ArtifactHeader,
    pub payload: Vec<u8>,
}

/// Why a blob could not be decoded into an [`Artifact`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("bad magic {0:02x?}")]
    BadMagic([u8; 4]),

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),

    #[error("truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("payload length mismatch: header says {declared}, found {actual}")]
    LengthMismatch { declared: u64, actual: u64 },

    #[error("malformed header: {0}")]
    Header(#[from] serde_json::Error),
}

impl Artifact {
    /// Build an artifact stamped with the current wall clock.
    pub fn new(
        boundary: Boundary,
        token: CorrelationToken,
        layer_index: Option<u32>,
        payload: Vec<u8>,
    ) -> Self {
        let header = ArtifactHeader {
            boundary,
            token,
            layer_index,
            produced_at_ms: now_ms(),
            payload_len: payload.len() as u64,
        };
        Self { header, payload }
    }

    /// True when the payload carries nothing to process.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Serialize to the on-store layout.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        let header = serde_json::to_vec(&self.header)?;
        let mut out = Vec::with_capacity(PREAMBLE_LEN + header.len() + self.payload.len());
        out.extend_from_slice(&MAGIC);
        out.push(FORMAT_VERSION);
        out.extend_from_slice(&(header.len() as u32).to_le_bytes());
        out.extend_from_slice(&header);
        out.extend_from_slice(&self.payload);
        Ok(out)
    }

    /// Parse the on-store layout. Any deviation is a [`DecodeError`].
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < PREAMBLE_LEN {
            return Err(DecodeError::Truncated {
                needed: PREAMBLE_LEN,
                available: bytes.len(),
            });
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        if magic != MAGIC {
            return Err(DecodeError::BadMagic(magic));
        }
        if bytes[4] != FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion(bytes[4]));
        }

        let mut len = [0u8; 4];
        len.copy_from_slice(&bytes[5..PREAMBLE_LEN]);
        let header_len = u32::from_le_bytes(len) as usize;
        let header_end = PREAMBLE_LEN.saturating_add(header_len);
        if bytes.len() < header_end {
            return Err(DecodeError::Truncated {
                needed: header_end,
                available: bytes.len(),
            });
        }

        let header: ArtifactHeader = serde_json::from_slice(&bytes[PREAMBLE_LEN..header_end])?;
        let payload = &bytes[header_end..];
        if payload.len() as u64 != header.payload_len {
            return Err(DecodeError::LengthMismatch {
                declared: header.payload_len,
                actual: payload.len() as u64,
            });
        }

        Ok(Self {
            header,
            payload: payload.to_vec(),
        })
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Artifact {
        Artifact::new(
            Boundary::EdgeToCloud,
            CorrelationToken::new("cat_0001.jpg"),
            Some(5),
            vec![0xde, 0xad, 0xbe, 0xef],
        )
    }

    #[test]
    fn test_encode_decode_identity() {
        let artifact = sample();
        let bytes = artifact.encode().unwrap();
        assert_eq!(&bytes[..4], b"SPLT");
        assert_eq!(Artifact::decode(&bytes).unwrap(), artifact);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = sample().encode().unwrap();
        bytes[0] = b'X';
        assert!(matches!(Artifact::decode(&bytes), Err(DecodeError::BadMagic(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = sample().encode().unwrap();
        bytes[4] = 9;
        assert!(matches!(
            Artifact::decode(&bytes),
            Err(DecodeError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_truncated_payload_is_length_mismatch() {
        let bytes = sample().encode().unwrap();
        let cut = &bytes[..bytes.len() - 2];
        assert!(matches!(
            Artifact::decode(cut),
            Err(DecodeError::LengthMismatch { declared: 4, actual: 2 })
        ));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = sample().encode().unwrap();
        assert!(matches!(
            Artifact::decode(&bytes[..12]),
            Err(DecodeError::Truncated { .. })
        ));
        assert!(matches!(
            Artifact::decode(&bytes[..3]),
            Err(DecodeError::Truncated { needed: 9, available: 3 })
        ));
    }

    #[test]
    fn test_garbage_header() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(b"{{{");
        assert!(matches!(Artifact::decode(&bytes), Err(DecodeError::Header(_))));
    }

    #[test]
    fn test_empty_payload_round_trips() {
        let artifact = Artifact::new(Boundary::CloudToEdge, "t".into(), None, Vec::new());
        assert!(artifact.is_empty());
        let back = Artifact::decode(&artifact.encode().unwrap()).unwrap();
        assert!(back.is_empty());
        assert_eq!(back.header.layer_index, None);
    }

    #[test]
    fn test_age_clamps_future_timestamps() {
        let mut artifact = sample();
        artifact.header.produced_at_ms = u64::MAX;
        assert_eq!(artifact.header.age(), Duration::ZERO);
    }
}
