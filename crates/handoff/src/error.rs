// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the artifact store and the handoff protocol.

use crate::{DecodeError, HandoffState};
use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by an [`crate::ArtifactStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading, writing or renaming a slot file failed.
    #[error("store I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The slot name is not a plain file name.
    #[error("invalid slot name '{0}': must be a non-empty file name without separators")]
    InvalidSlot(String),
}

/// Errors raised by a handoff instance.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    /// No artifact appeared within the timeout. Recoverable by retrying the
    /// whole invocation at a higher layer.
    #[error("timed out after {waited:?} waiting for artifact at {location}")]
    Timeout { location: String, waited: Duration },

    /// The artifact exists but cannot be decoded. Never retried: a corrupt
    /// artifact points at a producer-side bug.
    #[error("corrupt artifact at {location}: {source}")]
    Corrupt {
        location: String,
        #[source]
        source: DecodeError,
    },

    /// The artifact decoded but belongs to the other direction.
    #[error("artifact at {location} is for boundary '{found}', expected '{expected}'")]
    WrongBoundary {
        location: String,
        expected: crate::Boundary,
        found: crate::Boundary,
    },

    /// The consumer already reached a terminal state.
    #[error("handoff at {location} already finished in state {state:?}")]
    AlreadyFinished {
        location: String,
        state: HandoffState,
    },

    /// The artifact header could not be serialized.
    #[error("failed to encode artifact header: {0}")]
    Encode(#[from] serde_json::Error),

    /// The underlying store failed.
    #[error("artifact store error: {0}")]
    Store(#[from] StoreError),
}

impl HandoffError {
    /// Terminal state this error corresponds to, if it ends a handoff.
    pub fn terminal_state(&self) -> Option<HandoffState> {
        match self {
            Self::Timeout { .. } => Some(HandoffState::TimedOut),
            Self::Corrupt { .. } | Self::WrongBoundary { .. } => Some(HandoffState::Corrupt),
            _ => None,
        }
    }
}
