// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Producer and consumer halves of a handoff.

use crate::{Artifact, ArtifactHeader, ArtifactStore, Boundary, HandoffError};
use std::time::Duration;
use tokio::time::Instant;

/// Polling parameters for a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandoffConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Lifecycle of one handoff instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffState {
    AwaitingArtifact,
    TimedOut,
    Corrupt,
    EmptyOk,
    Ready,
}

impl HandoffState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::AwaitingArtifact)
    }
}

/// Successful end of a handoff.
#[derive(Debug, Clone, PartialEq)]
pub enum HandoffOutcome {
    /// The producer signalled there is nothing to process. The header is
    /// present when the signal was a well-formed artifact with no payload
    /// rather than a zero-length marker.
    Empty { header: Option<ArtifactHeader> },
    /// A complete artifact is available.
    Ready(Artifact),
}

impl HandoffOutcome {
    pub fn state(&self) -> HandoffState {
        match self {
            Self::Empty { .. } => HandoffState::EmptyOk,
            Self::Ready(_) => HandoffState::Ready,
        }
    }

    pub fn header(&self) -> Option<&ArtifactHeader> {
        match self {
            Self::Empty { header } => header.as_ref(),
            Self::Ready(artifact) => Some(&artifact.header),
        }
    }
}

/// Outcome plus how long the consumer waited for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub outcome: HandoffOutcome,
    pub waited: Duration,
}

/// Writing side of a handoff.
pub struct Producer<'a> {
    store: &'a dyn ArtifactStore,
    slot: &'a str,
}

impl<'a> Producer<'a> {
    pub fn new(store: &'a dyn ArtifactStore, slot: &'a str) -> Self {
        Self { store, slot }
    }

    /// Encode and publish `artifact`.
    pub fn publish(&self, artifact: &Artifact) -> Result<(), HandoffError> {
        let bytes = artifact.encode()?;
        self.store.put(self.slot, &bytes)?;
        tracing::debug!(
            slot = self.slot,
            token = %artifact.header.token,
            boundary = %artifact.header.boundary,
            payload = artifact.payload.len(),
            "Artifact published"
        );
        Ok(())
    }

    /// Publish the zero-length "nothing to transfer" marker.
    pub fn publish_empty(&self) -> Result<(), HandoffError> {
        self.store.put(self.slot, &[])?;
        tracing::debug!(slot = self.slot, "Empty marker published");
        Ok(())
    }

    /// Clear the slot before a new invocation reuses it.
    pub fn clear(&self) -> Result<(), HandoffError> {
        self.store.remove(self.slot)?;
        Ok(())
    }
}

/// Reading side of a handoff. Single use: once a terminal state is
/// reached, further waits fail with [`HandoffError::AlreadyFinished`].
pub struct Consumer<'a> {
    store: &'a dyn ArtifactStore,
    slot: &'a str,
    expected: Boundary,
    config: HandoffConfig,
    state: HandoffState,
    remove_on_read: bool,
}

impl<'a> Consumer<'a> {
    pub fn new(
        store: &'a dyn ArtifactStore,
        slot: &'a str,
        expected: Boundary,
        config: HandoffConfig,
    ) -> Self {
        Self {
            store,
            slot,
            expected,
            config,
            state: HandoffState::AwaitingArtifact,
            remove_on_read: true,
        }
    }

    /// Leave the slot in place after a successful read, for deployments
    /// where an external collaborator owns slot cleanup.
    pub fn keep_slot(mut self) -> Self {
        self.remove_on_read = false;
        self
    }

    pub fn state(&self) -> HandoffState {
        self.state
    }

    /// Poll the slot until an artifact appears or the timeout elapses.
    ///
    /// The slot is checked immediately, then after every `poll_interval`;
    /// the last sleep is shortened so the final check happens at exactly
    /// `timeout`. A store error aborts the wait without changing state.
    /// On success the slot is removed unless [`keep_slot`](Self::keep_slot)
    /// was set; corrupt blobs are never removed.
    pub async fn await_artifact(&mut self) -> Result<Received, HandoffError> {
        let location = self.store.locate(self.slot);
        if self.state.is_terminal() {
            return Err(HandoffError::AlreadyFinished {
                location,
                state: self.state,
            });
        }

        let start = Instant::now();
        loop {
            if let Some(bytes) = self.store.get(self.slot)? {
                let waited = start.elapsed();
                let result = self.classify(&bytes, location);
                self.state = match &result {
                    Ok(outcome) => outcome.state(),
                    Err(e) => e.terminal_state().unwrap_or(HandoffState::Corrupt),
                };
                let outcome = result?;
                if self.remove_on_read {
                    self.store.remove(self.slot)?;
                }
                return Ok(Received { outcome, waited });
            }

            let elapsed = start.elapsed();
            if elapsed >= self.config.timeout {
                self.state = HandoffState::TimedOut;
                tracing::warn!(location = %location, waited = ?elapsed, "Handoff timed out");
                return Err(HandoffError::Timeout {
                    location,
                    waited: elapsed,
                });
            }
            let remaining = self.config.timeout - elapsed;
            tracing::debug!(location = %location, elapsed = ?elapsed, "Artifact not yet visible");
            tokio::time::sleep(self.config.poll_interval.min(remaining)).await;
        }
    }

    fn classify(&self, bytes: &[u8], location: String) -> Result<HandoffOutcome, HandoffError> {
        if bytes.is_empty() {
            tracing::warn!(location = %location, "Empty marker received");
            return Ok(HandoffOutcome::Empty { header: None });
        }

        let artifact = Artifact::decode(bytes).map_err(|source| {
            tracing::error!(location = %location, error = %source, "Corrupt artifact");
            HandoffError::Corrupt {
                location: location.clone(),
                source,
            }
        })?;

        if artifact.header.boundary != self.expected {
            tracing::error!(location = %location, found = %artifact.header.boundary, "Artifact for wrong boundary");
            return Err(HandoffError::WrongBoundary {
                location,
                expected: self.expected,
                found: artifact.header.boundary,
            });
        }

        if artifact.is_empty() {
            tracing::warn!(location = %location, token = %artifact.header.token, "Empty artifact received");
            return Ok(HandoffOutcome::Empty {
                header: Some(artifact.header),
            });
        }

        tracing::debug!(
            location = %location,
            token = %artifact.header.token,
            payload = artifact.payload.len(),
            "Artifact received"
        );
        Ok(HandoffOutcome::Ready(artifact))
    }
}
