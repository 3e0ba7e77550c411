// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # handoff
//!
//! Moves intermediate artifacts between the edge and cloud sites through a
//! shared [`ArtifactStore`]. The presence of a blob in a named slot is the
//! only synchronization primitive: no locks, no messages.
//!
//! # Protocol (per direction)
//!
//! ```text
//! producer: encode Artifact ──► store.put(slot)   (atomic: absent or complete)
//!
//! consumer: AWAITING_ARTIFACT
//!              │ poll every `poll_interval`, at most `timeout`
//!              ├── nothing appeared ──────────► TIMED_OUT   (HandoffError::Timeout)
//!              ├── zero-length / empty payload ► EMPTY_OK    (short-circuit)
//!              ├── undecodable bytes ─────────► CORRUPT     (HandoffError::Corrupt)
//!              └── well-formed artifact ──────► READY
//! ```
//!
//! Every terminal state is final for that [`Consumer`]. The edge→cloud and
//! cloud→edge directions are two independent instances.
//!
//! # Example
//! ```
//! use handoff::{Artifact, Boundary, Consumer, HandoffConfig, HandoffOutcome,
//!               MemoryArtifactStore, Producer};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
//! rt.block_on(async {
//!     let store = MemoryArtifactStore::new();
//!     let artifact = Artifact::new(Boundary::EdgeToCloud, "img-1".into(), Some(3), vec![1, 2, 3]);
//!     Producer::new(&store, "edge_to_cloud.bin").publish(&artifact).unwrap();
//!
//!     let mut consumer = Consumer::new(&store, "edge_to_cloud.bin", Boundary::EdgeToCloud,
//!                                      HandoffConfig::default());
//!     let received = consumer.await_artifact().await.unwrap();
//!     assert!(matches!(received.outcome, HandoffOutcome::Ready(a) if a.payload == vec![1, 2, 3]));
//! });
//! ```

mod artifact;
mod error;
mod protocol;
mod store;

pub use artifact::{Artifact, ArtifactHeader, Boundary, DecodeError, FORMAT_VERSION, MAGIC};
pub use error::{HandoffError, StoreError};
pub use protocol::{Consumer, HandoffConfig, HandoffOutcome, HandoffState, Producer, Received};
pub use split_selector::CorrelationToken;
pub use store::{validate_slot, ArtifactStore, FsArtifactStore, MemoryArtifactStore};
