// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Artifact stores: named slots holding opaque blobs.
//!
//! Contract for every implementation:
//! - `put` is atomic with respect to `get`: a reader sees either no blob or
//!   the complete blob, never a prefix.
//! - `get` on an empty slot returns `Ok(None)`.
//! - `remove` on an empty slot is not an error.

use crate::StoreError;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Storage backend shared by the producer and consumer of a handoff.
pub trait ArtifactStore: Send + Sync {
    /// Publish `bytes` under `slot`, replacing any previous blob.
    fn put(&self, slot: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Read the blob under `slot`, if one is present.
    fn get(&self, slot: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Clear `slot`.
    fn remove(&self, slot: &str) -> Result<(), StoreError>;

    /// Human-readable location of `slot`, used in diagnostics.
    fn locate(&self, slot: &str) -> String;
}

/// Accepts a plain file name: non-empty, not hidden, no path separators.
pub fn validate_slot(slot: &str) -> Result<(), StoreError> {
    let plain = !slot.is_empty()
        && !slot.starts_with('.')
        && !slot.contains(['/', '\\'])
        && Path::new(slot).file_name().map(|n| n == slot).unwrap_or(false);
    if plain {
        Ok(())
    } else {
        Err(StoreError::InvalidSlot(slot.to_string()))
    }
}

/// Directory-backed store. Each slot is one file under `root`.
///
/// Writes go to a hidden temporary file in the same directory and are
/// renamed into place, so a polling reader never observes a partial blob.
#[derive(Debug)]
pub struct FsArtifactStore {
    root: PathBuf,
}

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

impl FsArtifactStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        tracing::debug!(root = %root.display(), "Opened artifact store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `slot`.
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(slot)
    }

    fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn put(&self, slot: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_slot(slot)?;
        let target = self.slot_path(slot);
        let tmp = self.root.join(format!(
            ".{slot}.{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let write = || -> std::io::Result<()> {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            Ok(())
        };
        if let Err(e) = write() {
            let _ = std::fs::remove_file(&tmp);
            return Err(Self::io_err(&tmp)(e));
        }
        std::fs::rename(&tmp, &target).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            Self::io_err(&target)(e)
        })?;

        tracing::debug!(slot, bytes = bytes.len(), "Published blob");
        Ok(())
    }

    fn get(&self, slot: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_err(&path)(e)),
        }
    }

    fn remove(&self, slot: &str) -> Result<(), StoreError> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_err(&path)(e)),
        }
    }

    fn locate(&self, slot: &str) -> String {
        self.slot_path(slot).display().to_string()
    }
}

/// In-process store for tests and single-host simulation.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn put(&self, slot: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_slot(slot)?;
        self.slots().insert(slot.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, slot: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_slot(slot)?;
        Ok(self.slots().get(slot).cloned())
    }

    fn remove(&self, slot: &str) -> Result<(), StoreError> {
        validate_slot(slot)?;
        self.slots().remove(slot);
        Ok(())
    }

    fn locate(&self, slot: &str) -> String {
        format!("memory://{slot}")
    }
}
