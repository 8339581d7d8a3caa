//! Versioned, checksummed character blob.
//!
//! Layout:
//!
//! ```text
//! [4 bytes  magic "CLSP"]
//! [2 bytes  version, little endian]
//! [32 bytes SHA-256 of payload]
//! [payload  bincode CharacterSnapshot]
//! ```
//!
//! Only XP is authoritative. The stored level is informational and is
//! recomputed from XP on load so a tampered or stale level can never
//! desync from the table.

use sha2::{Digest, Sha256};

use crate::class::{ActiveClassSet, ClassId, check_activation};
use crate::config::ProgressionConfig;
use crate::error::PersistenceError;
use crate::progression::{ProgressBook, ProgressRecord};

pub const BLOB_MAGIC: [u8; 4] = *b"CLSP";
pub const BLOB_VERSION: u16 = 1;
const HEADER_LEN: usize = 4 + 2 + 32;

/// Stable schema for one character's progress.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CharacterSnapshot {
    /// `(class, cumulative xp, level at save time)`.
    pub classes: Vec<(ClassId, f64, u8)>,
    /// Active classes in activation order.
    pub active: Vec<ClassId>,
}

/// Progress rebuilt from a snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestoredCharacter {
    pub progress: ProgressBook,
    pub active: ActiveClassSet,
    /// Active entries that were duplicates or broke the class cap.
    pub dropped: Vec<ClassId>,
}

impl CharacterSnapshot {
    pub fn capture(progress: &ProgressBook, active: &ActiveClassSet) -> Self {
        Self {
            classes: progress
                .iter()
                .map(|(class, record)| (class, record.xp(), record.level()))
                .collect(),
            active: active.iter().collect(),
        }
    }

    /// Rebuilds engine state, recomputing levels and re-validating the
    /// active set in stored order.
    pub fn restore(&self, config: &ProgressionConfig) -> RestoredCharacter {
        let mut progress = ProgressBook::new();
        for &(class, xp, _) in &self.classes {
            if xp.is_finite() && xp > 0.0 {
                progress.insert(class, ProgressRecord::with_xp(xp));
            }
        }

        let mut active = ActiveClassSet::new();
        let mut dropped = Vec::new();
        for &class in &self.active {
            match check_activation(&active, &progress, class, config) {
                Ok(()) => active.push(class),
                Err(_) => dropped.push(class),
            }
        }

        RestoredCharacter {
            progress,
            active,
            dropped,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, PersistenceError> {
        let payload =
            bincode::serialize(self).map_err(|e| PersistenceError::Encode(e.to_string()))?;
        let digest = Sha256::digest(&payload);

        let mut blob = Vec::with_capacity(HEADER_LEN + payload.len());
        blob.extend_from_slice(&BLOB_MAGIC);
        blob.extend_from_slice(&BLOB_VERSION.to_le_bytes());
        blob.extend_from_slice(&digest);
        blob.extend_from_slice(&payload);
        Ok(blob)
    }

    pub fn decode(blob: &[u8]) -> Result<Self, PersistenceError> {
        if blob.len() < HEADER_LEN {
            return Err(PersistenceError::Truncated { len: blob.len() });
        }
        let (magic, rest) = blob.split_at(4);
        if magic != BLOB_MAGIC {
            return Err(PersistenceError::BadMagic);
        }
        let (version, rest) = rest.split_at(2);
        let version = u16::from_le_bytes([version[0], version[1]]);
        if version != BLOB_VERSION {
            return Err(PersistenceError::UnsupportedVersion(version));
        }
        let (checksum, payload) = rest.split_at(32);
        if Sha256::digest(payload).as_slice() != checksum {
            return Err(PersistenceError::ChecksumMismatch);
        }

        bincode::deserialize(payload).map_err(|e| PersistenceError::Decode(e.to_string()))
    }
}
