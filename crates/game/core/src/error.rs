//! Error types surfaced by class-core.
//!
//! The engine distinguishes three failure classes:
//!
//! - **Precondition violations** (unknown character, non-positive XP) never
//!   produce an error; callers get a safe default (level 0, multiplier 1.0).
//! - **Invariant violations** (activating past the class cap) are reported as
//!   [`ActivationError`] and leave state untouched.
//! - **Corrupted persisted data** is reported as [`PersistenceError`]; the
//!   engine falls back to a fresh record for that character.

use thiserror::Error;

use crate::class::ClassId;

/// Why a class could not be added to a character's active set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("{0} is already active")]
    AlreadyActive(ClassId),

    #[error("active class limit of {limit} reached")]
    LimitReached { limit: usize },
}

/// Failures decoding a persisted character blob.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("blob too short: {len} bytes")]
    Truncated { len: usize },

    #[error("bad magic bytes")]
    BadMagic,

    #[error("unsupported blob version {0}")]
    UnsupportedVersion(u16),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("payload decode failed: {0}")]
    Decode(String),

    #[error("payload encode failed: {0}")]
    Encode(String),
}
