//! Repository contract for persisted character blobs.

use class_core::CharacterId;

use super::Result;

/// Storage for encoded character blobs.
///
/// Repositories treat blobs as opaque bytes; validation (magic, version,
/// checksum) happens in `class-core` when the session restores them.
pub trait ProgressRepository: Send + Sync {
    /// Store the blob for `character`, replacing any previous one.
    fn save(&self, character: CharacterId, blob: &[u8]) -> Result<()>;

    /// Load the blob for `character`, `None` if nothing was saved.
    fn load(&self, character: CharacterId) -> Result<Option<Vec<u8>>>;

    /// Check if a blob exists
    fn exists(&self, character: CharacterId) -> bool;

    /// Delete a blob; deleting a missing blob is not an error.
    fn delete(&self, character: CharacterId) -> Result<()>;

    /// All characters with a saved blob, ascending.
    fn list_characters(&self) -> Result<Vec<CharacterId>> {
        Ok(vec![])
    }
}
