//! Content loaders for reading progression data from files.

pub mod config;
pub mod script;
pub mod weapons;

pub use config::ConfigLoader;
pub use script::{EventScript, ScriptLoader};
pub use weapons::WeaponCatalog;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
