//! File-based ProgressRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use class_core::CharacterId;

use super::{ProgressRepository, RepositoryError, Result};

/// Stores each character blob as `character_{id}.bin` under one directory.
///
/// Writes go to a `.bin.tmp` sibling first and are renamed into place, so a
/// crash mid-save leaves the previous blob intact.
pub struct FileProgressRepo {
    base_dir: PathBuf,
}

impl FileProgressRepo {
    /// Create the repository, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn blob_path(&self, character: CharacterId) -> PathBuf {
        self.base_dir.join(format!("character_{}.bin", character.0))
    }
}

impl ProgressRepository for FileProgressRepo {
    fn save(&self, character: CharacterId, blob: &[u8]) -> Result<()> {
        let path = self.blob_path(character);
        let temp_path = path.with_extension("bin.tmp");

        fs::write(&temp_path, blob).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved character[{}] to {}", character.0, path.display());

        Ok(())
    }

    fn load(&self, character: CharacterId) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(character);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;

        tracing::debug!("Loaded character[{}] from {}", character.0, path.display());

        Ok(Some(bytes))
    }

    fn exists(&self, character: CharacterId) -> bool {
        self.blob_path(character).exists()
    }

    fn delete(&self, character: CharacterId) -> Result<()> {
        let path = self.blob_path(character);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted character[{}]", character.0);
        }

        Ok(())
    }

    fn list_characters(&self) -> Result<Vec<CharacterId>> {
        let mut characters = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id_str) = filename
                    .strip_prefix("character_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(id) = id_str.parse::<u64>()
            {
                characters.push(CharacterId(id));
            }
        }

        characters.sort_unstable();
        Ok(characters)
    }
}
