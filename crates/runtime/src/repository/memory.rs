//! In-memory ProgressRepository implementation for tests and previews.

use std::collections::BTreeMap;
use std::sync::RwLock;

use class_core::CharacterId;

use super::{ProgressRepository, RepositoryError, Result};

/// In-memory implementation of ProgressRepository.
#[derive(Default)]
pub struct InMemoryProgressRepo {
    blobs: RwLock<BTreeMap<CharacterId, Vec<u8>>>,
}

impl InMemoryProgressRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressRepository for InMemoryProgressRepo {
    fn save(&self, character: CharacterId, blob: &[u8]) -> Result<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        blobs.insert(character, blob.to_vec());
        Ok(())
    }

    fn load(&self, character: CharacterId) -> Result<Option<Vec<u8>>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(blobs.get(&character).cloned())
    }

    fn exists(&self, character: CharacterId) -> bool {
        self.blobs
            .read()
            .map(|blobs| blobs.contains_key(&character))
            .unwrap_or(false)
    }

    fn delete(&self, character: CharacterId) -> Result<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        blobs.remove(&character);
        Ok(())
    }

    fn list_characters(&self) -> Result<Vec<CharacterId>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(blobs.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_delete() {
        let repo = InMemoryProgressRepo::new();
        let hero = CharacterId(7);

        assert!(repo.load(hero).unwrap().is_none());
        repo.save(hero, b"blob").unwrap();
        assert!(repo.exists(hero));
        assert_eq!(repo.load(hero).unwrap().as_deref(), Some(&b"blob"[..]));

        repo.delete(hero).unwrap();
        assert!(!repo.exists(hero));
        repo.delete(hero).unwrap();
    }

    #[test]
    fn lists_characters_in_order() {
        let repo = InMemoryProgressRepo::new();
        repo.save(CharacterId(9), b"a").unwrap();
        repo.save(CharacterId(2), b"b").unwrap();

        assert_eq!(repo.list_characters().unwrap(), vec![CharacterId(2), CharacterId(9)]);
    }
}
