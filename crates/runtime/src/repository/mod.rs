//! Repository layer for persisted character progress.
//!
//! Repositories store the encoded blobs produced by
//! [`class_core::ClassEngine::serialize_character`]. Static balance data is
//! loaded through `class-content`, not through repositories.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileProgressRepo;
pub use memory::InMemoryProgressRepo;
pub use traits::ProgressRepository;
