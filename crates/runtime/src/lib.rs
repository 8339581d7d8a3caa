//! Session runtime for the class progression engine.
//!
//! This crate wires `class-core` to the outside world: it loads balance via
//! `class-content`, persists character blobs through repositories, logs every
//! progression milestone with `tracing`, and replays recorded event scripts.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the [`Session`] facade hosts embed
//! - [`repository`] provides blob storage backends
//! - [`replay`] drives scripts through a session deterministically
//! - [`config`] reads runtime settings from the environment
pub mod config;
pub mod error;
pub mod replay;
pub mod repository;
pub mod session;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use replay::{ReplayReport, ReplayStep, load_script, replay, replay_fresh};
pub use repository::{FileProgressRepo, InMemoryProgressRepo, ProgressRepository, RepositoryError};
pub use session::{HandledEvent, LoadStatus, Session, SpeedRestore};
