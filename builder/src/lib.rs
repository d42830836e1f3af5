//! Lectern Builder - Build Orchestration and Backend Abstraction
//!
//! This module drives containerized build pipelines: the backend contract
//! container runtime drivers implement, the registry drivers register with,
//! the builder that runs a project's steps through the two-phase
//! prepare/build protocol, and the engine that selects and caches a backend
//! per process.

pub mod backend;
pub mod builder;
pub mod engine;
pub mod registry;

// Re-export commonly used types
pub use backend::{Backend, DIRECTORY_MAP_KEY, WORK_PATH, WORK_SIZE};
pub use builder::Builder;
pub use engine::Engine;
pub use registry::{BackendFactory, BackendRegistry, DEFAULT_BACKEND};

/// Lectern Builder version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
