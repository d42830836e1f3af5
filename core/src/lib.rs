//! Lectern Core - Foundational Types and Abstractions
//!
//! This module provides the foundational types, traits, and abstractions
//! used across the Lectern build pipeline: the step and task model, build
//! results, backend environments, the observer protocol, and the path and
//! environment-variable mapping utilities.

pub mod config;
pub mod env_load;
pub mod environment;
pub mod error;
pub mod observer;
pub mod path_map;
pub mod result;
pub mod step;
pub mod task;

// Re-export commonly used types
pub use config::{ProjectConfig, Settings};
pub use env_load::load_from_env;
pub use environment::Environment;
pub use error::{LecternError, Result};
pub use observer::{BuildObserver, NullObserver, StreamObserver};
pub use path_map::get_host_path;
pub use result::BuildResult;
pub use step::{clean_image_name, BuildStep, RawStep, StepConfig};
pub use task::BuildTask;

/// Lectern version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
