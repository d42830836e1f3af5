//! Backend contract for container runtime drivers.
//!
//! A backend is constructed from an [`Environment`] and executes build tasks
//! against some container runtime. Concrete drivers live in their own crates
//! and register a factory under a short name (see [`crate::registry`]); this
//! module only defines the capability set every driver implements.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lectern_core::environment::Environment;
use lectern_core::error::Result;
use lectern_core::observer::BuildObserver;
use lectern_core::path_map::get_host_path;
use lectern_core::result::BuildResult;
use lectern_core::task::BuildTask;

/// Size of the scratch work volume drivers allocate per step.
pub const WORK_SIZE: &str = "100M";

/// Mount point of the scratch work volume inside a step's container.
pub const WORK_PATH: &str = "/work";

/// Environment key holding the directory mapping used by [`Backend::remap_path`].
pub const DIRECTORY_MAP_KEY: &str = "directory_map";

/// Capability set of a container runtime driver.
///
/// Step execution is strictly sequential: `build` awaits each step before
/// starting the next, and stops at the first failure. A step failure (non-zero
/// exit or an infrastructure fault attributable to a step) is reported as a
/// non-ok [`BuildResult`], not as an `Err`; `Err` is reserved for faults that
/// prevent the build from producing a result at all.
#[async_trait]
pub trait Backend: Send + Sync {
    /// The environment record this backend was constructed from.
    fn environment(&self) -> &Environment;

    /// Perform setup before execution, e.g. pulling the images the task
    /// needs. May be slow; progress is reported through the observer. A
    /// prepare failure aborts the build before any step runs.
    async fn prepare(&self, task: &BuildTask, observer: &dyn BuildObserver) -> Result<()>;

    /// Execute every step of the task in order inside isolated containers,
    /// streaming output to the observer. For each step the driver merges the
    /// base environment with the step's overrides
    /// ([`Environment::step_environ`]), bind-mounts `task.path` read-write at
    /// `step.mnt` when declared, and runs `step.cmd` when given, else the
    /// image's default entrypoint.
    async fn build(&self, task: &BuildTask, observer: &dyn BuildObserver) -> Result<BuildResult>;

    /// Check that the container runtime is reachable.
    async fn verify(&self) -> Result<()>;

    /// Backend/runtime version metadata, when available.
    async fn version_info(&self) -> Option<String> {
        None
    }

    /// Translate a path through the directory mapping found in the
    /// environment, producing the path the backend's runtime resolves on the
    /// host side. Needed when the orchestrator runs inside another layer of
    /// virtualization with its own view of the filesystem.
    fn remap_path(&self, path: &Path) -> PathBuf {
        let mapping = directory_map(self.environment());
        tracing::debug!(?mapping, "directory map from backend environment");
        get_host_path(path, &mapping)
    }
}

/// Extract the string-to-string directory mapping from an environment,
/// ignoring entries of any other shape.
fn directory_map(environment: &Environment) -> HashMap<String, String> {
    match environment.environ.get(DIRECTORY_MAP_KEY) {
        Some(serde_json::Value::Object(map)) => map
            .iter()
            .filter_map(|(from, to)| to.as_str().map(|to| (from.clone(), to.to_string())))
            .collect(),
        _ => HashMap::new(),
    }
}
