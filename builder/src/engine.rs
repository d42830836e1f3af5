//! Engine - backend selection and process-wide state.
//!
//! The engine resolves which driver to use (an explicit factory, else the
//! settings selector, else the default driver name), derives the backend's
//! environment record once, and lazily constructs exactly one backend
//! instance for its lifetime.

use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use lectern_core::config::{ProjectConfig, Settings};
use lectern_core::environment::Environment;
use lectern_core::error::Result;
use lectern_core::observer::BuildObserver;

use crate::backend::Backend;
use crate::builder::Builder;
use crate::registry::{BackendFactory, BackendRegistry, DEFAULT_BACKEND};

/// Backend factory and holder of the per-process build environment.
pub struct Engine {
    name: String,
    factory: BackendFactory,
    environment: Environment,
    backend: OnceCell<Arc<dyn Backend>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine, selecting the driver from settings or falling back
    /// to the default driver name, resolved through the registry.
    pub fn new(registry: &BackendRegistry, settings: Option<&Settings>) -> Result<Self> {
        let name = settings
            .and_then(|s| s.backend.as_deref())
            .unwrap_or(DEFAULT_BACKEND);
        let factory = registry.resolve(name)?;
        Ok(Self::with_factory(name, factory, settings))
    }

    /// Create an engine with an explicitly chosen driver constructor.
    ///
    /// The name scopes environment-variable collection: process variables
    /// prefixed `{NAME}_` are gathered verbatim, then overlaid with the
    /// backend's settings table (keys underscore-normalized, upper-cased and
    /// prefixed the same way), skipping null and empty values.
    pub fn with_factory(name: &str, factory: BackendFactory, settings: Option<&Settings>) -> Self {
        let (uid, gid) = current_identity();
        let environ = collect_environ(name, settings, std::env::vars());
        tracing::debug!(
            backend = name,
            uid,
            gid,
            vars = environ.len(),
            "derived backend environment"
        );
        Self {
            name: name.to_string(),
            factory,
            environment: Environment::new(uid, gid, environ),
            backend: OnceCell::new(),
        }
    }

    /// Short name of the selected driver.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The environment record backends are constructed from.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The backend instance, constructed through the factory on first
    /// access and cached for the engine's lifetime.
    pub fn backend(&self) -> Result<Arc<dyn Backend>> {
        self.backend
            .get_or_try_init(|| (self.factory)(self.environment.clone()).map(Arc::from))
            .map(Arc::clone)
    }

    /// Check that the backend can reach its runtime.
    pub async fn verify(&self) -> Result<()> {
        self.backend()?.verify().await
    }

    /// Backend/runtime version metadata, when available.
    pub async fn version_info(&self) -> Result<Option<String>> {
        Ok(self.backend()?.version_info().await)
    }

    /// Create a builder for a project against this engine.
    pub fn create_builder(
        &self,
        config: ProjectConfig,
        observer: Option<Box<dyn BuildObserver>>,
    ) -> Result<Builder<'_>> {
        Builder::new(self, config, observer)
    }
}

/// Gather the backend-scoped variable mapping: prefixed process variables
/// first, settings overrides on top.
fn collect_environ(
    name: &str,
    settings: Option<&Settings>,
    process_vars: impl IntoIterator<Item = (String, String)>,
) -> HashMap<String, Value> {
    let prefix = format!("{}_", name.to_uppercase());
    let mut environ: HashMap<String, Value> = process_vars
        .into_iter()
        .filter(|(key, _)| key.starts_with(&prefix))
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    if let Some(overrides) = settings.and_then(|s| s.overrides_for(name)) {
        for (key, value) in overrides {
            if is_empty_value(value) {
                continue;
            }
            let key = format!("{}{}", prefix, key.replace('-', "_").to_uppercase());
            environ.insert(key, value.clone());
        }
    }
    environ
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn current_identity() -> (u32, u32) {
    #[cfg(unix)]
    {
        let uid = unsafe { libc::getuid() };
        let gid = unsafe { libc::getegid() };
        (uid, gid)
    }
    #[cfg(not(unix))]
    {
        (0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_collect_environ_keeps_prefixed_vars_verbatim() {
        let environ = collect_environ(
            "docker",
            None,
            vars(&[
                ("DOCKER_HOST", "tcp://10.0.0.2:2375"),
                ("DOCKER_TLS_VERIFY", "1"),
                ("PATH", "/usr/bin"),
            ]),
        );
        assert_eq!(environ.len(), 2);
        assert_eq!(environ.get("DOCKER_HOST").unwrap(), "tcp://10.0.0.2:2375");
        assert_eq!(environ.get("DOCKER_TLS_VERIFY").unwrap(), "1");
    }

    #[test]
    fn test_collect_environ_overlays_settings() {
        let settings: Settings = serde_yaml::from_str(
            "backend: docker\ndocker:\n  host: unix:///run/docker.sock\n  pull-policy: always\n",
        )
        .unwrap();
        let environ = collect_environ(
            "docker",
            Some(&settings),
            vars(&[("DOCKER_HOST", "tcp://10.0.0.2:2375")]),
        );
        // settings override the process variable and hyphenated keys normalize
        assert_eq!(
            environ.get("DOCKER_HOST").unwrap(),
            "unix:///run/docker.sock"
        );
        assert_eq!(environ.get("DOCKER_PULL_POLICY").unwrap(), "always");
    }

    #[test]
    fn test_collect_environ_skips_empty_settings() {
        let mut overrides = HashMap::new();
        overrides.insert("host".to_string(), json!(""));
        overrides.insert("timeout".to_string(), Value::Null);
        overrides.insert("kept".to_string(), json!(30));
        let settings = Settings {
            backend: Some("docker".to_string()),
            backends: HashMap::from([("docker".to_string(), overrides)]),
        };
        let environ = collect_environ("docker", Some(&settings), vars(&[]));
        assert_eq!(environ.len(), 1);
        assert_eq!(environ.get("DOCKER_KEPT").unwrap(), &json!(30));
    }

    #[test]
    fn test_collect_environ_is_scoped_by_backend_name() {
        let environ = collect_environ(
            "podman",
            None,
            vars(&[("DOCKER_HOST", "x"), ("PODMAN_URI", "unix:///run/podman.sock")]),
        );
        assert_eq!(environ.len(), 1);
        assert!(environ.contains_key("PODMAN_URI"));
    }
}
