//! Backend registry.
//!
//! Drivers register a constructor under a short name at startup; the engine
//! resolves backend selectors against this table. An explicit registration
//! table replaces dynamic loading of implementation identifiers.

use std::collections::HashMap;

use lectern_core::environment::Environment;
use lectern_core::error::{LecternError, Result};

use crate::backend::Backend;

/// Constructor for a backend driver.
pub type BackendFactory = fn(Environment) -> Result<Box<dyn Backend>>;

/// Name of the default driver used when neither settings nor the caller
/// select one.
pub const DEFAULT_BACKEND: &str = "docker";

/// Table of known backend drivers, keyed by short name.
#[derive(Default)]
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver constructor under a short name. A later
    /// registration under the same name replaces the earlier one.
    pub fn register(&mut self, name: impl Into<String>, factory: BackendFactory) {
        let name = name.into();
        tracing::debug!(backend = %name, "registered backend driver");
        self.factories.insert(name, factory);
    }

    /// Resolve a short name to its registered constructor.
    pub fn resolve(&self, name: &str) -> Result<BackendFactory> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| LecternError::UnknownBackend(name.to_string()))
    }

    /// Whether a driver is registered under the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered driver names.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lectern_core::observer::BuildObserver;
    use lectern_core::result::BuildResult;
    use lectern_core::task::BuildTask;

    struct DummyBackend {
        environment: Environment,
    }

    #[async_trait]
    impl Backend for DummyBackend {
        fn environment(&self) -> &Environment {
            &self.environment
        }

        async fn prepare(&self, _task: &BuildTask, _observer: &dyn BuildObserver) -> Result<()> {
            Ok(())
        }

        async fn build(
            &self,
            _task: &BuildTask,
            _observer: &dyn BuildObserver,
        ) -> Result<BuildResult> {
            Ok(BuildResult::success())
        }

        async fn verify(&self) -> Result<()> {
            Ok(())
        }
    }

    fn dummy_factory(environment: Environment) -> Result<Box<dyn Backend>> {
        Ok(Box::new(DummyBackend { environment }))
    }

    #[test]
    fn test_resolve_registered_backend() {
        let mut registry = BackendRegistry::new();
        registry.register("dummy", dummy_factory);
        assert!(registry.contains("dummy"));
        let factory = registry.resolve("dummy").unwrap();
        let backend = factory(Environment::new(0, 0, Default::default())).unwrap();
        assert_eq!(backend.environment().uid, 0);
    }

    #[test]
    fn test_resolve_unknown_backend_fails() {
        let registry = BackendRegistry::new();
        let err = registry.resolve("podman").unwrap_err();
        assert!(matches!(err, LecternError::UnknownBackend(ref name) if name == "podman"));
    }

    #[test]
    fn test_names_lists_registrations() {
        let mut registry = BackendRegistry::new();
        registry.register("dummy", dummy_factory);
        registry.register(DEFAULT_BACKEND, dummy_factory);
        let mut names = registry.names();
        names.sort_unstable();
        assert_eq!(names, vec![DEFAULT_BACKEND, "dummy"]);
    }
}
