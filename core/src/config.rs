//! Project and settings configuration.
//!
//! Typed configuration objects consumed by the builder and engine. A project
//! configuration names the working directory and the ordered step entries; a
//! settings document optionally selects a backend and carries per-backend
//! override tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::step::RawStep;

/// Project configuration: the course working directory and its pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Working directory containing the course material
    pub dir: PathBuf,

    /// Ordered raw step entries
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

impl ProjectConfig {
    /// Load a project configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(&path)?;
        let config: Self = serde_yaml::from_str(&raw)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            steps = config.steps.len(),
            "loaded project configuration"
        );
        Ok(config)
    }
}

/// Optional settings document consumed by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Backend selector: a registered backend name
    #[serde(default)]
    pub backend: Option<String>,

    /// Per-backend override tables, keyed by backend name
    #[serde(flatten)]
    pub backends: HashMap<String, HashMap<String, Value>>,
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Override table for the named backend, if any.
    pub fn overrides_for(&self, name: &str) -> Option<&HashMap<String, Value>> {
        self.backends.get(name)
    }
}
