//! Backend environment - identity and variable overrides.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::step::BuildStep;

/// Immutable identity plus backend-scoped environment variable overrides.
///
/// Constructed once per engine and reused for every build; holds no live
/// resources, only identity and configuration data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Numeric user id containers should run as
    pub uid: u32,

    /// Numeric group id containers should run as
    pub gid: u32,

    /// Backend-scoped variable overrides, keys already namespaced by
    /// backend name
    pub environ: HashMap<String, Value>,
}

impl Environment {
    /// Create a new environment record.
    pub fn new(uid: u32, gid: u32, environ: HashMap<String, Value>) -> Self {
        Self { uid, gid, environ }
    }

    /// Construct the process environment for one step's container: the base
    /// variable mapping merged with the step's overrides, step keys taking
    /// precedence.
    ///
    /// String values pass through verbatim; structured values are rendered
    /// in compact JSON form.
    pub fn step_environ(&self, step: &BuildStep) -> HashMap<String, String> {
        let mut merged: HashMap<String, String> = self
            .environ
            .iter()
            .map(|(key, value)| (key.clone(), render_value(value)))
            .collect();
        for (key, value) in &step.env {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
