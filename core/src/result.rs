//! Build result - the terminal outcome of a build attempt.

use serde::{Deserialize, Serialize};

use crate::step::BuildStep;

/// Outcome of a build attempt.
///
/// A non-zero exit code or an error description marks a failed build; a
/// failed result always identifies the step it failed on. Produced once per
/// build invocation and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildResult {
    /// Process exit status of the last executed step; 0 means success
    pub code: i64,

    /// Infrastructure-level failure description, distinct from a non-zero
    /// exit code
    pub error: Option<String>,

    /// The step during which the failure occurred
    pub step: Option<BuildStep>,
}

impl BuildResult {
    /// Create a result.
    ///
    /// # Panics
    ///
    /// Panics when a non-ok result carries no step reference; failure
    /// attribution is mandatory.
    pub fn new(code: i64, error: Option<String>, step: Option<BuildStep>) -> Self {
        let result = Self { code, error, step };
        assert!(
            result.ok() || result.step.is_some(),
            "step is required for failed result"
        );
        result
    }

    /// A successful build.
    pub fn success() -> Self {
        Self::new(0, None, None)
    }

    /// A build that ended with the given exit code on the given step.
    pub fn from_exit(code: i64, step: BuildStep) -> Self {
        Self::new(code, None, Some(step))
    }

    /// A build that hit an infrastructure-level failure on the given step.
    pub fn failed(error: impl Into<String>, step: BuildStep) -> Self {
        Self::new(0, Some(error.into()), Some(step))
    }

    /// Whether the build succeeded.
    pub fn ok(&self) -> bool {
        self.code == 0 && self.error.is_none()
    }
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ok() {
            return write!(f, "Build ok");
        }
        let step = self
            .step
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_default();
        match &self.error {
            Some(error) => write!(f, "Build failed on step {}: {}", step, error),
            None => write!(f, "Build failed on step {}: exit code {}", step, self.code),
        }
    }
}
