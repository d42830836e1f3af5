//! Build task - the full unit of work handed to a backend.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::step::BuildStep;

/// An execution request: a working directory plus the ordered steps to
/// execute inside it.
///
/// Step order is execution order. Constructed fresh per build invocation
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTask {
    /// Host working directory; must be an existing directory
    pub path: PathBuf,

    /// Ordered pipeline steps
    pub steps: Vec<BuildStep>,
}

impl BuildTask {
    /// Create a new build task.
    pub fn new(path: impl Into<PathBuf>, steps: Vec<BuildStep>) -> Self {
        Self {
            path: path.into(),
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::RawStep;

    #[test]
    fn test_task_preserves_step_order() {
        let steps = vec![
            BuildStep::from_config(0, &RawStep::Image("first".to_string())).unwrap(),
            BuildStep::from_config(1, &RawStep::Image("second".to_string())).unwrap(),
        ];
        let task = BuildTask::new("/course", steps);
        assert_eq!(task.path, PathBuf::from("/course"));
        assert_eq!(task.steps[0].img, "first:latest");
        assert_eq!(task.steps[1].img, "second:latest");
    }

    #[test]
    fn test_task_allows_empty_steps() {
        let task = BuildTask::new("/course", Vec::new());
        assert!(task.steps.is_empty());
    }
}
