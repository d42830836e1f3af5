//! Build orchestration.
//!
//! The builder resolves a project's steps (optionally filtered and reordered
//! by step references), assembles a [`BuildTask`], and drives the backend
//! through its two-phase protocol: prepare, then build. Lifecycle events are
//! forwarded to the observer; the final [`BuildResult`] always reaches
//! `observer.done`.

use std::collections::HashMap;

use lectern_core::config::ProjectConfig;
use lectern_core::error::{LecternError, Result};
use lectern_core::observer::{BuildObserver, StreamObserver};
use lectern_core::result::BuildResult;
use lectern_core::step::{BuildStep, RawStep};
use lectern_core::task::BuildTask;

use crate::engine::Engine;

/// Drives one project's builds against an engine's backend.
pub struct Builder<'a> {
    engine: &'a Engine,
    config: ProjectConfig,
    observer: Box<dyn BuildObserver>,
}

impl<'a> std::fmt::Debug for Builder<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> Builder<'a> {
    /// Create a builder for a project.
    ///
    /// The project's `dir` must be an existing directory. Without an
    /// explicit observer, progress goes to standard output.
    pub fn new(
        engine: &'a Engine,
        config: ProjectConfig,
        observer: Option<Box<dyn BuildObserver>>,
    ) -> Result<Self> {
        if !config.dir.is_dir() {
            return Err(LecternError::Config(format!(
                "config.dir is not a directory: {}",
                config.dir.display()
            )));
        }
        Ok(Self {
            engine,
            config,
            observer: observer.unwrap_or_else(|| Box::new(StreamObserver::stdout())),
        })
    }

    /// Resolve the configured steps, optionally selecting a subset.
    ///
    /// With references, selected steps come back in the order the
    /// references were given, enabling reordering and subsetting at
    /// invocation time. An all-digit reference resolves as a zero-based
    /// position; anything else resolves by exact name match.
    pub fn get_steps(&self, refs: Option<&[String]>) -> Result<Vec<BuildStep>> {
        resolve_steps(&self.config.steps, refs)
    }

    /// Run the build: resolve steps, assemble the task, then drive the
    /// backend through prepare and build.
    ///
    /// Errors from either phase propagate to the caller and abort the build;
    /// a failing step is not an error but a non-ok result.
    pub async fn build(&self, step_refs: Option<&[String]>) -> Result<BuildResult> {
        let backend = self.engine.backend()?;
        let steps = self.get_steps(step_refs)?;
        let task = BuildTask::new(self.config.dir.clone(), steps);

        tracing::info!(
            path = %task.path.display(),
            steps = task.steps.len(),
            "entering prepare phase"
        );
        self.observer.enter_prepare();
        backend.prepare(&task, self.observer.as_ref()).await?;

        tracing::info!("entering build phase");
        self.observer.enter_build();
        let result = backend.build(&task, self.observer.as_ref()).await?;

        tracing::info!(ok = result.ok(), "build finished");
        self.observer.done(&result);
        Ok(result)
    }
}

/// Construct all configured steps and select the referenced ones.
fn resolve_steps(entries: &[RawStep], refs: Option<&[String]>) -> Result<Vec<BuildStep>> {
    let steps = entries
        .iter()
        .enumerate()
        .map(|(index, raw)| BuildStep::from_config(index, raw))
        .collect::<Result<Vec<_>>>()?;

    let refs = match refs {
        Some(refs) if !refs.is_empty() => refs,
        _ => return Ok(steps),
    };

    let by_name: HashMap<&str, usize> = steps
        .iter()
        .filter_map(|step| step.name.as_deref().map(|name| (name, step.index)))
        .collect();

    let mut selected = Vec::with_capacity(refs.len());
    for reference in refs {
        // An all-digit reference is always positional, even when a step is
        // named with the same digit string.
        let is_index = !reference.is_empty() && reference.bytes().all(|b| b.is_ascii_digit());
        let index = if is_index {
            reference
                .parse::<usize>()
                .ok()
                .filter(|&index| index < steps.len())
                .ok_or_else(|| LecternError::StepIndexTooBig {
                    reference: reference.clone(),
                    count: steps.len(),
                })?
        } else {
            *by_name
                .get(reference.as_str())
                .ok_or_else(|| LecternError::UnknownStep(reference.clone()))?
        };
        selected.push(steps[index].clone());
    }
    Ok(selected)
}
