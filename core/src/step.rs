//! Build step model.
//!
//! A raw configuration entry is either a bare image reference or a detailed
//! mapping; both normalize into the validated [`BuildStep`] record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{LecternError, Result};

/// Normalize an image reference: a reference without an explicit tag
/// gets `:latest` appended.
pub fn clean_image_name(image: &str) -> String {
    if image.contains(':') {
        image.to_string()
    } else {
        format!("{}:latest", image)
    }
}

/// One raw step entry as it appears in a project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStep {
    /// Bare image reference (e.g. `python:3.9`)
    Image(String),
    /// Detailed step mapping
    Detailed(StepConfig),
}

/// Detailed step configuration.
///
/// `img` is mandatory but kept optional here so its absence surfaces as a
/// configuration error at step construction, not as a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepConfig {
    /// Container image reference
    pub img: Option<String>,

    /// Command override; when absent the image default runs
    pub cmd: Option<String>,

    /// Mount target for the working directory inside the container
    pub mnt: Option<String>,

    /// Extra environment variables scoped to this step
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Human-readable step name
    pub name: Option<String>,
}

/// One validated stage of a build pipeline.
///
/// Immutable after construction; addressed by `name` when present,
/// otherwise by `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildStep {
    /// Ordinal position in the configured pipeline, assigned at parse time
    pub index: usize,

    /// Optional human-readable identifier
    pub name: Option<String>,

    /// Container image reference, always carrying a tag component
    pub img: String,

    /// Command override; when absent the image default runs
    pub cmd: Option<String>,

    /// Mount target for the working directory, read-write, when present
    pub mnt: Option<String>,

    /// Extra environment variables scoped to this step
    pub env: HashMap<String, String>,
}

impl BuildStep {
    /// Build a validated step from a raw configuration entry.
    ///
    /// A detailed entry without an image reference is a configuration error.
    pub fn from_config(index: usize, raw: &RawStep) -> Result<Self> {
        match raw {
            RawStep::Image(image) => Ok(Self {
                index,
                name: None,
                img: clean_image_name(image),
                cmd: None,
                mnt: None,
                env: HashMap::new(),
            }),
            RawStep::Detailed(config) => {
                let img = config.img.as_deref().ok_or_else(|| {
                    LecternError::Config(format!(
                        "Missing image name (img) in step configuration: {:?}",
                        config
                    ))
                })?;
                Ok(Self {
                    index,
                    name: config.name.clone(),
                    img: clean_image_name(img),
                    cmd: config.cmd.clone(),
                    mnt: config.mnt.clone(),
                    env: config.env.clone(),
                })
            }
        }
    }
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.index),
        }
    }
}
