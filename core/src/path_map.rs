//! Host path translation.
//!
//! When the orchestrator itself runs inside a container (e.g. a CI runner),
//! the paths it sees differ from the paths the host's container runtime must
//! use to bind-mount the same data. A directory mapping of
//! {process-side prefix → host-side prefix} bridges that gap.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Rewrite `path` by substituting the longest matching configured prefix
/// with its host-side counterpart.
///
/// Prefixes match component-wise, so `/host/da` never matches
/// `/host/data/file`. A path with no matching prefix, or an empty mapping,
/// passes through unchanged.
pub fn get_host_path(path: &Path, mapping: &HashMap<String, String>) -> PathBuf {
    let mut best: Option<(usize, &str, &Path)> = None;
    for (from, to) in mapping {
        if let Ok(rest) = path.strip_prefix(from) {
            if best.map_or(true, |(len, _, _)| from.len() > len) {
                best = Some((from.len(), to, rest));
            }
        }
    }
    match best {
        Some((_, to, rest)) => Path::new(to).join(rest),
        None => path.to_path_buf(),
    }
}
