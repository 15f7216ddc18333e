//! Requirements configuration.
//!
//! Templates see the cluster requirements (`jx-requirements.yml`) as the
//! `Requirements` variable. The file is loaded at most once per run; a failed
//! load is not remembered, so the next evaluation tries again.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::constants::REQUIREMENTS_FILE;
use crate::error::{ConfigError, Result};

/// Structured requirements data.
pub type Requirements = Map<String, Value>;

/// Loads requirements from a directory.
pub trait RequirementsLoader {
    /// # Errors
    ///
    /// Returns `ConfigError::Requirements` if the data cannot be loaded.
    fn load(&self, dir: &Path) -> Result<Requirements>;
}

/// Reads `jx-requirements.yml` from the directory.
///
/// A document with a top-level `spec` mapping contributes only that mapping.
/// A missing file yields empty requirements.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRequirementsLoader;

impl RequirementsLoader for FileRequirementsLoader {
    fn load(&self, dir: &Path) -> Result<Requirements> {
        let path = dir.join(REQUIREMENTS_FILE);
        debug!(path = %path.display(), "loading requirements");

        let failed = |reason: String| ConfigError::Requirements {
            dir: dir.display().to_string(),
            reason,
        };

        if !path.exists() {
            debug!("no requirements file, using empty requirements");
            return Ok(Requirements::new());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| failed(e.to_string()))?;
        let doc: Value = serde_yaml::from_str(&contents).map_err(|e| failed(e.to_string()))?;

        match doc {
            Value::Null => Ok(Requirements::new()),
            Value::Object(mut map) => match map.remove("spec") {
                Some(Value::Object(spec)) => Ok(spec),
                Some(other) => {
                    map.insert("spec".to_string(), other);
                    Ok(map)
                }
                None => Ok(map),
            },
            _ => Err(failed("expected a mapping at the top level".to_string()).into()),
        }
    }
}

/// Load-once cache for requirements.
pub struct RequirementsCache {
    loader: Box<dyn RequirementsLoader>,
    dir: PathBuf,
    loaded: Option<Requirements>,
}

impl RequirementsCache {
    /// Cache requirements loaded by `loader` from `dir`.
    pub fn new(loader: Box<dyn RequirementsLoader>, dir: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            dir: dir.into(),
            loaded: None,
        }
    }

    /// Cache pre-built requirements; the loader is never consulted.
    pub fn preloaded(requirements: Requirements) -> Self {
        Self {
            loader: Box::new(FileRequirementsLoader),
            dir: PathBuf::new(),
            loaded: Some(with_storage(requirements)),
        }
    }

    /// Requirements, loading them on first use.
    ///
    /// A `storage` entry is always present (empty when not configured).
    ///
    /// # Errors
    ///
    /// Returns the loader's error; nothing is cached in that case.
    pub fn get(&mut self) -> Result<&Requirements> {
        let requirements = match self.loaded.take() {
            Some(requirements) => requirements,
            None => with_storage(self.loader.load(&self.dir)?),
        };
        Ok(self.loaded.insert(requirements))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }
}

fn with_storage(mut requirements: Requirements) -> Requirements {
    let missing = matches!(requirements.get("storage"), None | Some(Value::Null));
    if missing {
        requirements.insert("storage".to_string(), Value::Object(Map::new()));
    }
    requirements
}

impl std::fmt::Debug for RequirementsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequirementsCache")
            .field("dir", &self.dir)
            .field("loaded", &self.loaded.is_some())
            .finish()
    }
}
