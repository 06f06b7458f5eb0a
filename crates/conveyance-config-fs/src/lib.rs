// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for Conveyance tools (uses platform config dir).

use conveyance_core::{ConfigError, ConfigStore};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Store configs as `<key>.json` files under one directory.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at the user config directory (e.g., `~/.config/Conveyance`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "Conveyance")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::in_dir(proj.config_dir())
    }

    /// Create a store rooted at `dir`, creating it if needed.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = dir.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Directory holding the config files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// File that backs `key`.
    ///
    /// Keys are logical names, not paths; separators and `..` are rejected.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, ConfigError> {
        if key.is_empty() || key == ".." || key.contains(['/', '\\']) {
            return Err(ConfigError::Other(format!("invalid config key {key:?}")));
        }
        Ok(self.base.join(format!("{key}.json")))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), "loaded config");
                Ok(bytes)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        debug!(path = %path.display(), bytes = data.len(), "saved config");
        Ok(())
    }
}
