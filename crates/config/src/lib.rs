//! Configuration loading and persistence.
//!
//! Settings live in a single JSON file (`config.json`) under the
//! user-specific configuration directory. The wire format keeps the
//! `Roots` / `DataDir` key names so existing config files keep working.
//!
//! The root list doubles as the set of watched directories: ordered,
//! append-preserving, and mutated only through [`Settings::add_root`] /
//! [`Settings::remove_root`]. Removal is by path, never by position;
//! positional deletion is a race waiting to happen when something else is
//! appending concurrently.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Format, Json, Serialized};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";
const CATALOG_FILE: &str = "tana.db";

/// Persisted application settings.
///
/// Mutations take effect in memory first and are then written back; if the
/// write fails ([`ErrorKind::Persist`]) the in-memory state remains the
/// source of truth and the save can be retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Where this settings instance was loaded from (and saves back to).
    #[serde(skip)]
    path: PathBuf,
    /// Watched roots, in presentation order.
    #[serde(rename = "Roots")]
    roots: Vec<PathBuf>,
    /// Directory holding the catalog database.
    #[serde(rename = "DataDir")]
    data_dir: PathBuf,
}

impl Settings {
    /// Load settings from the user's configuration directory, creating the
    /// directory and a default config file on first run.
    pub fn load() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "tana").ok_or_raise(|| ErrorKind::Locate)?;
        Self::load_from(dirs.config_dir())
    }

    /// Load settings from an explicit directory.
    ///
    /// Missing pieces fall back to defaults: an absent file yields an empty
    /// root list with `data_dir` pointing at the configuration directory
    /// itself, and a file with only some keys inherits defaults for the rest.
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).or_raise(|| ErrorKind::Create(dir.to_path_buf()))?;
        let path = dir.join(CONFIG_FILE);
        let defaults =
            Self { path: path.clone(), roots: Vec::new(), data_dir: dir.to_path_buf() };
        if !path.exists() {
            // First run: persist the defaults so the file exists for
            // hand-editing. Failure here is fatal; a config location that
            // can't be written won't fare better later.
            defaults.save()?;
            info!(path = %path.display(), "created default configuration");
            return Ok(defaults);
        }
        let mut settings: Self = Figment::from(Serialized::defaults(defaults))
            .merge(Json::file(&path))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        // `serde(skip)` drops the path during extraction.
        settings.path = path;
        Ok(settings)
    }

    /// Write the current settings back to disk.
    pub fn save(&self) -> Result<()> {
        let data = serde_json::to_vec_pretty(self).or_raise(|| ErrorKind::Persist(self.path.clone()))?;
        fs::write(&self.path, data).or_raise(|| ErrorKind::Persist(self.path.clone()))?;
        debug!(path = %self.path.display(), roots = self.roots.len(), "settings saved");
        Ok(())
    }

    /// Watched roots in registration order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Directory holding the catalog database.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the catalog database file.
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE)
    }

    /// Register a root for scanning, preserving registration order.
    ///
    /// Returns `false` (without saving) when the root is already watched.
    pub fn add_root(&mut self, root: impl Into<PathBuf>) -> Result<bool> {
        let root = root.into();
        if self.roots.contains(&root) {
            return Ok(false);
        }
        self.roots.push(root);
        self.save()?;
        Ok(true)
    }

    /// Unregister a root by path.
    ///
    /// Identification is by the path itself rather than its position in the
    /// list, so concurrent additions can't shift which root gets removed.
    pub fn remove_root(&mut self, root: impl AsRef<Path>) -> Result<()> {
        let root = root.as_ref();
        let index = self
            .roots
            .iter()
            .position(|r| r == root)
            .ok_or_raise(|| ErrorKind::UnknownRoot(root.to_path_buf()))?;
        self.roots.remove(index);
        self.save()?;
        Ok(())
    }
}
