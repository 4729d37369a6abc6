//! Persisted CLI configuration
//!
//! Values live in `<cli home>/.akamai-cli/config.yaml` as a two-level
//! `section → key → value` map:
//!
//! ```yaml
//! cli:
//!   last-upgrade-check: "2024-05-01T10:00:00+00:00"
//! ```
//!
//! The core only talks to configuration through [`ConfigStore`], so tests
//! and embedders can substitute an in-memory store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AkamaiError, Result};

/// Section holding the CLI's own settings
pub const CLI_SECTION: &str = "cli";

/// Key recording the last self-upgrade check (`ignore`, `never` or RFC 3339)
pub const LAST_UPGRADE_CHECK: &str = "last-upgrade-check";

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Read/write access to configuration values
pub trait ConfigStore {
    /// Value of `section.key`, if set
    fn get(&self, section: &str, key: &str) -> Option<String>;

    /// Set `section.key` in memory
    fn set(&mut self, section: &str, key: &str, value: &str);

    /// Remove `section.key` in memory
    fn unset(&mut self, section: &str, key: &str);

    /// All values as `(section.key, value)` pairs, sorted
    fn entries(&self) -> Vec<(String, String)>;

    /// Persist pending changes
    fn save(&self) -> Result<()>;
}

/// Split a `section.key` argument
pub fn split_key(full_key: &str) -> Result<(&str, &str)> {
    match full_key.split_once('.') {
        Some((section, key)) if !section.is_empty() && !key.is_empty() => Ok((section, key)),
        _ => Err(AkamaiError::ConfigInvalidKey {
            key: full_key.to_string(),
        }),
    }
}

/// YAML file backed configuration
#[derive(Debug, Clone)]
pub struct FileConfig {
    path: PathBuf,
    sections: Sections,
}

impl FileConfig {
    /// Load configuration from `path`; a missing file yields an empty store
    pub fn load(path: &Path) -> Result<Self> {
        let sections = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| AkamaiError::ConfigReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            if content.trim().is_empty() {
                Sections::new()
            } else {
                serde_yaml::from_str(&content).map_err(|e| AkamaiError::ConfigReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
        } else {
            Sections::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            sections,
        })
    }
}

impl ConfigStore for FileConfig {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn unset(&mut self, section: &str, key: &str) {
        if let Some(values) = self.sections.get_mut(section) {
            values.remove(key);
            if values.is_empty() {
                self.sections.remove(section);
            }
        }
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.sections
            .iter()
            .flat_map(|(section, values)| {
                values
                    .iter()
                    .map(move |(key, value)| (format!("{section}.{key}"), value.clone()))
            })
            .collect()
    }

    fn save(&self) -> Result<()> {
        let write_err = |reason: String| AkamaiError::ConfigWriteFailed {
            path: self.path.display().to_string(),
            reason,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let yaml = serde_yaml::to_string(&self.sections).map_err(|e| write_err(e.to_string()))?;
        fs::write(&self.path, yaml).map_err(|e| write_err(e.to_string()))
    }
}
