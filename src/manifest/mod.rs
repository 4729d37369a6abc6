//! Package manifest (cli.json)
//!
//! Every installed package carries a `cli.json` at its root declaring the
//! commands it provides and the language runtime it needs:
//!
//! ```json
//! {
//!   "requirements": { "go": "1.14.0" },
//!   "commands": [
//!     {
//!       "name": "purge",
//!       "aliases": ["p"],
//!       "version": "1.0.0",
//!       "description": "Purge content",
//!       "bin": "https://example.com/{{.Version}}/akamai-purge-{{.OS}}{{.Arch}}{{.BinSuffix}}"
//!     }
//!   ]
//! }
//! ```
//!
//! Manifests are read fresh on every call and never written by this program.

mod template;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AkamaiError, Result};

pub use template::{BinaryTarget, render_bin_template};

/// Manifest file name at a package root
pub const MANIFEST_FILE: &str = "cli.json";

/// Upper bound on directories visited when walking up to a package root
pub const MAX_PACKAGE_DEPTH: usize = 8;

/// A command declared by a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    /// Command name, lowercased on load
    pub name: String,

    /// Alternative names for the command
    pub aliases: Vec<String>,

    /// Command version
    pub version: String,

    /// Short description
    pub description: String,

    /// Usage line
    pub usage: String,

    /// Usage of positional arguments
    #[serde(rename = "arguments")]
    pub arguments_usage: String,

    /// URL template of a prebuilt binary (`{{.Version}}`, `{{.OS}}`, `{{.Arch}}`, `{{.BinSuffix}}`)
    #[serde(rename = "bin")]
    pub bin_template: String,

    /// Go link flags used when building this command
    #[serde(rename = "ldflags")]
    pub ld_flags: String,

    /// Whether the command supports shell auto-completion
    #[serde(rename = "auto-complete", alias = "autoComplete")]
    pub auto_complete: bool,
}

impl Command {
    /// Whether `name` refers to this command (by name or alias)
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Download URL of the prebuilt binary for `target`, if the manifest advertises one
    pub fn binary_url(&self, target: &BinaryTarget) -> Result<Option<String>> {
        if self.bin_template.trim().is_empty() {
            return Ok(None);
        }
        render_bin_template(&self.bin_template, &self.version, target).map(Some)
    }
}

/// Runtime requirements; each entry is a minimum version, `*` or empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageRequirements {
    pub go: String,
    pub php: String,
    pub node: String,
    pub ruby: String,
    pub python: String,
}

/// Parsed contents of a package's `cli.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
    pub commands: Vec<Command>,
    pub requirements: LanguageRequirements,
}

impl PackageManifest {
    /// Parse a manifest from JSON, normalizing command names
    pub fn from_json(content: &str, path: &Path) -> Result<Self> {
        let mut manifest: PackageManifest =
            serde_json::from_str(content).map_err(|e| AkamaiError::ManifestInvalid {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        for command in &mut manifest.commands {
            command.name = command.name.to_lowercase();
        }

        Ok(manifest)
    }

    /// Find a declared command by name or alias
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.answers_to(name))
    }
}

/// Path of the manifest for `dir`, checking `dir` and then its parent once.
///
/// Handles callers that pass a `bin/` subdirectory or an executable path.
pub fn locate_manifest(dir: &Path) -> Option<PathBuf> {
    let direct = dir.join(MANIFEST_FILE);
    if direct.is_file() {
        return Some(direct);
    }

    let parent = dir.parent()?.join(MANIFEST_FILE);
    parent.is_file().then_some(parent)
}

/// Read the manifest of the package containing `dir`
pub fn read_manifest(dir: &Path) -> Result<PackageManifest> {
    let path = locate_manifest(dir).ok_or_else(|| AkamaiError::ManifestNotFound {
        path: dir.display().to_string(),
    })?;

    debug!(path = %path.display(), "reading package manifest");

    let content = fs::read_to_string(&path).map_err(|e| AkamaiError::ManifestInvalid {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    PackageManifest::from_json(&content, &path)
}

/// Walk upward from `start` to the nearest directory holding a manifest.
///
/// The walk visits at most [`MAX_PACKAGE_DEPTH`] directories and never
/// climbs to or above `boundary` (the packages root) when one is given.
pub fn find_package_dir(start: &Path, boundary: Option<&Path>) -> Option<PathBuf> {
    let mut current = if start.is_file() {
        start.parent()?.to_path_buf()
    } else {
        start.to_path_buf()
    };

    for _ in 0..MAX_PACKAGE_DEPTH {
        if boundary.is_some_and(|b| current == b) {
            return None;
        }
        if current.join(MANIFEST_FILE).is_file() {
            return Some(current);
        }
        current = current.parent()?.to_path_buf();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_temp_dir;

    const MANIFEST: &str = r#"{
        "requirements": { "go": "1.14.0" },
        "commands": [
            {
                "name": "App-1-Cmd-1",
                "aliases": ["a1"],
                "version": "1.0.0",
                "description": "First command",
                "bin": "https://example.com/{{.Version}}/akamai-app-1-cmd-1-{{.OS}}{{.Arch}}{{.BinSuffix}}",
                "ldflags": "-s -w",
                "auto-complete": true
            }
        ]
    }"#;

    #[test]
    fn test_read_manifest_in_dir() {
        let temp = create_temp_dir();
        fs::write(temp.path().join(MANIFEST_FILE), MANIFEST).unwrap();

        let manifest = read_manifest(temp.path()).unwrap();
        assert_eq!(manifest.requirements.go, "1.14.0");
        assert_eq!(manifest.commands.len(), 1);

        let command = &manifest.commands[0];
        assert_eq!(command.name, "app-1-cmd-1");
        assert_eq!(command.aliases, vec!["a1"]);
        assert_eq!(command.ld_flags, "-s -w");
        assert!(command.auto_complete);
    }

    #[test]
    fn test_read_manifest_from_bin_subdir() {
        let temp = create_temp_dir();
        fs::write(temp.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();

        let manifest = read_manifest(&bin).unwrap();
        assert_eq!(manifest.commands[0].name, "app-1-cmd-1");
    }

    #[test]
    fn test_read_manifest_only_one_parent() {
        let temp = create_temp_dir();
        fs::write(temp.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let err = read_manifest(&nested).unwrap_err();
        assert!(matches!(err, AkamaiError::ManifestNotFound { .. }));
    }

    #[test]
    fn test_read_manifest_invalid() {
        let temp = create_temp_dir();
        fs::write(temp.path().join(MANIFEST_FILE), "{ not json").unwrap();

        let err = read_manifest(temp.path()).unwrap_err();
        assert!(matches!(err, AkamaiError::ManifestInvalid { .. }));
    }

    #[test]
    fn test_missing_fields_default() {
        let manifest =
            PackageManifest::from_json(r#"{"commands":[{"name":"X"}]}"#, Path::new("cli.json"))
                .unwrap();
        assert_eq!(manifest.commands[0].name, "x");
        assert!(manifest.commands[0].aliases.is_empty());
        assert_eq!(manifest.requirements, LanguageRequirements::default());
    }

    #[test]
    fn test_auto_complete_camel_case_alias() {
        let manifest = PackageManifest::from_json(
            r#"{"commands":[{"name":"x","autoComplete":true}]}"#,
            Path::new("cli.json"),
        )
        .unwrap();
        assert!(manifest.commands[0].auto_complete);
    }

    #[test]
    fn test_command_lookup_by_alias() {
        let manifest = PackageManifest::from_json(MANIFEST, Path::new("cli.json")).unwrap();
        assert!(manifest.command("A1").is_some());
        assert!(manifest.command("app-1-cmd-1").is_some());
        assert!(manifest.command("other").is_none());
    }

    #[test]
    fn test_find_package_dir_walks_up() {
        let temp = create_temp_dir();
        let package = temp.path().join("src/cli-app");
        let deep = package.join("bin/nested");
        fs::create_dir_all(&deep).unwrap();
        fs::write(package.join(MANIFEST_FILE), MANIFEST).unwrap();
        let exe = deep.join("akamai-app");
        fs::write(&exe, "").unwrap();

        let root = temp.path().join("src");
        assert_eq!(find_package_dir(&exe, Some(&root)), Some(package.clone()));
        assert_eq!(find_package_dir(&deep, None), Some(package));
    }

    #[test]
    fn test_find_package_dir_stops_at_boundary() {
        let temp = create_temp_dir();
        let root = temp.path().join("src");
        let stray = root.join("stray/bin");
        fs::create_dir_all(&stray).unwrap();
        // a manifest above the boundary must not be picked up
        fs::write(temp.path().join(MANIFEST_FILE), MANIFEST).unwrap();

        assert_eq!(find_package_dir(&stray, Some(&root)), None);
    }

    #[test]
    fn test_find_package_dir_depth_bound() {
        let temp = create_temp_dir();
        fs::write(temp.path().join(MANIFEST_FILE), MANIFEST).unwrap();
        let mut deep = temp.path().to_path_buf();
        for i in 0..=MAX_PACKAGE_DEPTH {
            deep = deep.join(format!("d{i}"));
        }
        fs::create_dir_all(&deep).unwrap();

        assert_eq!(find_package_dir(&deep, None), None);
    }
}
