//! Common test utilities for Akamai CLI integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use git2::{Repository, Signature};
use tempfile::TempDir;

/// An isolated `AKAMAI_CLI_HOME`
pub struct TestHome {
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestHome {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// `akamai` bound to this home. Stdin is not a terminal, so no upgrade check runs.
    #[allow(deprecated)]
    pub fn akamai(&self) -> Command {
        let mut cmd = Command::cargo_bin("akamai").expect("binary is built");
        cmd.env("AKAMAI_CLI_HOME", &self.path);
        cmd.env_remove("CLI_REPOSITORY");
        cmd.env_remove("AKAMAI_LOG");
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.path.join(".akamai-cli").join("src")
    }

    pub fn config_file(&self) -> PathBuf {
        self.path.join(".akamai-cli").join("config.yaml")
    }
}

/// A git repository with one commit of `files`, inside its own temp dir
pub struct UpstreamRepo {
    pub temp: TempDir,
    pub path: PathBuf,
}

impl UpstreamRepo {
    pub fn new(name: &str, files: &[(&str, &str)]) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join(name);
        Repository::init(&path).expect("Failed to init repository");
        let repo = Self { temp, path };
        repo.commit(files, "Initial commit");
        repo
    }

    /// Write `files` and commit them. Files named `akamai-*` are made executable.
    pub fn commit(&self, files: &[(&str, &str)], message: &str) {
        let repo = Repository::open(&self.path).expect("Failed to open repository");
        for (name, content) in files {
            let file = self.path.join(name);
            if let Some(parent) = file.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent directory");
            }
            std::fs::write(&file, content).expect("Failed to write file");
            make_executable_if_command(&file);
        }

        let mut index = repo.index().expect("Failed to get index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_id).expect("Failed to find tree");
        let signature = Signature::now("Test", "test@example.com").expect("signature");

        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().expect("head commit")],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)
            .expect("Failed to commit");
    }

    pub fn url(&self) -> String {
        file_url(&self.path)
    }
}

#[cfg(unix)]
fn make_executable_if_command(file: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let is_command = file
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("akamai-"));
    if is_command {
        std::fs::set_permissions(file, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to set permissions");
    }
}

#[cfg(not(unix))]
fn make_executable_if_command(_file: &Path) {}

pub fn file_url(path: &Path) -> String {
    let path = path.display().to_string().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

/// Manifest of a package with one runtime-less command
pub const ECHO_MANIFEST: &str = r#"{
    "commands": [
        {"name": "echo", "version": "0.1.0", "aliases": ["ec"], "description": "Echo arguments"}
    ]
}"#;

/// Prints its arguments and the variables the CLI sets for child commands
pub const ECHO_SCRIPT: &str = "#!/bin/sh\n\
echo \"args:$*\"\n\
echo \"cli:$AKAMAI_CLI command:$AKAMAI_CLI_COMMAND version:$AKAMAI_CLI_COMMAND_VERSION\"\n\
exit ${ECHO_EXIT:-0}\n";
