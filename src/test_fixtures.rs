//! Test doubles and setup helpers shared by unit tests.
//!
//! ```ignore
//! use crate::test_fixtures::{ScriptedExecutor, create_temp_dir};
//!
//! let temp = create_temp_dir();
//! let executor = ScriptedExecutor::new()
//!     .with_tool("go", "/usr/local/go/bin/go")
//!     .respond("go version", ExecOutput::ok("go version go1.15.0 linux/amd64\n"));
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use git2::{Repository, Signature};
use tempfile::TempDir;

use crate::config::ConfigStore;
use crate::error::{AkamaiError, Result};
use crate::exec::{ExecOutput, Executor, ToolCommand};
use crate::http::Fetcher;
use crate::terminal::Terminal;

/// Create a temp directory that is never under the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(scratch_root()).expect("Failed to create temp directory")
}

/// `TMPDIR=tmp` makes the system temp dir relative to the working directory
fn scratch_root() -> PathBuf {
    let dir = std::env::temp_dir();
    if dir.is_absolute() {
        dir
    } else if cfg!(windows) {
        PathBuf::from(r"C:\Windows\Temp")
    } else {
        PathBuf::from("/tmp")
    }
}

impl ExecOutput {
    /// Successful run printing `stdout`
    pub fn ok(stdout: &str) -> Self {
        Self {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }
}

/// Executor answering from a script instead of spawning processes.
///
/// Tools registered with [`with_tool`](Self::with_tool) are "on PATH".
/// A run is matched against scripted patterns in registration order by
/// substring of [`ToolCommand::display`]; unmatched runs succeed with no
/// output. File checks hit the real file system.
#[derive(Default)]
pub struct ScriptedExecutor {
    tools: HashMap<String, PathBuf>,
    responses: Vec<(String, ExecOutput)>,
    commands: RefCell<Vec<ToolCommand>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tool(mut self, name: &str, path: &str) -> Self {
        self.tools.insert(name.to_string(), PathBuf::from(path));
        self
    }

    #[must_use]
    pub fn respond(mut self, pattern: &str, output: ExecOutput) -> Self {
        self.responses.push((pattern.to_string(), output));
        self
    }

    #[must_use]
    pub fn fail(self, pattern: &str, stderr: &str) -> Self {
        self.respond(
            pattern,
            ExecOutput {
                success: false,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        )
    }

    /// Command lines run so far
    pub fn calls(&self) -> Vec<String> {
        self.commands.borrow().iter().map(ToolCommand::display).collect()
    }

    /// Full commands run so far
    pub fn commands(&self) -> Vec<ToolCommand> {
        self.commands.borrow().clone()
    }
}

impl Executor for ScriptedExecutor {
    fn look_path(&self, name: &str) -> Option<PathBuf> {
        self.tools.get(name).cloned()
    }

    fn run(&self, command: &ToolCommand) -> Result<ExecOutput> {
        self.commands.borrow_mut().push(command.clone());
        let line = command.display();
        Ok(self
            .responses
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| ExecOutput::ok("")))
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Terminal recording output and answering prompts from a queue
#[derive(Default)]
pub struct ScriptedTerminal {
    lines: RefCell<Vec<String>>,
    warnings: RefCell<Vec<String>>,
    prompts: RefCell<Vec<String>>,
    answers: RefCell<VecDeque<bool>>,
}

impl ScriptedTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue answers for upcoming confirmations; once drained the prompt default is used
    #[must_use]
    pub fn answering(self, answers: &[bool]) -> Self {
        self.answers.borrow_mut().extend(answers.iter().copied());
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    /// Whether any printed line contains `needle`
    pub fn printed(&self, needle: &str) -> bool {
        self.lines
            .borrow()
            .iter()
            .chain(self.warnings.borrow().iter())
            .any(|line| line.contains(needle))
    }
}

impl Terminal for ScriptedTerminal {
    fn writeln(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(default))
    }

    fn spinner_start(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }

    fn spinner_ok(&self) {}

    fn spinner_fail(&self) {}
}

/// Configuration that never touches disk
#[derive(Debug, Default, Clone)]
pub struct MemoryConfig {
    values: BTreeMap<(String, String), String>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, section: &str, key: &str, value: &str) -> Self {
        self.set(section, key, value);
        self
    }
}

impl ConfigStore for MemoryConfig {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) {
        self.values
            .insert((section.to_string(), key.to_string()), value.to_string());
    }

    fn unset(&mut self, section: &str, key: &str) {
        self.values.remove(&(section.to_string(), key.to_string()));
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|((section, key), value)| (format!("{section}.{key}"), value.clone()))
            .collect()
    }

    fn save(&self) -> Result<()> {
        Ok(())
    }
}

/// Fetcher serving canned bodies and redirects
#[derive(Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, Vec<u8>>,
    redirects: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn serve(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), body.into());
        self
    }

    #[must_use]
    pub fn redirect(mut self, url: &str, location: &str) -> Self {
        self.redirects.insert(url.to_string(), location.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for StaticFetcher {
    fn redirect_location(&self, url: &str) -> Result<Option<String>> {
        self.requests.borrow_mut().push(format!("HEAD {url}"));
        Ok(self.redirects.get(url).cloned())
    }

    fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(format!("GET {url}"));
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| AkamaiError::HttpFailed {
                url: url.to_string(),
                reason: "unexpected status 404 Not Found".to_string(),
            })
    }
}

/// Write `files` into `dir`, creating parent directories
pub fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
    }
}

/// Create an upstream git repository at `<temp>/<name>` holding `files` in one commit.
///
/// Returns the temp dir guard and the repository path.
pub fn create_upstream_repo(name: &str, files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let temp = create_temp_dir();
    let path = temp.path().join(name);
    std::fs::create_dir_all(&path).expect("Failed to create repository dir");
    Repository::init(&path).expect("Failed to init git repository");
    commit_files(&path, files, "initial");
    (temp, path)
}

/// Commit `files` on top of the current HEAD of the repository at `repo_path`
pub fn commit_files(repo_path: &Path, files: &[(&str, &str)], message: &str) -> String {
    write_files(repo_path, files);

    let repo = Repository::open(repo_path).expect("Failed to open repository");
    let mut index = repo.index().expect("Failed to get index");
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .expect("Failed to stage files");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let signature = Signature::now("Test", "test@example.com").expect("Failed to build signature");

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .expect("Failed to commit")
        .to_string()
}

/// `file://` URL for a local path
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
