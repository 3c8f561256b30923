//! Factory for shared command dependencies.
//!
//! Provides the state store, process runner, `gh`/`git` clients and
//! prompter to commands and strategies. Supports test mode with dependency
//! injection for isolated testing.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use ghm_core::iostreams::{IOStreams, TestOutput};
use ghm_core::prompter::{DialoguerPrompter, Prompter, StubPrompter};
use ghm_core::state::{Documents, FileStateStore, MemoryStateStore, StateStore};
use ghm_git::client::GitClient;
use ghm_git::gh::GhClient;
use ghm_git::runner::{ProcessRunner, StubRunner, SystemRunner};

/// Environment variable that disables interactive prompts.
pub const PROMPT_DISABLED_ENV: &str = "GHM_PROMPT_DISABLED";

/// Shared factory providing dependencies to all commands.
///
/// In production mode, dependencies are created from the real system.
/// In test mode, dependencies can be injected for isolated testing.
pub struct Factory {
    /// Application version.
    pub app_version: String,
    /// I/O streams.
    pub io: IOStreams,
    /// Directory holding the state documents.
    state_dir: PathBuf,
    /// Directory repositories are cloned into.
    work_dir: PathBuf,
    store: Arc<dyn StateStore>,
    runner: Arc<dyn ProcessRunner>,
    /// `gh` client (lazily resolved).
    gh_client: OnceLock<GhClient>,

    // Test overrides
    gh_path_override: Option<PathBuf>,
    git_path_override: Option<PathBuf>,
    prompter_stub: Option<Arc<StubPrompter>>,
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("app_version", &self.app_version)
            .field("state_dir", &self.state_dir)
            .field("work_dir", &self.work_dir)
            .finish_non_exhaustive()
    }
}

impl Factory {
    /// Create a new factory storing state in `state_dir` (default: the
    /// current directory).
    pub fn new(app_version: String, state_dir: Option<PathBuf>) -> Self {
        let mut io = IOStreams::system();

        if std::env::var_os(PROMPT_DISABLED_ENV).is_some() {
            io.set_never_prompt(true);
        }

        let state_dir = state_dir.unwrap_or_default();
        Self {
            app_version,
            io,
            store: Arc::new(FileStateStore::new(&state_dir)),
            state_dir,
            work_dir: PathBuf::from("."),
            runner: Arc::new(SystemRunner),
            gh_client: OnceLock::new(),
            gh_path_override: None,
            git_path_override: None,
            prompter_stub: None,
        }
    }

    /// Create a test factory with captured I/O, an in-memory state store and
    /// a recording process runner.
    ///
    /// Returns the factory and a `TestOutput` for reading captured
    /// stdout/stderr.
    pub fn test() -> (Self, TestOutput) {
        let (io, output) = IOStreams::test_with_output();

        let factory = Self {
            app_version: "test".to_string(),
            io,
            state_dir: PathBuf::new(),
            work_dir: PathBuf::from("."),
            store: Arc::new(MemoryStateStore::new()),
            runner: Arc::new(StubRunner::new()),
            gh_client: OnceLock::new(),
            gh_path_override: Some(PathBuf::from("gh")),
            git_path_override: Some(PathBuf::from("git")),
            prompter_stub: None,
        };

        (factory, output)
    }

    /// Set the state store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = store;
        self
    }

    /// Set the process runner used by the `gh` and `git` clients.
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self.gh_client = OnceLock::new();
        self
    }

    /// Set the directory repositories are cloned into.
    #[must_use]
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Set a stub prompter and return the shared reference for configuration.
    pub fn with_stub_prompter(mut self) -> (Self, Arc<StubPrompter>) {
        let stub = Arc::new(StubPrompter::default());
        self.prompter_stub = Some(stub.clone());
        (self, stub)
    }

    /// Directory holding the state documents.
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Directory repositories are cloned into.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Access the state documents.
    pub fn documents(&self) -> Documents<'_> {
        Documents::new(self.store.as_ref(), &self.io)
    }

    /// Get the `gh` client.
    ///
    /// # Errors
    ///
    /// Returns an error if `gh` is not installed.
    pub fn gh_client(&self) -> anyhow::Result<&GhClient> {
        if let Some(client) = self.gh_client.get() {
            return Ok(client);
        }
        let client = match self.gh_path_override {
            Some(ref path) => GhClient::with_path(path, self.runner.clone()),
            None => GhClient::new(self.runner.clone())?,
        };
        let _ = self.gh_client.set(client);
        self.gh_client
            .get()
            .ok_or_else(|| anyhow::anyhow!("failed to initialize gh client"))
    }

    /// Create a git client for the working tree at `repo_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if git is not installed.
    pub fn git_client(&self, repo_dir: &Path) -> anyhow::Result<GitClient> {
        Ok(match self.git_path_override {
            Some(ref path) => GitClient::with_path(path, repo_dir, self.runner.clone()),
            None => GitClient::new(repo_dir, self.runner.clone())?,
        })
    }

    /// Create a prompter instance.
    ///
    /// In test mode with a stub prompter, returns the stub.
    pub fn prompter(&self) -> Box<dyn Prompter> {
        if let Some(ref stub) = self.prompter_stub {
            return Box::new(StubPrompterWrapper(stub.clone()));
        }
        Box::new(DialoguerPrompter::new())
    }
}

/// Wrapper to use `Arc<StubPrompter>` as `Box<dyn Prompter>`.
#[derive(Debug)]
struct StubPrompterWrapper(Arc<StubPrompter>);

impl Prompter for StubPrompterWrapper {
    fn input(&self, prompt: &str, default: &str) -> anyhow::Result<String> {
        self.0.input(prompt, default)
    }

    fn line(&self) -> anyhow::Result<String> {
        self.0.line()
    }

    fn password(&self, prompt: &str) -> anyhow::Result<String> {
        self.0.password(prompt)
    }

    fn password_with_confirmation(
        &self,
        prompt: &str,
        confirm_prompt: &str,
    ) -> anyhow::Result<String> {
        self.0.password_with_confirmation(prompt, confirm_prompt)
    }
}
