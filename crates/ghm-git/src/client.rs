//! Git client that wraps the git command-line tool.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::instrument;

use crate::errors::GatewayError;
use crate::runner::{Invocation, ProcessRunner, execute};

/// Runs `git` commands inside one working tree.
#[derive(Clone)]
pub struct GitClient {
    git_path: PathBuf,
    repo_dir: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl fmt::Debug for GitClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitClient")
            .field("git_path", &self.git_path)
            .field("repo_dir", &self.repo_dir)
            .finish_non_exhaustive()
    }
}

impl GitClient {
    /// Create a client for the working tree at `repo_dir`, resolving `git` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] if git is not installed.
    pub fn new(repo_dir: impl Into<PathBuf>, runner: Arc<dyn ProcessRunner>) -> Result<Self, GatewayError> {
        let git_path = which::which("git").map_err(|_| GatewayError::NotFound("git".to_string()))?;
        Ok(Self::with_path(git_path, repo_dir, runner))
    }

    /// Create a client with an explicit git path.
    pub fn with_path(
        git_path: impl Into<PathBuf>,
        repo_dir: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            git_path: git_path.into(),
            repo_dir: repo_dir.into(),
            runner,
        }
    }

    /// The working tree commands run in.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    #[instrument(skip(self), fields(repo_dir = %self.repo_dir.display()))]
    async fn run(&self, args: &[&str]) -> Result<String, GatewayError> {
        let inv = Invocation::new(&self.git_path)
            .args(args.iter().copied())
            .current_dir(&self.repo_dir);
        execute(self.runner.as_ref(), &inv).await
    }

    /// Stage a path relative to the working tree.
    ///
    /// # Errors
    ///
    /// Returns an error if `git add` fails.
    pub async fn add(&self, path: &Path) -> Result<(), GatewayError> {
        let path = path.to_string_lossy();
        self.run(&["add", path.as_ref()]).await?;
        Ok(())
    }

    /// Commit staged changes.
    ///
    /// # Errors
    ///
    /// Returns an error if `git commit` fails, including when nothing is staged.
    pub async fn commit(&self, message: &str) -> Result<(), GatewayError> {
        self.run(&["commit", "-m", message]).await?;
        Ok(())
    }

    /// Push the current branch to its upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if `git push` fails.
    pub async fn push(&self) -> Result<(), GatewayError> {
        self.run(&["push"]).await?;
        Ok(())
    }
}
