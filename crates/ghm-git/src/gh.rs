//! Client for the `gh` command-line tool.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ghm_core::repo::Repo;
use secrecy::{ExposeSecret, SecretString};

use crate::errors::GatewayError;
use crate::runner::{Invocation, ProcessRunner, execute};

/// Environment variable `gh` reads its access token from.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Builds and runs `gh` invocations.
#[derive(Clone)]
pub struct GhClient {
    gh_path: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl fmt::Debug for GhClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhClient")
            .field("gh_path", &self.gh_path)
            .finish_non_exhaustive()
    }
}

impl GhClient {
    /// Create a client resolving `gh` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`] if `gh` is not installed.
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Result<Self, GatewayError> {
        let gh_path = which::which("gh").map_err(|_| GatewayError::NotFound("gh".to_string()))?;
        Ok(Self { gh_path, runner })
    }

    /// Create a client using an explicit `gh` path.
    pub fn with_path(gh_path: impl Into<PathBuf>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            gh_path: gh_path.into(),
            runner,
        }
    }

    /// Path of the `gh` binary.
    pub fn gh_path(&self) -> &Path {
        &self.gh_path
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(&self.gh_path)
    }

    /// Set a repository secret.
    ///
    /// # Errors
    ///
    /// Returns an error if `gh secret set` fails.
    pub async fn set_secret(
        &self,
        repo: &Repo,
        name: &str,
        value: &SecretString,
        token: &SecretString,
    ) -> Result<(), GatewayError> {
        let inv = self
            .invocation()
            .args(["secret", "set", name, "--repo"])
            .arg(repo.to_string())
            .args(["--body", value.expose_secret()])
            .env(TOKEN_ENV, token.expose_secret());
        execute(self.runner.as_ref(), &inv).await?;
        Ok(())
    }

    /// Remove a repository secret without asking for confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if `gh secret remove` fails.
    pub async fn remove_secret(
        &self,
        repo: &Repo,
        name: &str,
        token: &SecretString,
    ) -> Result<(), GatewayError> {
        let inv = self
            .invocation()
            .args(["secret", "remove", name, "--repo"])
            .arg(repo.to_string())
            .arg("-y")
            .env(TOKEN_ENV, token.expose_secret());
        execute(self.runner.as_ref(), &inv).await?;
        Ok(())
    }

    /// Clone a repository into `parent_dir`, returning the clone directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `gh repo clone` fails.
    pub async fn clone_repo(&self, repo: &Repo, parent_dir: &Path) -> Result<PathBuf, GatewayError> {
        let inv = self
            .invocation()
            .args(["repo", "clone"])
            .arg(repo.to_string())
            .current_dir(parent_dir);
        execute(self.runner.as_ref(), &inv).await?;
        Ok(parent_dir.join(repo.clone_dir_name()))
    }
}
