//! `ghm secret remove` command.

use anyhow::Result;
use clap::Args;

use crate::bootstrap;
use crate::factory::Factory;
use crate::input;
use crate::strategy::{CachePolicy, RemoveSecretParams, Strategy, dispatch};

/// Remove a secret from a repository.
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Repository (OWNER/REPO).
    #[arg(short = 'R', long)]
    repo: Option<String>,

    /// Name of the secret.
    #[arg(short = 'n', long, alias = "secret_name")]
    secret_name: Option<String>,

    /// Whether the local cache is updated when the remote call fails.
    #[arg(long, value_enum)]
    cache_policy: Option<CachePolicy>,
}

impl RemoveArgs {
    /// Run the secret remove command.
    ///
    /// # Errors
    ///
    /// Returns an error if input is missing, credentials are unavailable, or
    /// the secret cannot be removed.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        let repo = input::repo(factory, self.repo.as_deref())?;
        let name = input::text(
            factory,
            "--secret-name",
            self.secret_name.as_deref(),
            "Secret name",
        )?;

        let config = bootstrap::ensure_config(factory).await?;
        let token = bootstrap::token(&config)?;

        dispatch(
            factory,
            Strategy::RemoveSecret(RemoveSecretParams {
                repo,
                name,
                token,
                cache_policy: CachePolicy::resolve(self.cache_policy, &config),
            }),
        )
        .await
    }
}
