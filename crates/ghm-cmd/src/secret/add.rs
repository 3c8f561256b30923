//! `ghm secret add` command.

use anyhow::Result;
use clap::Args;
use secrecy::SecretString;

use crate::bootstrap;
use crate::factory::Factory;
use crate::input;
use crate::strategy::{AddSecretParams, CachePolicy, Strategy, dispatch};

/// Add a new secret to a repository.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Repository (OWNER/REPO).
    #[arg(short = 'R', long)]
    repo: Option<String>,

    /// Name of the secret.
    #[arg(short = 'n', long, alias = "secret_name")]
    secret_name: Option<String>,

    /// Value of the secret (prompted with confirmation if omitted).
    #[arg(long, alias = "secret_value", value_parser = input::parse_secret)]
    secret_value: Option<SecretString>,

    /// Whether the local cache is updated when the remote call fails.
    #[arg(long, value_enum)]
    cache_policy: Option<CachePolicy>,
}

impl AddArgs {
    /// Run the secret add command.
    ///
    /// # Errors
    ///
    /// Returns an error if input is missing, credentials are unavailable, or
    /// the secret cannot be set.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        let repo = input::repo(factory, self.repo.as_deref())?;
        let name = input::text(
            factory,
            "--secret-name",
            self.secret_name.as_deref(),
            "Secret name",
        )?;
        let value = input::secret(
            factory,
            "--secret-value",
            self.secret_value.as_ref(),
            "Secret value",
        )?;

        let config = bootstrap::ensure_config(factory).await?;
        let token = bootstrap::token(&config)?;

        dispatch(
            factory,
            Strategy::AddSecret(AddSecretParams {
                repo,
                name,
                value,
                token,
                cache_policy: CachePolicy::resolve(self.cache_policy, &config),
            }),
        )
        .await
    }
}
