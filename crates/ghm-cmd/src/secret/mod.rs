//! Secret commands (`ghm secret`).
//!
//! Manage repository secrets and the local secrets cache.

pub mod add;
pub mod list;
pub mod remove;

use clap::Subcommand;

/// Manage GitHub secrets.
#[derive(Debug, Subcommand)]
pub enum SecretCommand {
    /// Add a new secret to a repository.
    Add(add::AddArgs),
    /// Remove a secret from a repository.
    Remove(remove::RemoveArgs),
    /// List secrets stored locally.
    #[command(alias = "ls")]
    List(list::ListArgs),
}

impl SecretCommand {
    /// Run the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the subcommand fails.
    pub async fn run(&self, factory: &crate::factory::Factory) -> anyhow::Result<()> {
        match self {
            Self::Add(args) => args.run(factory).await,
            Self::Remove(args) => args.run(factory).await,
            Self::List(args) => args.run(factory),
        }
    }
}
