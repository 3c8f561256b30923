//! Workflow commands (`ghm workflow`).
//!
//! Publish GitHub Actions workflow files to a repository.

pub mod add;
pub mod list;

use clap::Subcommand;

/// Manage GitHub Actions workflows.
#[derive(Debug, Subcommand)]
pub enum WorkflowCommand {
    /// Add a workflow file to a repository.
    Add(add::AddArgs),
    /// List workflows published from this machine.
    #[command(alias = "ls")]
    List(list::ListArgs),
}

impl WorkflowCommand {
    /// Run the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the subcommand fails.
    pub async fn run(&self, factory: &crate::factory::Factory) -> anyhow::Result<()> {
        match self {
            Self::Add(args) => args.run(factory).await,
            Self::List(args) => args.run(factory),
        }
    }
}
