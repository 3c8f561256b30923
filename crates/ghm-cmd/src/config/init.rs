//! `ghm config init` command.

use anyhow::Result;
use clap::Args;

use crate::bootstrap;
use crate::factory::Factory;

/// Initialize or reconfigure GitHub credentials.
#[derive(Debug, Args)]
pub struct InitArgs {}

impl InitArgs {
    /// Run the config init command.
    ///
    /// # Errors
    ///
    /// Returns an error if prompting is impossible or the values cannot be
    /// saved.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        bootstrap::initialize_config(factory).await
    }
}
