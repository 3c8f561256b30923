//! Configuration commands (`ghm config`).
//!
//! Store and list configuration values, and set up credentials.

pub mod init;
pub mod list;
pub mod store;

use clap::Subcommand;

use crate::factory::Factory;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Store a configuration key-value pair.
    Store(store::StoreArgs),
    /// List stored configuration values.
    #[command(alias = "ls")]
    List(list::ListArgs),
    /// Initialize or reconfigure GitHub credentials.
    Init(init::InitArgs),
}

impl ConfigCommand {
    /// Run the appropriate config subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the subcommand fails.
    pub async fn run(&self, factory: &Factory) -> anyhow::Result<()> {
        match self {
            Self::Store(args) => args.run(factory).await,
            Self::List(args) => args.run(factory),
            Self::Init(args) => args.run(factory).await,
        }
    }
}
