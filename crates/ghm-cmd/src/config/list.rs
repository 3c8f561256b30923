//! `ghm config list` command.

use anyhow::Result;
use clap::Args;

use ghm_core::state::DocumentKind;
use ghm_core::{ios_eprintln, ios_println};

use crate::factory::Factory;

/// List stored configuration values.
#[derive(Debug, Args)]
pub struct ListArgs {}

impl ListArgs {
    /// Run the config list command.
    ///
    /// # Errors
    ///
    /// Never fails; an unreadable configuration lists as empty.
    pub fn run(&self, factory: &Factory) -> Result<()> {
        let ios = &factory.io;
        let cs = ios.color_scheme();
        let config = factory.documents().load(DocumentKind::Config);

        if config.is_empty() {
            ios_eprintln!(ios, "No configurations stored.");
            return Ok(());
        }

        ios_eprintln!(ios, "{}", cs.cyan("Stored configurations:"));
        for (key, value) in &config {
            ios_println!(ios, "- {key}: {value}");
        }
        Ok(())
    }
}
