//! `ghm secret list` command.

use anyhow::Result;
use clap::Args;

use ghm_core::state::DocumentKind;
use ghm_core::{ios_eprintln, ios_println};

use crate::factory::Factory;

/// List secrets stored locally.
#[derive(Debug, Args)]
pub struct ListArgs {}

impl ListArgs {
    /// Run the secret list command.
    ///
    /// # Errors
    ///
    /// Never fails; an unreadable cache lists as empty.
    pub fn run(&self, factory: &Factory) -> Result<()> {
        let ios = &factory.io;
        let cs = ios.color_scheme();
        let secrets = factory.documents().load(DocumentKind::Secrets);

        if secrets.is_empty() {
            ios_eprintln!(ios, "No secrets stored locally.");
            return Ok(());
        }

        ios_eprintln!(ios, "{}", cs.cyan("Stored secrets:"));
        for (name, value) in &secrets {
            ios_println!(ios, "- {name}: {value}");
        }
        Ok(())
    }
}
