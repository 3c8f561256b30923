//! `ghm workflow list` command.

use anyhow::Result;
use clap::Args;

use ghm_core::state::DocumentKind;
use ghm_core::{ios_eprintln, ios_println};

use crate::factory::Factory;

/// List workflows published from this machine.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print only the workflow names.
    #[arg(long)]
    names_only: bool,
}

impl ListArgs {
    /// Run the workflow list command.
    ///
    /// # Errors
    ///
    /// Never fails; an unreadable document lists as empty.
    pub fn run(&self, factory: &Factory) -> Result<()> {
        let ios = &factory.io;
        let cs = ios.color_scheme();
        let workflows = factory.documents().load(DocumentKind::Workflows);

        if workflows.is_empty() {
            ios_eprintln!(ios, "No workflows stored locally.");
            return Ok(());
        }

        ios_eprintln!(ios, "{}", cs.cyan("Stored workflows:"));
        for (name, content) in &workflows {
            if self.names_only {
                ios_println!(ios, "- {name}");
            } else {
                ios_println!(ios, "- {name}:");
                ios_println!(ios, "{}", content.trim_end());
            }
        }
        Ok(())
    }
}
