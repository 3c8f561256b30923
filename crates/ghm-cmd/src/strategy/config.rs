//! Configuration strategy.

use anyhow::{Context, Result};
use ghm_core::ios_eprintln;
use ghm_core::state::DocumentKind;

use super::StoreConfigParams;
use crate::factory::Factory;

pub(super) fn store(factory: &Factory, params: &StoreConfigParams) -> Result<()> {
    factory
        .documents()
        .upsert(DocumentKind::Config, &params.key, &params.value)
        .with_context(|| format!("failed to save configuration {}", params.key))?;

    let ios = &factory.io;
    let cs = ios.color_scheme();
    ios_eprintln!(
        ios,
        "{} Saved configuration {}",
        cs.success_icon(),
        cs.bold(&params.key)
    );
    Ok(())
}
