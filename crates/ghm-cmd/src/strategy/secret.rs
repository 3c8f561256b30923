//! Secret strategies: set or remove a remote secret and mirror the change
//! in the local secrets cache according to the cache policy.

use anyhow::{Context, Result};
use ghm_core::ios_eprintln;
use ghm_core::state::{DocumentKind, RemoveOutcome};
use secrecy::ExposeSecret;

use super::{AddSecretParams, RemoveSecretParams};
use crate::factory::Factory;

pub(super) async fn add(factory: &Factory, params: &AddSecretParams) -> Result<()> {
    let gh = factory.gh_client()?;
    let remote = gh
        .set_secret(&params.repo, &params.name, &params.value, &params.token)
        .await;

    if params.cache_policy.mirrors(remote.is_ok()) {
        factory
            .documents()
            .upsert(
                DocumentKind::Secrets,
                &params.name,
                params.value.expose_secret(),
            )
            .with_context(|| format!("failed to save secret {} locally", params.name))?;
        tracing::debug!(secret = %params.name, policy = %params.cache_policy, "cached secret locally");
    } else {
        tracing::debug!(secret = %params.name, "remote update failed; local cache unchanged");
    }

    remote.with_context(|| format!("failed to set secret {} on {}", params.name, params.repo))?;

    let ios = &factory.io;
    let cs = ios.color_scheme();
    ios_eprintln!(
        ios,
        "{} Set secret {} for {}",
        cs.success_icon(),
        cs.bold(&params.name),
        params.repo,
    );
    Ok(())
}

pub(super) async fn remove(factory: &Factory, params: &RemoveSecretParams) -> Result<()> {
    let gh = factory.gh_client()?;
    let remote = gh
        .remove_secret(&params.repo, &params.name, &params.token)
        .await;

    if params.cache_policy.mirrors(remote.is_ok()) {
        let outcome = factory
            .documents()
            .remove(DocumentKind::Secrets, &params.name)
            .with_context(|| format!("failed to remove secret {} locally", params.name))?;
        if outcome == RemoveOutcome::Removed {
            tracing::debug!(secret = %params.name, "removed cached secret");
        }
    } else {
        tracing::debug!(secret = %params.name, "remote removal failed; local cache unchanged");
    }

    remote.with_context(|| {
        format!(
            "failed to remove secret {} from {}",
            params.name, params.repo
        )
    })?;

    let ios = &factory.io;
    let cs = ios.color_scheme();
    ios_eprintln!(
        ios,
        "{} Removed secret {} from {}",
        cs.success_icon(),
        cs.bold(&params.name),
        params.repo,
    );
    Ok(())
}
