//! Credential bootstrap.
//!
//! Remote-facing commands need a GitHub username and token in the
//! configuration document. [`ensure_config`] prompts for them the first
//! time and is a no-op afterwards.

use anyhow::Result;
use ghm_core::cmdutil::{AuthError, require_non_empty};
use ghm_core::ios_eprintln;
use ghm_core::state::{Document, DocumentKind};
use secrecy::SecretString;

use crate::factory::Factory;
use crate::strategy::{StoreConfigParams, Strategy, dispatch};

/// Configuration key holding the GitHub username.
pub const USERNAME_KEY: &str = "username";
/// Configuration key holding the GitHub token.
pub const TOKEN_KEY: &str = "token";

fn has_credentials(config: &Document) -> bool {
    config.contains_key(USERNAME_KEY) && config.contains_key(TOKEN_KEY)
}

/// Load the configuration, prompting for credentials when any are missing.
///
/// # Errors
///
/// Returns an [`AuthError`] when credentials are missing and prompting is
/// impossible, or an error if the prompts or the save fail.
pub async fn ensure_config(factory: &Factory) -> Result<Document> {
    let config = factory.documents().load(DocumentKind::Config);
    if has_credentials(&config) {
        return Ok(config);
    }
    tracing::debug!("credentials missing; running first-time setup");
    initialize_config(factory).await?;
    Ok(factory.documents().load(DocumentKind::Config))
}

/// Prompt for the username and token and store them.
///
/// # Errors
///
/// Returns an [`AuthError`] when prompting is impossible, or an error if a
/// prompt or the save fails.
pub async fn initialize_config(factory: &Factory) -> Result<()> {
    let ios = &factory.io;
    if !ios.can_prompt() {
        return Err(AuthError(
            "GitHub credentials are not configured. Run `ghm config init` in a terminal, or \
             store them with `ghm config store --config-key username` and `--config-key token`."
                .to_string(),
        )
        .into());
    }

    let cs = ios.color_scheme();
    ios_eprintln!(ios, "{}", cs.cyan("Welcome to the GitHub Management CLI!"));
    ios_eprintln!(ios, "Let's set up your GitHub credentials.");

    let prompter = factory.prompter();
    let username = prompter.input("Enter your GitHub username", "")?;
    require_non_empty("username", &username)?;
    let token = prompter.password("Enter your GitHub token (input hidden)")?;
    require_non_empty("token", &token)?;

    for (key, value) in [(USERNAME_KEY, username), (TOKEN_KEY, token)] {
        dispatch(
            factory,
            Strategy::StoreConfig(StoreConfigParams {
                key: key.to_string(),
                value,
            }),
        )
        .await?;
    }

    ios_eprintln!(ios, "{} Configuration saved", cs.success_icon());
    Ok(())
}

/// The stored token.
///
/// # Errors
///
/// Returns an [`AuthError`] if no token is configured.
pub fn token(config: &Document) -> Result<SecretString> {
    config
        .get(TOKEN_KEY)
        .map(|t| SecretString::from(t.clone()))
        .ok_or_else(|| AuthError("no GitHub token configured".to_string()).into())
}
