//! Flag-or-prompt input helpers shared by the command groups.

use anyhow::Result;
use ghm_core::cmdutil::FlagError;
use ghm_core::ios_eprintln;
use ghm_core::repo::Repo;
use secrecy::SecretString;

use crate::factory::Factory;

/// Line that ends multi-line input.
pub const END_MARKER: &str = "EOF";

/// Parse a flag value into a [`SecretString`] so it never shows up in
/// `Debug` output.
///
/// # Errors
///
/// Never fails.
pub fn parse_secret(s: &str) -> Result<SecretString, std::convert::Infallible> {
    Ok(SecretString::from(s.to_string()))
}

fn not_interactive(flag: &str) -> anyhow::Error {
    FlagError(format!("{flag} required when not running interactively")).into()
}

/// Use the flag value, or prompt for it.
///
/// # Errors
///
/// Returns a [`FlagError`] when the flag is missing and prompting is
/// impossible, or the prompt's error.
pub fn text(factory: &Factory, flag: &str, value: Option<&str>, prompt: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v.to_string());
    }
    if !factory.io.can_prompt() {
        return Err(not_interactive(flag));
    }
    factory.prompter().input(prompt, "")
}

/// Use the `--repo` value, or prompt for it, and parse it.
///
/// # Errors
///
/// Returns a [`FlagError`] if the value is missing or malformed.
pub fn repo(factory: &Factory, value: Option<&str>) -> Result<Repo> {
    let raw = text(factory, "--repo", value, "Repository name (owner/repo)")?;
    Repo::from_full_name(&raw).map_err(|e| FlagError(format!("invalid --repo value: {e}")).into())
}

/// Use the flag value, or prompt twice with hidden input.
///
/// # Errors
///
/// Returns a [`FlagError`] when the flag is missing and prompting is
/// impossible, or the prompt's error.
pub fn secret(
    factory: &Factory,
    flag: &str,
    value: Option<&SecretString>,
    prompt: &str,
) -> Result<SecretString> {
    if let Some(v) = value {
        return Ok(v.clone());
    }
    if !factory.io.can_prompt() {
        return Err(not_interactive(flag));
    }
    let entered = factory
        .prompter()
        .password_with_confirmation(prompt, "Repeat for confirmation")?;
    Ok(SecretString::from(entered))
}

/// Read lines until one reads [`END_MARKER`].
///
/// # Errors
///
/// Returns a [`FlagError`] when prompting is impossible, or the prompt's
/// error.
pub fn multiline(factory: &Factory, flag: &str, prompt: &str) -> Result<String> {
    let ios = &factory.io;
    if !ios.can_prompt() {
        return Err(not_interactive(flag));
    }
    ios_eprintln!(ios, "{prompt} (type {END_MARKER} on a new line to finish)");

    let prompter = factory.prompter();
    let mut lines = Vec::new();
    loop {
        let line = prompter.line()?;
        if line.trim() == END_MARKER {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
