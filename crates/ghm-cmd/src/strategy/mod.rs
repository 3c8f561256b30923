//! Command strategies and the dispatcher.
//!
//! Each user intent is a [`Strategy`] variant carrying its typed
//! parameters. Command groups build a strategy and hand it to [`dispatch`],
//! which validates the parameters and runs the matching orchestration of
//! state store and gateway calls.

mod config;
mod secret;
pub mod workflow;

use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::Result;
use clap::ValueEnum;
use ghm_core::cmdutil::FlagError;
use ghm_core::repo::Repo;
use ghm_core::state::Document;
use regex::Regex;
use secrecy::SecretString;

use crate::factory::Factory;

/// Configuration key selecting the default [`CachePolicy`].
pub const CACHE_POLICY_KEY: &str = "cache_policy";

static SECRET_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("SECRET_NAME_RE is a valid regex")
});

/// When the local secrets cache follows a remote secret change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CachePolicy {
    /// Mirror the change only after the remote call succeeded.
    #[default]
    OnSuccess,
    /// Mirror the change even when the remote call failed.
    Always,
}

impl CachePolicy {
    /// Pick the policy from a flag, falling back to the `cache_policy`
    /// configuration key and then the default.
    pub fn resolve(flag: Option<Self>, config: &Document) -> Self {
        if let Some(policy) = flag {
            return policy;
        }
        match config.get(CACHE_POLICY_KEY).map(|v| v.parse::<Self>()) {
            Some(Ok(policy)) => policy,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring invalid cache policy in configuration");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Whether the local cache is updated given the remote outcome.
    pub fn mirrors(self, remote_ok: bool) -> bool {
        match self {
            Self::OnSuccess => remote_ok,
            Self::Always => true,
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OnSuccess => "on-success",
            Self::Always => "always",
        })
    }
}

impl FromStr for CachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s.trim(), true)
            .map_err(|_| format!("unknown cache policy {s:?}: expected 'always' or 'on-success'"))
    }
}

/// Parameters for setting a repository secret.
#[derive(Debug, Clone)]
pub struct AddSecretParams {
    /// Target repository.
    pub repo: Repo,
    /// Secret name.
    pub name: String,
    /// Secret value.
    pub value: SecretString,
    /// Access token handed to `gh`.
    pub token: SecretString,
    /// Local cache behavior.
    pub cache_policy: CachePolicy,
}

/// Parameters for removing a repository secret.
#[derive(Debug, Clone)]
pub struct RemoveSecretParams {
    /// Target repository.
    pub repo: Repo,
    /// Secret name.
    pub name: String,
    /// Access token handed to `gh`.
    pub token: SecretString,
    /// Local cache behavior.
    pub cache_policy: CachePolicy,
}

/// Parameters for publishing a workflow file.
#[derive(Debug, Clone)]
pub struct AddWorkflowParams {
    /// Target repository.
    pub repo: Repo,
    /// File name under `.github/workflows`.
    pub workflow_name: String,
    /// File content.
    pub content: String,
}

/// Parameters for storing a configuration value.
#[derive(Debug, Clone)]
pub struct StoreConfigParams {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// One user intent with its parameters.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Set a remote secret and cache it locally.
    AddSecret(AddSecretParams),
    /// Remove a remote secret and its local cache entry.
    RemoveSecret(RemoveSecretParams),
    /// Commit and push a workflow file.
    AddWorkflow(AddWorkflowParams),
    /// Store a configuration value.
    StoreConfig(StoreConfigParams),
}

impl Strategy {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddSecret(_) => "add-secret",
            Self::RemoveSecret(_) => "remove-secret",
            Self::AddWorkflow(_) => "add-workflow",
            Self::StoreConfig(_) => "store-config",
        }
    }

    /// Check parameters before anything is executed.
    ///
    /// # Errors
    ///
    /// Returns a [`FlagError`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), FlagError> {
        match self {
            Self::AddSecret(p) => validate_secret_name(&p.name),
            Self::RemoveSecret(p) => validate_secret_name(&p.name),
            Self::AddWorkflow(p) => validate_workflow_name(&p.workflow_name),
            Self::StoreConfig(p) => ghm_core::cmdutil::require_non_empty("--config-key", &p.key),
        }
    }
}

fn validate_secret_name(name: &str) -> Result<(), FlagError> {
    if !SECRET_NAME_RE.is_match(name) {
        return Err(FlagError(format!(
            "invalid secret name {name:?}: use only letters, digits and underscores, not starting with a digit"
        )));
    }
    if name.to_ascii_uppercase().starts_with("GITHUB_") {
        return Err(FlagError(format!(
            "invalid secret name {name:?}: names must not start with GITHUB_"
        )));
    }
    Ok(())
}

fn validate_workflow_name(name: &str) -> Result<(), FlagError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => Err(FlagError(format!(
            "invalid workflow name {name:?}: expected a plain file name such as ci.yml"
        ))),
    }
}

/// Validate a strategy and run it.
///
/// # Errors
///
/// Returns a [`FlagError`] for invalid parameters, or the strategy's own
/// failure.
pub async fn dispatch(factory: &Factory, strategy: Strategy) -> Result<()> {
    strategy.validate()?;
    tracing::debug!(strategy = strategy.name(), "dispatching");
    match strategy {
        Strategy::AddSecret(params) => secret::add(factory, &params).await,
        Strategy::RemoveSecret(params) => secret::remove(factory, &params).await,
        Strategy::AddWorkflow(params) => workflow::add(factory, &params).await,
        Strategy::StoreConfig(params) => config::store(factory, &params),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("API_KEY")]
    #[case("_private")]
    #[case("token2")]
    fn test_should_accept_valid_secret_names(#[case] name: &str) {
        assert!(validate_secret_name(name).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("2FA")]
    #[case("API-KEY")]
    #[case("API KEY")]
    #[case("GITHUB_TOKEN")]
    #[case("github_pat")]
    fn test_should_reject_invalid_secret_names(#[case] name: &str) {
        assert!(validate_secret_name(name).is_err());
    }

    #[rstest]
    #[case("ci.yml", true)]
    #[case("release.yaml", true)]
    #[case("", false)]
    #[case(".", false)]
    #[case("..", false)]
    #[case("../ci.yml", false)]
    #[case("nested/ci.yml", false)]
    #[case("/etc/passwd", false)]
    #[case("dir\\ci.yml", false)]
    fn test_should_validate_workflow_names(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(validate_workflow_name(name).is_ok(), valid);
    }

    #[test]
    fn test_should_reject_empty_config_key() {
        let strategy = Strategy::StoreConfig(StoreConfigParams {
            key: "  ".to_string(),
            value: "x".to_string(),
        });
        assert_eq!(
            strategy.validate().unwrap_err().to_string(),
            "--config-key cannot be empty"
        );
    }

    #[rstest]
    #[case(CachePolicy::OnSuccess, true, true)]
    #[case(CachePolicy::OnSuccess, false, false)]
    #[case(CachePolicy::Always, true, true)]
    #[case(CachePolicy::Always, false, true)]
    fn test_should_mirror_per_policy(
        #[case] policy: CachePolicy,
        #[case] remote_ok: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(policy.mirrors(remote_ok), expected);
    }

    #[test]
    fn test_should_resolve_policy_flag_over_config() {
        let config = Document::from([(CACHE_POLICY_KEY.to_string(), "always".to_string())]);
        assert_eq!(
            CachePolicy::resolve(Some(CachePolicy::OnSuccess), &config),
            CachePolicy::OnSuccess
        );
        assert_eq!(CachePolicy::resolve(None, &config), CachePolicy::Always);
        assert_eq!(
            CachePolicy::resolve(None, &Document::new()),
            CachePolicy::OnSuccess
        );
    }

    #[test]
    fn test_should_fall_back_to_default_for_invalid_config_policy() {
        let config = Document::from([(CACHE_POLICY_KEY.to_string(), "sometimes".to_string())]);
        assert_eq!(CachePolicy::resolve(None, &config), CachePolicy::OnSuccess);
    }

    #[test]
    fn test_should_parse_policy_case_insensitively() {
        assert_eq!("ALWAYS".parse::<CachePolicy>(), Ok(CachePolicy::Always));
        assert_eq!(" on-success ".parse::<CachePolicy>(), Ok(CachePolicy::OnSuccess));
        assert_eq!(CachePolicy::Always.to_string(), "always");
    }
}
