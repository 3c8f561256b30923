//! `ghm config store` command.

use anyhow::Result;
use clap::Args;

use crate::factory::Factory;
use crate::input;
use crate::strategy::{StoreConfigParams, Strategy, dispatch};

/// Store a configuration key-value pair.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Configuration key, e.g. username, token or cache_policy.
    #[arg(short = 'k', long, alias = "config_key")]
    config_key: Option<String>,

    /// Configuration value.
    #[arg(short = 'v', long, alias = "config_value")]
    config_value: Option<String>,
}

impl StoreArgs {
    /// Run the config store command.
    ///
    /// # Errors
    ///
    /// Returns an error if input is missing or the value cannot be saved.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        let key = input::text(
            factory,
            "--config-key",
            self.config_key.as_deref(),
            "Configuration key",
        )?;
        let value = input::text(
            factory,
            "--config-value",
            self.config_value.as_deref(),
            "Configuration value",
        )?;

        dispatch(factory, Strategy::StoreConfig(StoreConfigParams { key, value })).await
    }
}

#[cfg(test)]
mod tests {
    use ghm_core::state::DocumentKind;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::TestHarness;

    fn args(key: Option<&str>, value: Option<&str>) -> StoreArgs {
        StoreArgs {
            config_key: key.map(String::from),
            config_value: value.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_should_store_value_from_flags() {
        let h = TestHarness::new();

        args(Some("username"), Some("alice"))
            .run(&h.factory)
            .await
            .unwrap();

        assert_eq!(h.document(DocumentKind::Config)["username"], "alice");
    }

    #[tokio::test]
    async fn test_should_prompt_for_key_and_value() {
        let h = TestHarness::builder().interactive().build();
        h.prompter.answer(["cache_policy", "always"]);

        args(None, None).run(&h.factory).await.unwrap();

        assert_eq!(h.document(DocumentKind::Config)["cache_policy"], "always");
        assert_eq!(
            h.prompter.shown(),
            vec!["Configuration key", "Configuration value"]
        );
    }

    #[tokio::test]
    async fn test_should_not_require_credentials() {
        let h = TestHarness::new();

        args(Some("token"), Some("abc123"))
            .run(&h.factory)
            .await
            .unwrap();

        assert!(h.prompter.shown().is_empty());
        assert!(h.command_lines().is_empty());
    }
}
