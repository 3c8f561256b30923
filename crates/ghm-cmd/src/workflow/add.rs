//! `ghm workflow add` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::bootstrap;
use crate::factory::Factory;
use crate::input;
use crate::strategy::{AddWorkflowParams, Strategy, dispatch};

/// Add a GitHub Actions workflow to a repository.
///
/// The repository is cloned into the current directory unless a directory
/// named after it already exists; the workflow file is then committed and
/// pushed.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Repository (OWNER/REPO).
    #[arg(short = 'R', long)]
    repo: Option<String>,

    /// Workflow file name, e.g. ci.yml.
    #[arg(short = 'n', long, alias = "workflow_name")]
    workflow_name: Option<String>,

    /// Workflow file content.
    #[arg(long, alias = "workflow_content", conflicts_with = "file")]
    workflow_content: Option<String>,

    /// Read the workflow content from a file.
    #[arg(short = 'F', long, value_name = "PATH")]
    file: Option<PathBuf>,
}

impl AddArgs {
    /// Run the workflow add command.
    ///
    /// # Errors
    ///
    /// Returns an error if input is missing, credentials are unavailable, or
    /// any publication step fails.
    pub async fn run(&self, factory: &Factory) -> Result<()> {
        let repo = input::repo(factory, self.repo.as_deref())?;
        let workflow_name = input::text(
            factory,
            "--workflow-name",
            self.workflow_name.as_deref(),
            "Workflow file name (e.g., ci.yml)",
        )?;
        let content = self.content(factory)?;

        bootstrap::ensure_config(factory).await?;

        dispatch(
            factory,
            Strategy::AddWorkflow(AddWorkflowParams {
                repo,
                workflow_name,
                content,
            }),
        )
        .await
    }

    fn content(&self, factory: &Factory) -> Result<String> {
        if let Some(ref content) = self.workflow_content {
            return Ok(content.clone());
        }
        if let Some(ref path) = self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
        input::multiline(
            factory,
            "--workflow-content or --file",
            "Enter the workflow content",
        )
    }
}

#[cfg(test)]
mod tests {
    use ghm_core::cmdutil::FlagError;
    use ghm_core::state::DocumentKind;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_helpers::TestHarness;

    fn args() -> AddArgs {
        AddArgs {
            repo: Some("o/r".to_string()),
            workflow_name: Some("ci.yml".to_string()),
            workflow_content: None,
            file: None,
        }
    }

    #[tokio::test]
    async fn test_should_publish_content_from_flag() {
        let h = TestHarness::configured();
        let args = AddArgs {
            workflow_content: Some("name: CI\n".to_string()),
            ..args()
        };

        args.run(&h.factory).await.unwrap();

        assert_eq!(h.document(DocumentKind::Workflows)["ci.yml"], "name: CI\n");
        assert_eq!(h.command_lines().last().map(String::as_str), Some("git push"));
    }

    #[tokio::test]
    async fn test_should_read_content_from_file() {
        let h = TestHarness::configured();
        let source = h.work_dir.path().join("ci-source.yml");
        std::fs::write(&source, "name: From file\n").unwrap();
        let args = AddArgs {
            file: Some(source),
            ..args()
        };

        args.run(&h.factory).await.unwrap();

        let written = std::fs::read_to_string(
            h.work_dir.path().join("r/.github/workflows/ci.yml"),
        )
        .unwrap();
        assert_eq!(written, "name: From file\n");
    }

    #[tokio::test]
    async fn test_should_read_multiline_content_interactively() {
        let h = TestHarness::builder().credentials().interactive().build();
        h.prompter.answer(["name: CI", "on: [push]", "EOF"]);

        args().run(&h.factory).await.unwrap();

        assert_eq!(
            h.document(DocumentKind::Workflows)["ci.yml"],
            "name: CI\non: [push]"
        );
    }

    #[tokio::test]
    async fn test_should_keep_blank_lines_from_interactive_content() {
        let h = TestHarness::builder().credentials().interactive().build();
        h.prompter
            .answer(["name: CI", "", "on: [push]", "EOF"]);

        args().run(&h.factory).await.unwrap();

        assert_eq!(
            h.document(DocumentKind::Workflows)["ci.yml"],
            "name: CI\n\non: [push]"
        );
    }

    #[tokio::test]
    async fn test_should_not_leave_work_dir_for_dot_segment_repo() {
        let h = TestHarness::configured();
        let args = AddArgs {
            repo: Some("o/..".to_string()),
            workflow_content: Some("name: CI\n".to_string()),
            ..args()
        };

        let err = args.run(&h.factory).await.unwrap_err();

        assert!(err.downcast_ref::<FlagError>().is_some());
        assert!(h.command_lines().is_empty());
        assert!(!h.work_dir.path().join("../.github/workflows/ci.yml").exists());
    }

    #[tokio::test]
    async fn test_should_require_content_when_not_interactive() {
        let h = TestHarness::configured();

        let err = args().run(&h.factory).await.unwrap_err();

        assert!(err.downcast_ref::<FlagError>().is_some());
        assert_eq!(
            err.to_string(),
            "--workflow-content or --file required when not running interactively"
        );
        assert!(h.command_lines().is_empty());
    }

    #[tokio::test]
    async fn test_should_report_missing_content_file() {
        let h = TestHarness::configured();
        let args = AddArgs {
            file: Some(h.work_dir.path().join("missing.yml")),
            ..args()
        };

        let err = args.run(&h.factory).await.unwrap_err();

        assert!(err.to_string().starts_with("failed to read"));
        assert!(h.command_lines().is_empty());
    }
}
