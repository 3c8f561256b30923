//! Workflow publication.
//!
//! Publishing a workflow walks a fixed sequence of steps:
//!
//! ```text
//! CLONE_CHECK -> (CLONE | SKIP_CLONE) -> WRITE_FILE -> STAGE -> COMMIT -> PUSH -> DONE
//! ```
//!
//! The first failing step aborts the rest. Completed steps are not rolled
//! back, so a failed run can leave a fresh clone or an uncommitted file
//! behind.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ghm_core::ios_eprintln;
use ghm_core::state::DocumentKind;

use super::AddWorkflowParams;
use crate::factory::Factory;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A step of workflow publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    /// Look for an existing clone.
    CloneCheck,
    /// Clone the repository.
    Clone,
    /// Reuse the existing clone.
    SkipClone,
    /// Write the workflow file into the clone.
    WriteFile,
    /// `git add` the workflow file.
    Stage,
    /// `git commit` the workflow file.
    Commit,
    /// `git push` the commit.
    Push,
    /// Everything succeeded.
    Done,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CloneCheck => "clone check",
            Self::Clone => "clone",
            Self::SkipClone => "skip clone",
            Self::WriteFile => "write file",
            Self::Stage => "stage",
            Self::Commit => "commit",
            Self::Push => "push",
            Self::Done => "done",
        })
    }
}

/// Workflow publication stopped at a failing step.
#[derive(Debug, thiserror::Error)]
#[error("{step} step failed")]
pub struct StepFailed {
    /// The step that failed.
    pub step: WorkflowStep,
    /// Why it failed.
    #[source]
    pub source: BoxError,
}

fn failed<E: Into<BoxError>>(step: WorkflowStep) -> impl FnOnce(E) -> StepFailed {
    move |e| {
        let source = e.into();
        tracing::warn!(%step, error = %source, "workflow publication failed");
        StepFailed { step, source }
    }
}

fn enter(step: WorkflowStep) {
    tracing::debug!(%step, "workflow step");
}

/// Path of a workflow file relative to the repository root.
pub fn workflow_path(workflow_name: &str) -> PathBuf {
    Path::new(".github").join("workflows").join(workflow_name)
}

fn write_workflow(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

async fn publish(factory: &Factory, params: &AddWorkflowParams) -> Result<PathBuf, StepFailed> {
    let ios = &factory.io;
    let cs = ios.color_scheme();
    let repo = &params.repo;

    enter(WorkflowStep::CloneCheck);
    let clone_dir = factory.work_dir().join(repo.clone_dir_name());
    if clone_dir.exists() {
        enter(WorkflowStep::SkipClone);
        ios_eprintln!(ios, "{} Using existing clone of {repo}", cs.warning_icon());
    } else {
        enter(WorkflowStep::Clone);
        let gh = factory.gh_client().map_err(failed(WorkflowStep::Clone))?;
        gh.clone_repo(repo, factory.work_dir())
            .await
            .map_err(failed(WorkflowStep::Clone))?;
        ios_eprintln!(ios, "{} Cloned {repo}", cs.success_icon());
    }

    enter(WorkflowStep::WriteFile);
    let relative = workflow_path(&params.workflow_name);
    let target = clone_dir.join(&relative);
    write_workflow(&target, &params.content).map_err(|e| {
        failed(WorkflowStep::WriteFile)(format!("failed to write {}: {e}", target.display()))
    })?;

    enter(WorkflowStep::Stage);
    let git = factory
        .git_client(&clone_dir)
        .map_err(failed(WorkflowStep::Stage))?;
    git.add(&relative)
        .await
        .map_err(failed(WorkflowStep::Stage))?;

    enter(WorkflowStep::Commit);
    git.commit(&format!("Add workflow {}", params.workflow_name))
        .await
        .map_err(failed(WorkflowStep::Commit))?;

    enter(WorkflowStep::Push);
    git.push().await.map_err(failed(WorkflowStep::Push))?;

    enter(WorkflowStep::Done);
    Ok(target)
}

pub(super) async fn add(factory: &Factory, params: &AddWorkflowParams) -> Result<()> {
    let path = publish(factory, params).await.with_context(|| {
        format!(
            "failed to add workflow {} to {}",
            params.workflow_name, params.repo
        )
    })?;
    tracing::debug!(path = %path.display(), "workflow published");

    factory
        .documents()
        .upsert(
            DocumentKind::Workflows,
            &params.workflow_name,
            &params.content,
        )
        .context("workflow was pushed but could not be recorded locally")?;

    let ios = &factory.io;
    let cs = ios.color_scheme();
    ios_eprintln!(
        ios,
        "{} Pushed workflow {} to {}",
        cs.success_icon(),
        cs.bold(&params.workflow_name),
        params.repo,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use ghm_core::repo::Repo;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::strategy::{Strategy, dispatch};
    use crate::test_helpers::TestHarness;

    const CONTENT: &str = "name: CI\non: [push]\n";

    fn add_workflow(name: &str) -> Strategy {
        Strategy::AddWorkflow(AddWorkflowParams {
            repo: Repo::new("o", "r"),
            workflow_name: name.to_string(),
            content: CONTENT.to_string(),
        })
    }

    fn step_of(err: &anyhow::Error) -> Option<WorkflowStep> {
        err.downcast_ref::<StepFailed>().map(|e| e.step)
    }

    #[tokio::test]
    async fn test_should_clone_write_commit_and_push() {
        let h = TestHarness::configured();

        dispatch(&h.factory, add_workflow("ci.yml")).await.unwrap();

        assert_eq!(
            h.command_lines(),
            vec![
                "gh repo clone o/r",
                "git add .github/workflows/ci.yml",
                "git commit -m Add workflow ci.yml",
                "git push",
            ]
        );
        let calls = h.runner.calls();
        assert_eq!(calls[0].cwd(), Some(h.work_dir.path()));
        assert_eq!(calls[1].cwd(), Some(h.work_dir.path().join("r").as_path()));
        let written = fs::read_to_string(h.work_dir.path().join("r/.github/workflows/ci.yml")).unwrap();
        assert_eq!(written, CONTENT);
        assert_eq!(h.document(DocumentKind::Workflows)["ci.yml"], CONTENT);
        assert!(h.stderr().contains("Pushed workflow ci.yml to o/r"));
    }

    #[tokio::test]
    async fn test_should_skip_clone_when_directory_exists() {
        let h = TestHarness::configured();
        let workflows = h.work_dir.path().join("r/.github/workflows");
        fs::create_dir_all(&workflows).unwrap();
        fs::write(workflows.join("ci.yml"), "old").unwrap();

        dispatch(&h.factory, add_workflow("ci.yml")).await.unwrap();

        assert!(!h.command_lines().iter().any(|l| l.starts_with("gh repo clone")));
        assert_eq!(fs::read_to_string(workflows.join("ci.yml")).unwrap(), CONTENT);
        assert!(h.stderr().contains("Using existing clone of o/r"));
    }

    #[tokio::test]
    async fn test_should_stop_when_clone_fails() {
        let h = TestHarness::configured();
        h.runner.fail_on("gh repo clone", 1, "GraphQL: Could not resolve to a Repository");

        let err = dispatch(&h.factory, add_workflow("ci.yml")).await.unwrap_err();

        assert_eq!(step_of(&err), Some(WorkflowStep::Clone));
        assert_eq!(h.command_lines(), vec!["gh repo clone o/r"]);
        assert!(!h.work_dir.path().join("r/.github/workflows/ci.yml").exists());
        assert!(h.document(DocumentKind::Workflows).is_empty());
        assert!(format!("{err:#}").contains("Could not resolve to a Repository"));
    }

    #[tokio::test]
    async fn test_should_not_push_when_commit_fails() {
        let h = TestHarness::configured();
        h.runner.fail_on("git commit", 1, "nothing to commit, working tree clean");

        let err = dispatch(&h.factory, add_workflow("ci.yml")).await.unwrap_err();

        assert_eq!(step_of(&err), Some(WorkflowStep::Commit));
        assert!(!h.command_lines().iter().any(|l| l == "git push"));
        assert!(h.work_dir.path().join("r/.github/workflows/ci.yml").exists());
        assert!(h.document(DocumentKind::Workflows).is_empty());
        assert_eq!(
            format!("{err:#}"),
            "failed to add workflow ci.yml to o/r: commit step failed: git commit failed: nothing to commit, working tree clean"
        );
    }

    #[tokio::test]
    async fn test_should_not_record_workflow_when_push_fails() {
        let h = TestHarness::configured();
        h.runner.fail_on("git push", 1, "! [rejected] main -> main (fetch first)");

        let err = dispatch(&h.factory, add_workflow("ci.yml")).await.unwrap_err();

        assert_eq!(step_of(&err), Some(WorkflowStep::Push));
        assert!(h.document(DocumentKind::Workflows).is_empty());
    }

    #[tokio::test]
    async fn test_should_fail_at_write_step_when_path_is_blocked() {
        let h = TestHarness::configured();
        // A file where the `.github` directory should be.
        fs::create_dir_all(h.work_dir.path().join("r")).unwrap();
        fs::write(h.work_dir.path().join("r/.github"), "").unwrap();

        let err = dispatch(&h.factory, add_workflow("ci.yml")).await.unwrap_err();

        assert_eq!(step_of(&err), Some(WorkflowStep::WriteFile));
        assert!(h.command_lines().is_empty());
    }

    #[tokio::test]
    async fn test_should_reject_nested_workflow_name() {
        let h = TestHarness::configured();

        let err = dispatch(&h.factory, add_workflow("../ci.yml")).await.unwrap_err();

        assert!(err.downcast_ref::<ghm_core::cmdutil::FlagError>().is_some());
        assert!(h.command_lines().is_empty());
    }

    #[test]
    fn test_should_build_relative_workflow_path() {
        assert_eq!(
            workflow_path("ci.yml"),
            PathBuf::from(".github/workflows/ci.yml")
        );
    }
}
