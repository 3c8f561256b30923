//! Shared test utilities for command testing.
//!
//! Provides a harness wiring a test [`Factory`] to an in-memory state store,
//! a recording process runner, a stub prompter and a temporary clone
//! directory.

use std::sync::Arc;

use ghm_core::iostreams::TestOutput;
use ghm_core::prompter::StubPrompter;
use ghm_core::state::{Document, DocumentKind, MemoryStateStore};
use ghm_git::runner::StubRunner;
use tempfile::TempDir;

use crate::factory::Factory;

/// Token stored by [`TestHarness::configured`].
pub const TEST_TOKEN: &str = "ghp_test_token_123";

/// A fully-configured test harness with factory, output capture and stubs.
#[derive(Debug)]
pub struct TestHarness {
    /// The factory configured for testing.
    pub factory: Factory,
    /// Captured stdout/stderr output.
    pub output: TestOutput,
    /// In-memory state documents.
    pub store: Arc<MemoryStateStore>,
    /// Recording process runner.
    pub runner: Arc<StubRunner>,
    /// Stub prompter for providing test answers.
    pub prompter: Arc<StubPrompter>,
    /// Directory repositories are cloned into.
    pub work_dir: TempDir,
}

impl TestHarness {
    /// Create a harness with empty state.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a harness whose configuration already holds credentials.
    pub fn configured() -> Self {
        Self::builder().credentials().build()
    }

    /// Start building a customized harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }

    /// Get captured stdout as a string.
    pub fn stdout(&self) -> String {
        self.output.stdout()
    }

    /// Get captured stderr as a string.
    pub fn stderr(&self) -> String {
        self.output.stderr()
    }

    /// Current content of a document, empty when absent.
    pub fn document(&self, kind: DocumentKind) -> Document {
        self.store.document(kind).unwrap_or_default()
    }

    /// Command lines run through the stub runner.
    pub fn command_lines(&self) -> Vec<String> {
        self.runner.command_lines()
    }
}

/// Builder for [`TestHarness`].
#[derive(Debug, Default)]
pub struct TestHarnessBuilder {
    store: MemoryStateStore,
    interactive: bool,
}

impl TestHarnessBuilder {
    /// Seed `username` and `token` in the configuration document.
    #[must_use]
    pub fn credentials(self) -> Self {
        self.document(
            DocumentKind::Config,
            &[("token", TEST_TOKEN), ("username", "alice")],
        )
    }

    /// Seed a document.
    #[must_use]
    pub fn document(mut self, kind: DocumentKind, entries: &[(&str, &str)]) -> Self {
        let document: Document = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.store = self.store.with_document(kind, &document);
        self
    }

    /// Seed a document with raw text.
    #[must_use]
    pub fn raw(mut self, kind: DocumentKind, raw: &str) -> Self {
        self.store = self.store.with_raw(kind, raw);
        self
    }

    /// Make every state write fail.
    #[must_use]
    pub fn failing_writes(mut self) -> Self {
        self.store = self.store.with_write_failure();
        self
    }

    /// Pretend stdin and stdout are terminals so prompts are shown.
    #[must_use]
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Build the harness.
    pub fn build(self) -> TestHarness {
        let store = Arc::new(self.store);
        let runner = Arc::new(StubRunner::new());
        let work_dir = tempfile::tempdir().expect("failed to create temp dir");

        let (mut factory, output) = Factory::test();
        if self.interactive {
            factory.io.set_stdin_tty(true);
            factory.io.set_stdout_tty(true);
            factory.io.set_never_prompt(false);
        }
        let (factory, prompter) = factory.with_stub_prompter();
        let factory = factory
            .with_store(store.clone())
            .with_runner(runner.clone())
            .with_work_dir(work_dir.path());

        TestHarness {
            factory,
            output,
            store,
            runner,
            prompter,
            work_dir,
        }
    }
}
