//! External process execution.
//!
//! [`ProcessRunner`] is the seam between command logic and the operating
//! system. [`SystemRunner`] spawns real processes; [`StubRunner`] records
//! invocations and replays scripted failures for tests.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::instrument;

use crate::errors::GatewayError;

/// Flags whose following argument carries secret material.
const SENSITIVE_FLAGS: &[&str] = &["--body"];

const REDACTED: &str = "********";

/// A single process invocation: program, arguments, working directory, and
/// extra environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl Invocation {
    /// Start an invocation of `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir` instead of the caller's working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Program path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Short program name for messages (`gh`, `git`).
    pub fn program_name(&self) -> String {
        self.program.file_name().map_or_else(
            || self.program.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }

    /// Arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Working directory, if set.
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Extra environment variables.
    pub fn get_env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Value of an extra environment variable.
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Leading positional arguments, e.g. `secret set` or `commit`.
    pub fn command_label(&self) -> String {
        self.args
            .iter()
            .take_while(|a| !a.starts_with('-'))
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Arguments with secret values masked.
    pub fn redacted_args(&self) -> Vec<String> {
        let mut redacted = Vec::with_capacity(self.args.len());
        let mut mask_next = false;
        for arg in &self.args {
            if mask_next {
                redacted.push(REDACTED.to_string());
                mask_next = false;
                continue;
            }
            mask_next = SENSITIVE_FLAGS.contains(&arg.as_str());
            redacted.push(arg.clone());
        }
        redacted
    }

    /// Unredacted command line, for test assertions.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program_name())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env_keys: Vec<&str> = self.env.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.redacted_args())
            .field("cwd", &self.cwd)
            .field("env", &env_keys)
            .finish()
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
}

impl ProcessOutput {
    /// A successful exit with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed exit with the given code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external processes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run an invocation to completion, capturing stdout and stderr.
    ///
    /// Only failures to start the process are errors; a non-zero exit is
    /// reported through [`ProcessOutput::code`].
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, GatewayError>;
}

/// Runs an invocation and classifies its outcome.
///
/// Exit status 0 yields the trimmed stdout; anything else becomes
/// [`GatewayError::CommandFailed`] carrying the trimmed stderr. No retries.
///
/// # Errors
///
/// Returns an error if the process cannot be started or exits non-zero.
pub async fn execute(
    runner: &dyn ProcessRunner,
    invocation: &Invocation,
) -> Result<String, GatewayError> {
    let output = runner.run(invocation).await?;
    if output.success() {
        return Ok(output.stdout.trim().to_string());
    }

    let stderr = output.stderr.trim();
    let message = if stderr.is_empty() {
        output.code.map_or_else(
            || "terminated by signal".to_string(),
            |c| format!("exit status {c}"),
        )
    } else {
        stderr.to_string()
    };
    tracing::debug!(invocation = ?invocation, code = ?output.code, "process failed");
    Err(GatewayError::CommandFailed {
        program: invocation.program_name(),
        command: invocation.command_label(),
        message,
        exit_code: output.code,
    })
}

/// [`ProcessRunner`] that spawns real processes with captured output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    #[instrument(skip_all, fields(program = %invocation.program_name(), args = ?invocation.redacted_args()))]
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, GatewayError> {
        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.get_args());
        cmd.envs(invocation.get_env().iter().map(|(k, v)| (k, v)));

        if let Some(dir) = invocation.cwd() {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GatewayError::NotFound(invocation.program_name())
            } else {
                GatewayError::Spawn {
                    program: invocation.program_name(),
                    source: e,
                }
            }
        })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Test runner that records invocations and succeeds unless told otherwise.
#[derive(Debug, Default)]
pub struct StubRunner {
    calls: Mutex<Vec<Invocation>>,
    failures: Mutex<Vec<(String, ProcessOutput)>>,
}

impl StubRunner {
    /// Create a runner where every invocation succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail invocations whose command line starts with `prefix` (e.g. `"git commit"`).
    pub fn fail_on(&self, prefix: &str, code: i32, stderr: &str) {
        self.failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((prefix.to_string(), ProcessOutput::failed(code, stderr)));
    }

    /// Recorded invocations, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Recorded command lines, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }
}

#[async_trait]
impl ProcessRunner for StubRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, GatewayError> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(invocation.clone());

        let line = invocation.command_line();
        let failures = self
            .failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(failures
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map_or_else(|| ProcessOutput::ok(""), |(_, output)| output.clone()))
    }
}
