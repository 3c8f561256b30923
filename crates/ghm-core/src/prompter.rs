//! Interactive prompt handling.

use anyhow::Result;

use crate::cmdutil::CancelError;

/// Trait for interactive terminal prompts.
pub trait Prompter: Send + Sync + std::fmt::Debug {
    /// Prompt for free-text input. An empty answer without a default asks
    /// again.
    fn input(&self, prompt: &str, default: &str) -> Result<String>;

    /// Read one raw line of text. Empty lines are returned as they are.
    fn line(&self) -> Result<String>;

    /// Prompt for password input (hidden).
    fn password(&self, prompt: &str) -> Result<String>;

    /// Prompt for hidden input twice, failing the entry until both match.
    fn password_with_confirmation(&self, prompt: &str, confirm_prompt: &str) -> Result<String>;
}

/// Dialoguer-based prompter implementation.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    /// Create a new prompter.
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        let mut input = dialoguer::Input::new().with_prompt(prompt);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(interrupted_to_cancel)
    }

    fn line(&self) -> Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt("")
            .allow_empty(true)
            .interact_text()
            .map_err(interrupted_to_cancel)
    }

    fn password(&self, prompt: &str) -> Result<String> {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(interrupted_to_cancel)
    }

    fn password_with_confirmation(&self, prompt: &str, confirm_prompt: &str) -> Result<String> {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .with_confirmation(confirm_prompt, "Error: the two entered values do not match.")
            .interact()
            .map_err(interrupted_to_cancel)
    }
}

/// Ctrl-C during a prompt surfaces as an interrupted read.
fn interrupted_to_cancel(err: dialoguer::Error) -> anyhow::Error {
    match err {
        dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => CancelError.into(),
        other => other.into(),
    }
}

/// Stub prompter for testing that returns pre-configured answers.
///
/// Every prompt kind pops from the same queue so tests can script a whole
/// interactive session in order.
#[derive(Debug, Default)]
pub struct StubPrompter {
    /// Pre-configured answers, consumed front to back.
    pub input_answers: std::sync::Mutex<Vec<String>>,
    /// Prompts that were shown, in order.
    pub prompts: std::sync::Mutex<Vec<String>>,
}

impl StubPrompter {
    /// Queue answers for upcoming prompts.
    pub fn answer<I, S>(&self, answers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .extend(answers.into_iter().map(Into::into));
    }

    fn is_drained(&self) -> bool {
        self.input_answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_empty()
    }

    /// Prompts shown so far.
    pub fn shown(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn next(&self, prompt: &str, default: &str) -> String {
        self.prompts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(prompt.to_string());
        let mut answers = self
            .input_answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if answers.is_empty() {
            default.to_string()
        } else {
            answers.remove(0)
        }
    }
}

impl Prompter for StubPrompter {
    // Mirrors dialoguer: empty answers are skipped unless a default exists.
    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        loop {
            let answer = self.next(prompt, default);
            if !answer.is_empty() || !default.is_empty() || self.is_drained() {
                return Ok(answer);
            }
        }
    }

    fn line(&self) -> Result<String> {
        Ok(self.next("", ""))
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Ok(self.next(prompt, ""))
    }

    fn password_with_confirmation(&self, prompt: &str, _confirm_prompt: &str) -> Result<String> {
        Ok(self.next(prompt, ""))
    }
}
