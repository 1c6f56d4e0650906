use std::io::ErrorKind;

use dialoguer::{Confirm, Editor, Error as DialoguerError, Input, MultiSelect, Password, Select};

use crate::domain::AppError;
use crate::domain::workflow::Tone;
use crate::ports::Terminal;

/// Terminal backed by dialoguer prompts and plain stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerTerminal;

impl DialoguerTerminal {
    pub fn new() -> Self {
        Self
    }
}

/// Ctrl-C surfaces as an interrupted I/O error; treat it like Esc.
fn cancelled_or<T>(result: Result<T, DialoguerError>, what: &str) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::Prompt(format!("Failed to read {}: {}", what, err))),
    }
}

fn flatten<T>(result: Result<Option<Option<T>>, AppError>) -> Result<Option<T>, AppError> {
    result.map(Option::flatten)
}

impl Terminal for DialoguerTerminal {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<Option<String>, AppError> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        cancelled_or(input.interact_text(), prompt)
    }

    fn select(
        &self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<Option<usize>, AppError> {
        let result = Select::new().with_prompt(prompt).items(items).default(default).interact_opt();
        flatten(cancelled_or(result, prompt))
    }

    fn multi_select(
        &self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Option<Vec<usize>>, AppError> {
        let result = MultiSelect::new()
            .with_prompt(prompt)
            .items(items)
            .defaults(defaults)
            .interact_opt();
        flatten(cancelled_or(result, prompt))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>, AppError> {
        let result = Confirm::new().with_prompt(prompt).default(default).interact_opt();
        flatten(cancelled_or(result, prompt))
    }

    fn password(&self, prompt: &str) -> Result<Option<String>, AppError> {
        cancelled_or(Password::new().with_prompt(prompt).interact(), prompt)
    }

    fn edit(&self, text: &str) -> Result<Option<String>, AppError> {
        flatten(cancelled_or(Editor::new().edit(text), "commit message"))
    }

    fn say(&self, tone: Tone, message: &str) {
        match tone {
            Tone::Info => println!("{}", message),
            Tone::Success => println!("✅ {}", message),
            Tone::Warning => eprintln!("⚠️  {}", message),
        }
    }
}
