use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::AppError;
use crate::domain::workflow::Tone;
use crate::ports::Terminal;

/// One scripted reply; `None` inside means the user cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Input(Option<String>),
    Select(Option<usize>),
    MultiSelect(Option<Vec<usize>>),
    Confirm(Option<bool>),
    Password(Option<String>),
    Edit(Option<String>),
}

/// Terminal that replays answers in order and records everything shown.
#[derive(Default)]
pub struct ScriptedTerminal {
    answers: Mutex<VecDeque<Answer>>,
    prompts: Mutex<Vec<String>>,
    messages: Mutex<Vec<(Tone, String)>>,
}

impl ScriptedTerminal {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self { answers: Mutex::new(answers.into()), ..Self::default() }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(Tone, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    fn next(&self, prompt: &str) -> Answer {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for prompt '{}'", prompt))
    }
}

impl Terminal for ScriptedTerminal {
    fn input(&self, prompt: &str, _default: Option<&str>) -> Result<Option<String>, AppError> {
        match self.next(prompt) {
            Answer::Input(value) => Ok(value),
            other => panic!("expected input answer for '{}', got {:?}", prompt, other),
        }
    }

    fn select(
        &self,
        prompt: &str,
        _items: &[String],
        _default: usize,
    ) -> Result<Option<usize>, AppError> {
        match self.next(prompt) {
            Answer::Select(value) => Ok(value),
            other => panic!("expected select answer for '{}', got {:?}", prompt, other),
        }
    }

    fn multi_select(
        &self,
        prompt: &str,
        _items: &[String],
        _defaults: &[bool],
    ) -> Result<Option<Vec<usize>>, AppError> {
        match self.next(prompt) {
            Answer::MultiSelect(value) => Ok(value),
            other => panic!("expected multi-select answer for '{}', got {:?}", prompt, other),
        }
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<Option<bool>, AppError> {
        match self.next(prompt) {
            Answer::Confirm(value) => Ok(value),
            other => panic!("expected confirm answer for '{}', got {:?}", prompt, other),
        }
    }

    fn password(&self, prompt: &str) -> Result<Option<String>, AppError> {
        match self.next(prompt) {
            Answer::Password(value) => Ok(value),
            other => panic!("expected password answer for '{}', got {:?}", prompt, other),
        }
    }

    fn edit(&self, text: &str) -> Result<Option<String>, AppError> {
        match self.next(text) {
            Answer::Edit(value) => Ok(value),
            other => panic!("expected edit answer, got {:?}", other),
        }
    }

    fn say(&self, tone: Tone, message: &str) {
        self.messages.lock().unwrap().push((tone, message.to_string()));
    }
}
