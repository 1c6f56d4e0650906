use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::CommandRunner;

/// Scripted `CommandRunner` keyed by the full command line.
///
/// Each key holds a queue of results; the last one repeats once the others are
/// consumed. Unscripted commands succeed with empty output, except that
/// `succeeds` reports `false` for them.
#[derive(Default)]
pub struct FakeCommands {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, String>>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, command: &str, output: &str) -> Self {
        self.push(command, Ok(output.to_string()))
    }

    pub fn succeed(self, command: &str) -> Self {
        self.push(command, Ok(String::new()))
    }

    pub fn fail(self, command: &str, details: &str) -> Self {
        self.push(command, Err(details.to_string()))
    }

    fn push(self, command: &str, result: Result<String, String>) -> Self {
        self.scripts.lock().unwrap().entry(command.to_string()).or_default().push_back(result);
        self
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self, command: &str) -> bool {
        self.calls().iter().any(|c| c == command)
    }

    fn next(&self, program: &str, args: &[&str]) -> Option<Result<String, String>> {
        let line = format!("{} {}", program, args.join(" "));
        self.calls.lock().unwrap().push(line.clone());
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts.get_mut(&line)?;
        if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
    }
}

impl CommandRunner for FakeCommands {
    fn capture(&self, program: &str, args: &[&str]) -> Result<String, AppError> {
        match self.next(program, args) {
            None => Ok(String::new()),
            Some(Ok(output)) => Ok(output.trim_end().to_string()),
            Some(Err(details)) => Err(AppError::CommandFailed {
                command: format!("{} {}", program, args.join(" ")),
                details,
            }),
        }
    }

    fn succeeds(&self, program: &str, args: &[&str]) -> bool {
        matches!(self.next(program, args), Some(Ok(_)))
    }

    fn stream(&self, program: &str, args: &[&str]) -> Result<(), AppError> {
        self.capture(program, args).map(|_| ())
    }
}
