use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::domain::AppError;
use crate::ports::CommandRunner;

/// Runs commands as child processes rooted at a working directory.
#[derive(Debug, Clone)]
pub struct ProcessCommandRunner {
    root: PathBuf,
}

impl ProcessCommandRunner {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn command(&self, program: &str, args: &[&str]) -> Command {
        let mut command = Command::new(program);
        command.args(args).current_dir(&self.root);
        command
    }

    fn spawn_error(program: &str, err: std::io::Error) -> AppError {
        let details = if err.kind() == ErrorKind::NotFound {
            format!("'{}' is not installed or not on PATH", program)
        } else {
            err.to_string()
        };
        AppError::ToolUnavailable { tool: program.to_string(), details }
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    format!("{} {}", program, args.join(" "))
}

impl CommandRunner for ProcessCommandRunner {
    fn capture(&self, program: &str, args: &[&str]) -> Result<String, AppError> {
        tracing::debug!(command = %command_line(program, args), "capture");
        let output = self
            .command(program, args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::spawn_error(program, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let details = match (stdout.is_empty(), stderr.is_empty()) {
                (true, true) => format!("exited with {}", output.status),
                (false, true) => stdout,
                (true, false) => stderr,
                (false, false) => format!("{}\n{}", stdout, stderr),
            };
            return Err(AppError::CommandFailed { command: command_line(program, args), details });
        }

        Ok(stdout)
    }

    fn succeeds(&self, program: &str, args: &[&str]) -> bool {
        tracing::debug!(command = %command_line(program, args), "check");
        self.command(program, args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn stream(&self, program: &str, args: &[&str]) -> Result<(), AppError> {
        tracing::debug!(command = %command_line(program, args), "stream");
        let status =
            self.command(program, args).status().map_err(|e| Self::spawn_error(program, e))?;

        if !status.success() {
            return Err(AppError::CommandFailed {
                command: command_line(program, args),
                details: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}
