use std::io;

use thiserror::Error;

/// Library-wide error type for gitship operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Mode flags or arguments that cannot be combined.
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    /// External program could not be started at all.
    #[error("Failed to execute '{tool}': {details}")]
    ToolUnavailable { tool: String, details: String },

    /// External command exited with a non-zero status.
    #[error("Command '{command}' failed: {details}")]
    CommandFailed { command: String, details: String },

    /// Repository is in a state the workflow cannot start from.
    #[error("Repository error: {0}")]
    Repository(String),

    /// Parse error.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    /// Prompt surface failure (not a user cancellation).
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// Text-generation provider failure.
    #[error("Generation provider error: {0}")]
    Provider(String),

    /// Prompt template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Output captured from a failed command, if any.
    pub fn command_output(&self) -> Option<&str> {
        match self {
            AppError::CommandFailed { details, .. } => Some(details),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_exposes_output() {
        let err = AppError::CommandFailed {
            command: "git pull".into(),
            details: "CONFLICT (content): Merge conflict in a.rs".into(),
        };
        assert_eq!(err.command_output(), Some("CONFLICT (content): Merge conflict in a.rs"));
        assert!(err.to_string().starts_with("Command 'git pull' failed"));
    }

    #[test]
    fn other_errors_have_no_command_output() {
        assert_eq!(AppError::config_error("missing").command_output(), None);
    }
}
