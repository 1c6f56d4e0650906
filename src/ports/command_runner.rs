use crate::domain::AppError;

/// Runs external programs such as `git` and `gh`.
pub trait CommandRunner {
    /// Run and return stdout without trailing whitespace. A non-zero exit is an
    /// error carrying the output.
    fn capture(&self, program: &str, args: &[&str]) -> Result<String, AppError>;

    /// Run quietly and report whether it exited successfully.
    ///
    /// A program that cannot be started counts as failure.
    fn succeeds(&self, program: &str, args: &[&str]) -> bool;

    /// Run with output attached to the terminal. A non-zero exit is an error.
    fn stream(&self, program: &str, args: &[&str]) -> Result<(), AppError>;
}
