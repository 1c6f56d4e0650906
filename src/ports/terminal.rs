use crate::domain::AppError;
use crate::domain::workflow::Tone;

/// Prompt and message surface.
///
/// Every prompt returns `Ok(None)` when the user cancels it.
pub trait Terminal {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<Option<String>, AppError>;

    fn select(&self, prompt: &str, items: &[String], default: usize)
    -> Result<Option<usize>, AppError>;

    /// Indices of chosen items; `defaults` marks items pre-selected.
    fn multi_select(
        &self,
        prompt: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Option<Vec<usize>>, AppError>;

    fn confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>, AppError>;

    fn password(&self, prompt: &str) -> Result<Option<String>, AppError>;

    /// Open `text` in the user's editor and return the saved result.
    fn edit(&self, text: &str) -> Result<Option<String>, AppError>;

    fn say(&self, tone: Tone, message: &str);
}
