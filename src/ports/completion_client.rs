use crate::domain::AppError;

/// A single prompt/response exchange with a text-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
}

pub trait CompletionClient {
    /// Return the raw text of the model's reply.
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError>;
}
