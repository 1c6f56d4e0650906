//! Generators producing commit and pull request text.

mod fallback;
mod http_client;
mod llm_generator;
mod manual;

pub use fallback::FallbackGenerator;
pub use http_client::HttpCompletionClient;
pub use llm_generator::{LlmGenerator, extract_json, truncate_diff};
pub use manual::ManualGenerator;
