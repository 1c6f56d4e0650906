mod command_runner;
mod completion_client;
mod effect_handler;
mod generator;
mod terminal;

pub use command_runner::CommandRunner;
pub use completion_client::{CompletionClient, CompletionRequest};
pub use effect_handler::EffectHandler;
pub use generator::Generator;
pub use terminal::Terminal;
