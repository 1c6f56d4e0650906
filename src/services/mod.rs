pub mod adapters;
pub mod config_store;
pub mod executor;
pub mod forge;
pub mod generation;
pub mod git_workspace;

pub use adapters::{DialoguerTerminal, ProcessCommandRunner};
pub use config_store::FileConfigStore;
pub use executor::{EffectExecutor, ExecutorOptions};
pub use forge::Forge;
pub use generation::{FallbackGenerator, HttpCompletionClient, LlmGenerator, ManualGenerator};
pub use git_workspace::GitWorkspace;
