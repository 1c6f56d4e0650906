pub mod details;
pub mod error;
pub mod git_context;
pub mod mode;
pub mod settings;
pub mod workflow;

pub use details::{CommitDetails, PrDetails, StackGroup, StackPlan};
pub use error::AppError;
pub use git_context::{FileEntry, FileStatus, GitContext};
pub use mode::{Goal, RunMode};
pub use settings::{MergeStrategy, ProviderKind, Settings};
