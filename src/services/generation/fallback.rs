use crate::domain::{CommitDetails, FileEntry, PrDetails, StackPlan};
use crate::ports::Generator;

/// Tries `primary` first and asks `secondary` whenever it comes back empty.
pub struct FallbackGenerator<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Generator, S: Generator> FallbackGenerator<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: Generator, S: Generator> Generator for FallbackGenerator<P, S> {
    fn commit_details(&self, diff: &str) -> Option<CommitDetails> {
        self.primary.commit_details(diff).or_else(|| {
            tracing::info!("falling back for commit details");
            self.secondary.commit_details(diff)
        })
    }

    fn pr_details(&self, diff: &str) -> Option<PrDetails> {
        self.primary.pr_details(diff).or_else(|| {
            tracing::info!("falling back for pull request details");
            self.secondary.pr_details(diff)
        })
    }

    fn stack_plan(&self, files: &[FileEntry], diff: &str) -> Option<StackPlan> {
        self.primary.stack_plan(files, diff).or_else(|| {
            tracing::info!("falling back for stack plan");
            self.secondary.stack_plan(files, diff)
        })
    }
}
