use crate::domain::{CommitDetails, FileEntry, PrDetails, StackPlan};

/// Produces commit, pull request and stack-plan text from a diff.
///
/// Implementations never fail past this boundary: any problem yields `None`.
pub trait Generator {
    fn commit_details(&self, diff: &str) -> Option<CommitDetails>;

    fn pr_details(&self, diff: &str) -> Option<PrDetails>;

    fn stack_plan(&self, files: &[FileEntry], diff: &str) -> Option<StackPlan>;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn commit_details(&self, diff: &str) -> Option<CommitDetails> {
        (**self).commit_details(diff)
    }

    fn pr_details(&self, diff: &str) -> Option<PrDetails> {
        (**self).pr_details(diff)
    }

    fn stack_plan(&self, files: &[FileEntry], diff: &str) -> Option<StackPlan> {
        (**self).stack_plan(files, diff)
    }
}
