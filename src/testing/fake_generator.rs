use std::sync::Mutex;

use crate::domain::{CommitDetails, FileEntry, PrDetails, StackPlan};
use crate::ports::Generator;

/// Generator returning canned results and recording which operations ran.
#[derive(Default)]
pub struct FakeGenerator {
    pub commit: Option<CommitDetails>,
    pub pr: Option<PrDetails>,
    pub plan: Option<StackPlan>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeGenerator {
    /// Generator that fails every request.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn with_commit(mut self, details: CommitDetails) -> Self {
        self.commit = Some(details);
        self
    }

    pub fn with_pr(mut self, details: PrDetails) -> Self {
        self.pr = Some(details);
        self
    }

    pub fn with_plan(mut self, plan: StackPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl Generator for FakeGenerator {
    fn commit_details(&self, _diff: &str) -> Option<CommitDetails> {
        self.calls.lock().unwrap().push("commit_details");
        self.commit.clone()
    }

    fn pr_details(&self, _diff: &str) -> Option<PrDetails> {
        self.calls.lock().unwrap().push("pr_details");
        self.pr.clone()
    }

    fn stack_plan(&self, _files: &[FileEntry], _diff: &str) -> Option<StackPlan> {
        self.calls.lock().unwrap().push("stack_plan");
        self.plan.clone()
    }
}
