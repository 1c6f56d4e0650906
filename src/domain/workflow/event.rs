use crate::domain::{CommitDetails, FileEntry, GitContext, PrDetails, StackPlan};

/// User decision at the commit confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    Accept,
    Edit,
    Cancel,
}

/// Options offered once a commit exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostCommitChoice {
    /// Push, then check for or create a pull request.
    CreatePr,
    PushOnly,
    /// Stage and commit more changes on the same branch.
    CommitMore,
    /// Stop with the work committed locally.
    Done,
}

impl PostCommitChoice {
    pub const ALL: [PostCommitChoice; 4] = [
        PostCommitChoice::CreatePr,
        PostCommitChoice::PushOnly,
        PostCommitChoice::CommitMore,
        PostCommitChoice::Done,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PostCommitChoice::CreatePr => "Push and open a pull request",
            PostCommitChoice::PushOnly => "Push only",
            PostCommitChoice::CommitMore => "Commit more changes",
            PostCommitChoice::Done => "Done (keep local)",
        }
    }
}

/// Outcome of performing exactly one effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ToolsOk { context: GitContext },
    ToolsMissing { message: String },
    RemoteStatus { behind: u32 },
    PullConfirmed { accepted: bool },
    PullDone,
    PullConflict { message: String },
    CommitLogReady { log: String },
    PushDone,
    PrExists { url: String },
    NoPr,
    DiffReady { diff: String },
    PrDetailsGenerated { details: PrDetails },
    DetailsGenerated { details: CommitDetails },
    GenerationFailed,
    PrConfirmed { accepted: bool },
    PrCreated { url: String },
    MergeConfirmed { accepted: bool },
    MergeDone,
    MergeConflict { message: String },
    FilesCollected { files: Vec<FileEntry> },
    FilesPicked { paths: Vec<String> },
    StackPlanGenerated { plan: StackPlan },
    /// `snapshot` is the index tree written before the paths were added.
    FilesStaged { snapshot: String },
    BranchConfirmed { name: String },
    CommitAction { action: CommitAction },
    CommitEdited { message: String },
    CommitDone,
    PostCommitChoice { choice: PostCommitChoice },
    StackCommitDone { next_index: usize },
    UserCancelled,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ToolsOk { .. } => "tools_ok",
            Event::ToolsMissing { .. } => "tools_missing",
            Event::RemoteStatus { .. } => "remote_status",
            Event::PullConfirmed { .. } => "confirm_pull",
            Event::PullDone => "pull_done",
            Event::PullConflict { .. } => "pull_conflict",
            Event::CommitLogReady { .. } => "commit_log_ready",
            Event::PushDone => "push_done",
            Event::PrExists { .. } => "pr_exists",
            Event::NoPr => "no_pr",
            Event::DiffReady { .. } => "diff_ready",
            Event::PrDetailsGenerated { .. } => "pr_details_generated",
            Event::DetailsGenerated { .. } => "details_generated",
            Event::GenerationFailed => "generation_failed",
            Event::PrConfirmed { .. } => "confirm_pr",
            Event::PrCreated { .. } => "pr_created",
            Event::MergeConfirmed { .. } => "confirm_merge",
            Event::MergeDone => "merge_done",
            Event::MergeConflict { .. } => "merge_conflict",
            Event::FilesCollected { .. } => "files_collected",
            Event::FilesPicked { .. } => "files_picked",
            Event::StackPlanGenerated { .. } => "stack_plan_generated",
            Event::FilesStaged { .. } => "files_staged",
            Event::BranchConfirmed { .. } => "branch_confirmed",
            Event::CommitAction { .. } => "commit_action",
            Event::CommitEdited { .. } => "commit_edited",
            Event::CommitDone => "commit_done",
            Event::PostCommitChoice { .. } => "post_commit_choice",
            Event::StackCommitDone { .. } => "stack_commit_done",
            Event::UserCancelled => "user_cancelled",
        }
    }
}
