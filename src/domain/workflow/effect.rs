use crate::domain::{CommitDetails, FileEntry, StackGroup};

use super::Staged;

/// Emphasis of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
}

/// An externally observable action requested by the transition function.
///
/// Effects are inert: the executor performs them, the machine never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Verify required tools and capture a fresh `GitContext`.
    CheckTools,
    /// Fetch and count how far the upstream is ahead of HEAD.
    FetchRemoteStatus,
    ConfirmPull { behind: u32 },
    Pull,
    /// Print the commits in `range`.
    ShowCommitLog { range: String },
    PushBranch { branch: String, set_upstream: bool, to_trunk: bool },
    /// Look up an open pull request whose head is `branch`.
    CheckPr { branch: String },
    /// Diff of the branch against the merge base with `base_ref`.
    GetTrunkDiff { base_ref: String },
    GeneratePrDetails { diff: String },
    ConfirmCreatePr { title: String, body: String },
    CreatePr { base: String, head: String, title: String, body: String },
    ConfirmMerge { pr_url: String },
    MergePr { pr_url: String },
    CollectFiles,
    PickFiles { files: Vec<FileEntry> },
    /// Record the index tree, then stage `paths`.
    StageFiles { paths: Vec<String> },
    /// Staged diff limited to `paths`.
    GetStagedDiff { paths: Vec<String> },
    GenerateCommitDetails { diff: String },
    ConfirmBranch { suggested: String },
    ConfirmCommit { details: CommitDetails, branch: String },
    EditCommitMessage { message: String },
    /// Commit exactly `paths`; anything else in the index stays staged.
    Commit { branch: String, create_branch: bool, message: String, paths: Vec<String> },
    PromptPostCommit { branch: String, pr_url: Option<String> },
    /// Stage one stack group and commit it.
    ExecuteStackCommit {
        group: StackGroup,
        index: usize,
        total: usize,
        branch: String,
        create_branch: bool,
    },
    /// Compensating action: put the staged paths back as they were in the
    /// snapshot. An empty `Staged` restores nothing.
    UnstageAll { staged: Staged },
    Log { tone: Tone, message: String },
}

impl Effect {
    pub fn info(message: impl Into<String>) -> Effect {
        Effect::Log { tone: Tone::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Effect {
        Effect::Log { tone: Tone::Success, message: message.into() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Effect::CheckTools => "check_tools",
            Effect::FetchRemoteStatus => "fetch_remote_status",
            Effect::ConfirmPull { .. } => "confirm_pull",
            Effect::Pull => "pull",
            Effect::ShowCommitLog { .. } => "show_commit_log",
            Effect::PushBranch { .. } => "push_branch",
            Effect::CheckPr { .. } => "check_pr",
            Effect::GetTrunkDiff { .. } => "get_trunk_diff",
            Effect::GeneratePrDetails { .. } => "generate_pr_details",
            Effect::ConfirmCreatePr { .. } => "confirm_create_pr",
            Effect::CreatePr { .. } => "create_pr",
            Effect::ConfirmMerge { .. } => "confirm_merge",
            Effect::MergePr { .. } => "merge_pr",
            Effect::CollectFiles => "collect_files",
            Effect::PickFiles { .. } => "pick_files",
            Effect::StageFiles { .. } => "stage_files",
            Effect::GetStagedDiff { .. } => "get_staged_diff",
            Effect::GenerateCommitDetails { .. } => "generate_commit_details",
            Effect::ConfirmBranch { .. } => "confirm_branch",
            Effect::ConfirmCommit { .. } => "confirm_commit",
            Effect::EditCommitMessage { .. } => "edit_commit_message",
            Effect::Commit { .. } => "commit",
            Effect::PromptPostCommit { .. } => "prompt_post_commit",
            Effect::ExecuteStackCommit { .. } => "execute_stack_commit",
            Effect::UnstageAll { .. } => "unstage_all",
            Effect::Log { .. } => "log",
        }
    }
}
