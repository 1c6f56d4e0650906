use crate::domain::{CommitDetails, FileEntry, GitContext, PrDetails, StackPlan};

/// What happens after a successful push on the full path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushThen {
    CheckPr,
    Finish,
}

/// Paths this run staged, with the index tree written just before staging them.
///
/// Restoring `paths` from `snapshot` undoes the staging without touching
/// anything the user had staged elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Staged {
    pub paths: Vec<String>,
    pub snapshot: String,
}

/// Workflow state. Each variant carries exactly the context gathered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Preflight,

    // Pull check
    CheckingRemote { context: GitContext },
    ConfirmingPull { context: GitContext, behind: u32 },
    Pulling { context: GitContext },

    // Fast path: commits exist, nothing uncommitted
    FastPathLogging { context: GitContext },
    FastPathPushing { context: GitContext },
    FastPathCheckingPr { context: GitContext },
    FastPathGeneratingPr { context: GitContext, diff: Option<String> },
    FastPathConfirmingPr { context: GitContext, pr: PrDetails },
    FastPathCreatingPr { context: GitContext, pr: PrDetails },
    FastPathConfirmingMerge { context: GitContext, pr_url: String },
    FastPathMerging { context: GitContext, pr_url: String },

    // Full path: uncommitted changes. `earlier` holds details of commits already
    // made in this run when the user chose to commit more.
    CollectingFiles { context: GitContext, earlier: Option<CommitDetails> },
    PickingFiles { context: GitContext, files: Vec<FileEntry>, earlier: Option<CommitDetails> },
    StagingFiles { context: GitContext, selected: Vec<String>, earlier: Option<CommitDetails> },
    GettingDiff { context: GitContext, staged: Staged, earlier: Option<CommitDetails> },
    GeneratingDetails {
        context: GitContext,
        staged: Staged,
        diff: String,
        earlier: Option<CommitDetails>,
    },
    ConfirmingBranch {
        context: GitContext,
        staged: Staged,
        details: CommitDetails,
        earlier: Option<CommitDetails>,
    },
    ConfirmingCommit {
        context: GitContext,
        staged: Staged,
        details: CommitDetails,
        branch: String,
        earlier: Option<CommitDetails>,
    },
    EditingCommit {
        context: GitContext,
        staged: Staged,
        details: CommitDetails,
        branch: String,
        earlier: Option<CommitDetails>,
    },
    Committing {
        context: GitContext,
        staged: Staged,
        details: CommitDetails,
        branch: String,
        earlier: Option<CommitDetails>,
    },

    // Shared once a commit exists
    PostCommitCheckingPr { context: GitContext, details: CommitDetails },
    PostCommit { context: GitContext, details: CommitDetails, pr_url: Option<String> },
    Pushing { context: GitContext, details: CommitDetails, then: PushThen },
    CheckingPr { context: GitContext, details: CommitDetails },
    ConfirmingPr { context: GitContext, details: CommitDetails },
    CreatingPr { context: GitContext, details: CommitDetails },
    ConfirmingMerge { context: GitContext, details: CommitDetails, pr_url: String },
    Merging { context: GitContext, details: CommitDetails, pr_url: String },

    // Stacked commits
    StackCommitting {
        context: GitContext,
        plan: StackPlan,
        branch: String,
        index: usize,
        earlier: Option<CommitDetails>,
    },

    // Terminal
    Done { message: String },
    Cancelled { message: String },
    Error { message: String },
    NothingToShip,
    MergeConflict { context: GitContext, message: String },
}

impl State {
    pub fn done(message: impl Into<String>) -> State {
        State::Done { message: message.into() }
    }

    pub fn cancelled(message: impl Into<String>) -> State {
        State::Cancelled { message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> State {
        State::Error { message: message.into() }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            State::Done { .. }
                | State::Cancelled { .. }
                | State::Error { .. }
                | State::NothingToShip
                | State::MergeConflict { .. }
        )
    }

    /// Process exit status for a terminal state.
    pub fn exit_code(&self) -> i32 {
        match self {
            State::Error { .. } | State::MergeConflict { .. } => 1,
            _ => 0,
        }
    }

    /// One-line human-readable summary of a terminal state.
    pub fn summary(&self) -> String {
        match self {
            State::Done { message } => message.clone(),
            State::Cancelled { message } => format!("Cancelled: {}", message),
            State::Error { message } => format!("Error: {}", message),
            State::NothingToShip => {
                "Nothing to ship: no changes, unpushed or unmerged commits".to_string()
            }
            State::MergeConflict { message, .. } => format!(
                "Merge conflict: {}. Resolve the conflicts, commit, and run gitship again.",
                message.trim()
            ),
            other => format!("Stopped in state '{}'", other.name()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            State::Preflight => "preflight",
            State::CheckingRemote { .. } => "checking_remote",
            State::ConfirmingPull { .. } => "confirming_pull",
            State::Pulling { .. } => "pulling",
            State::FastPathLogging { .. } => "fast_path_logging",
            State::FastPathPushing { .. } => "fast_path_pushing",
            State::FastPathCheckingPr { .. } => "fast_path_checking_pr",
            State::FastPathGeneratingPr { .. } => "fast_path_generating_pr",
            State::FastPathConfirmingPr { .. } => "fast_path_confirming_pr",
            State::FastPathCreatingPr { .. } => "fast_path_creating_pr",
            State::FastPathConfirmingMerge { .. } => "fast_path_confirming_merge",
            State::FastPathMerging { .. } => "fast_path_merging",
            State::CollectingFiles { .. } => "collecting_files",
            State::PickingFiles { .. } => "picking_files",
            State::StagingFiles { .. } => "staging_files",
            State::GettingDiff { .. } => "getting_diff",
            State::GeneratingDetails { .. } => "generating_details",
            State::ConfirmingBranch { .. } => "confirming_branch",
            State::ConfirmingCommit { .. } => "confirming_commit",
            State::EditingCommit { .. } => "editing_commit",
            State::Committing { .. } => "committing",
            State::PostCommitCheckingPr { .. } => "post_commit_checking_pr",
            State::PostCommit { .. } => "post_commit",
            State::Pushing { .. } => "pushing",
            State::CheckingPr { .. } => "checking_pr",
            State::ConfirmingPr { .. } => "confirming_pr",
            State::CreatingPr { .. } => "creating_pr",
            State::ConfirmingMerge { .. } => "confirming_merge",
            State::Merging { .. } => "merging",
            State::StackCommitting { .. } => "stack_committing",
            State::Done { .. } => "done",
            State::Cancelled { .. } => "cancelled",
            State::Error { .. } => "error",
            State::NothingToShip => "nothing_to_ship",
            State::MergeConflict { .. } => "merge_conflict",
        }
    }
}
