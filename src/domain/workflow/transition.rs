//! The pure transition function: `(State, Event) -> (State, Vec<Effect>)`.
//!
//! No I/O happens here. Every pair not listed explicitly falls through to
//! `invalid`, which lands in the `Error` terminal state.

use crate::domain::{CommitDetails, GitContext};

use super::{CommitAction, Effect, Event, PostCommitChoice, PushThen, Staged, State};

/// Next state plus the effects to perform before the next event is awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: State,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: State) -> Self {
        Self { state, effects: Vec::new() }
    }

    fn with(state: State, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

/// Initial state and its effects.
pub fn start() -> Transition {
    Transition::with(State::Preflight, vec![Effect::CheckTools])
}

pub fn transition(state: State, event: Event) -> Transition {
    if state.is_terminal() {
        return invalid(&state, &event);
    }

    match (state, event) {
        // ---- Preflight -------------------------------------------------
        (State::Preflight, Event::ToolsOk { context }) => after_preflight(context),
        (State::Preflight, Event::ToolsMissing { message }) => {
            Transition::to(State::cancelled(message))
        }

        // ---- Pull check ------------------------------------------------
        (State::CheckingRemote { context }, Event::RemoteStatus { behind }) => {
            if behind > 0 {
                Transition::with(
                    State::ConfirmingPull { context, behind },
                    vec![Effect::ConfirmPull { behind }],
                )
            } else {
                continue_after_pull_check(context)
            }
        }
        (State::ConfirmingPull { context, .. }, Event::PullConfirmed { accepted }) => {
            if accepted {
                Transition::with(State::Pulling { context }, vec![Effect::Pull])
            } else {
                continue_after_pull_check(context)
            }
        }
        (State::ConfirmingPull { .. }, Event::UserCancelled) => {
            Transition::to(State::cancelled("Pull declined; nothing was changed"))
        }
        (State::Pulling { .. }, Event::PullDone) => Transition::with(
            State::Preflight,
            vec![Effect::success("Pulled remote changes, re-checking repository"), Effect::CheckTools],
        ),
        (State::Pulling { context }, Event::PullConflict { message }) => {
            Transition::to(State::MergeConflict { context, message })
        }

        // ---- Fast path -------------------------------------------------
        (State::FastPathLogging { context }, Event::CommitLogReady { .. }) => {
            if context.unpushed_count > 0 {
                let push = push_effect(&context);
                Transition::with(State::FastPathPushing { context }, vec![push])
            } else {
                let check = Effect::CheckPr { branch: context.branch.clone() };
                Transition::with(State::FastPathCheckingPr { context }, vec![check])
            }
        }
        (State::FastPathPushing { context }, Event::PushDone) => {
            let context = context.after_push();
            if context.on_trunk {
                return Transition::to(State::done(format!(
                    "Pushed {} to origin",
                    context.branch
                )));
            }
            let check = Effect::CheckPr { branch: context.branch.clone() };
            Transition::with(
                State::FastPathCheckingPr { context },
                vec![Effect::success("Pushed to origin"), check],
            )
        }
        (State::FastPathPushing { context }, Event::UserCancelled) => Transition::to(
            State::cancelled(format!(
                "Push skipped; {} commit(s) remain local on {}",
                context.unpushed_count, context.branch
            )),
        ),
        (State::FastPathCheckingPr { context }, Event::PrExists { url }) => Transition::with(
            State::FastPathConfirmingMerge { context, pr_url: url.clone() },
            vec![
                Effect::info(format!("Pull request already open: {}", url)),
                Effect::ConfirmMerge { pr_url: url },
            ],
        ),
        (State::FastPathCheckingPr { context }, Event::NoPr) => {
            let diff = Effect::GetTrunkDiff { base_ref: context.base_ref.clone() };
            Transition::with(State::FastPathGeneratingPr { context, diff: None }, vec![diff])
        }
        (State::FastPathGeneratingPr { context, .. }, Event::DiffReady { diff }) => {
            Transition::with(
                State::FastPathGeneratingPr { context, diff: Some(diff.clone()) },
                vec![
                    Effect::info("Generating pull request details"),
                    Effect::GeneratePrDetails { diff },
                ],
            )
        }
        (
            State::FastPathGeneratingPr { context, diff: Some(_) },
            Event::PrDetailsGenerated { details },
        ) => {
            let confirm =
                Effect::ConfirmCreatePr { title: details.title.clone(), body: details.body.clone() };
            Transition::with(State::FastPathConfirmingPr { context, pr: details }, vec![confirm])
        }
        (
            State::FastPathGeneratingPr { context, .. },
            Event::GenerationFailed | Event::UserCancelled,
        ) => Transition::to(State::done(format!(
            "Branch {} pushed; create the pull request manually with `gh pr create`",
            context.branch
        ))),
        (State::FastPathConfirmingPr { context, pr }, Event::PrConfirmed { accepted }) => {
            if accepted {
                let create = Effect::CreatePr {
                    base: context.trunk.clone(),
                    head: context.branch.clone(),
                    title: pr.title.clone(),
                    body: pr.body.clone(),
                };
                Transition::with(State::FastPathCreatingPr { context, pr }, vec![create])
            } else {
                Transition::to(State::done(format!(
                    "Branch {} pushed; no pull request created",
                    context.branch
                )))
            }
        }
        (State::FastPathConfirmingPr { context, .. }, Event::UserCancelled) => {
            Transition::to(State::cancelled(format!(
                "Branch {} pushed; pull request not created",
                context.branch
            )))
        }
        (State::FastPathCreatingPr { context, .. }, Event::PrCreated { url }) => Transition::with(
            State::FastPathConfirmingMerge { context, pr_url: url.clone() },
            vec![
                Effect::success(format!("Opened pull request {}", url)),
                Effect::ConfirmMerge { pr_url: url },
            ],
        ),
        (State::FastPathConfirmingMerge { context, pr_url }, Event::MergeConfirmed { accepted }) => {
            if accepted {
                let merge = Effect::MergePr { pr_url: pr_url.clone() };
                Transition::with(State::FastPathMerging { context, pr_url }, vec![merge])
            } else {
                Transition::to(State::done(format!("Pull request left open: {}", pr_url)))
            }
        }
        (State::FastPathConfirmingMerge { pr_url, .. }, Event::UserCancelled) => Transition::to(
            State::cancelled(format!("Merge cancelled; pull request open at {}", pr_url)),
        ),
        (State::FastPathMerging { pr_url, .. }, Event::MergeDone) => {
            Transition::to(State::done(format!("Shipped! Merged {}", pr_url)))
        }
        (State::FastPathMerging { context, .. }, Event::MergeConflict { message }) => {
            Transition::to(State::MergeConflict { context, message })
        }

        // ---- Full path -------------------------------------------------
        (State::CollectingFiles { context, earlier }, Event::FilesCollected { files }) => {
            if files.is_empty() {
                return Transition::to(State::done(format!(
                    "Nothing left to commit on {}",
                    context.branch
                )));
            }
            let pick = Effect::PickFiles { files: files.clone() };
            Transition::with(State::PickingFiles { context, files, earlier }, vec![pick])
        }
        (State::PickingFiles { .. }, Event::UserCancelled) => {
            Transition::to(State::cancelled("No files were staged"))
        }
        (State::PickingFiles { .. }, Event::GenerationFailed) => Transition::to(State::cancelled(
            "Could not plan stacked commits; nothing was committed",
        )),
        (State::PickingFiles { context, earlier, .. }, Event::FilesPicked { paths }) => {
            if paths.is_empty() {
                return Transition::to(State::cancelled("No files selected"));
            }
            let stage = Effect::StageFiles { paths: paths.clone() };
            Transition::with(State::StagingFiles { context, selected: paths, earlier }, vec![stage])
        }
        (State::PickingFiles { context, earlier, .. }, Event::StackPlanGenerated { plan }) => {
            let Some(first) = plan.groups.first().cloned() else {
                return Transition::to(State::cancelled("Stack plan contained no commits"));
            };
            let branch =
                if context.on_trunk { plan.branch_name.clone() } else { context.branch.clone() };
            let total = plan.groups.len();
            let effects = vec![
                Effect::info(format!("Committing {} stacked commit(s) on {}", total, branch)),
                Effect::ExecuteStackCommit {
                    group: first,
                    index: 0,
                    total,
                    branch: branch.clone(),
                    create_branch: context.on_trunk,
                },
            ];
            Transition::with(
                State::StackCommitting { context, plan, branch, index: 0, earlier },
                effects,
            )
        }
        (State::StagingFiles { context, selected, earlier }, Event::FilesStaged { snapshot }) => {
            let diff = Effect::GetStagedDiff { paths: selected.clone() };
            let staged = Staged { paths: selected, snapshot };
            Transition::with(State::GettingDiff { context, staged, earlier }, vec![diff])
        }
        (State::GettingDiff { context, staged, earlier }, Event::DiffReady { diff }) => {
            if diff.trim().is_empty() {
                return cancel_after_staging(staged, "Selected files have no staged differences");
            }
            Transition::with(
                State::GeneratingDetails { context, staged, diff: diff.clone(), earlier },
                vec![
                    Effect::info("Generating commit details"),
                    Effect::GenerateCommitDetails { diff },
                ],
            )
        }
        (
            State::GeneratingDetails { context, staged, earlier, .. },
            Event::DetailsGenerated { details },
        ) => {
            if context.on_trunk {
                let confirm = Effect::ConfirmBranch { suggested: details.branch_name.clone() };
                Transition::with(
                    State::ConfirmingBranch { context, staged, details, earlier },
                    vec![confirm],
                )
            } else {
                let branch = context.branch.clone();
                confirm_commit(Draft { context, staged, details, branch, earlier })
            }
        }
        (
            State::GeneratingDetails { staged, .. },
            Event::GenerationFailed | Event::UserCancelled,
        ) => cancel_after_staging(staged, "No commit details were produced; nothing was committed"),
        (
            State::ConfirmingBranch { context, staged, details, earlier },
            Event::BranchConfirmed { name },
        ) => {
            let name = name.trim();
            let branch =
                if name.is_empty() { details.branch_name.clone() } else { name.to_string() };
            confirm_commit(Draft { context, staged, details, branch, earlier })
        }
        (State::ConfirmingBranch { staged, .. }, Event::UserCancelled) => {
            cancel_after_staging(staged, "Branch selection cancelled")
        }
        (
            State::ConfirmingCommit { context, staged, details, branch, earlier },
            Event::CommitAction { action },
        ) => match action {
            CommitAction::Accept => commit(Draft { context, staged, details, branch, earlier }),
            CommitAction::Edit => {
                let edit = Effect::EditCommitMessage { message: details.commit_message.clone() };
                Transition::with(
                    State::EditingCommit { context, staged, details, branch, earlier },
                    vec![edit],
                )
            }
            CommitAction::Cancel => cancel_after_staging(staged, "Commit cancelled"),
        },
        (State::ConfirmingCommit { staged, .. }, Event::UserCancelled) => {
            cancel_after_staging(staged, "Commit cancelled")
        }
        (
            State::EditingCommit { context, staged, details, branch, earlier },
            Event::CommitEdited { message },
        ) => {
            let details = details.with_message(&message);
            if details.commit_message.is_empty() {
                return cancel_after_staging(staged, "Empty commit message; commit aborted");
            }
            commit(Draft { context, staged, details, branch, earlier })
        }
        (State::EditingCommit { staged, .. }, Event::UserCancelled) => {
            cancel_after_staging(staged, "Commit message editing cancelled")
        }
        (State::Committing { context, details, branch, earlier, .. }, Event::CommitDone) => {
            let context = context.after_commit(&branch, 1);
            let details = CommitDetails { branch_name: branch.clone(), ..details };
            let details = match earlier {
                Some(earlier) => earlier.followed_by(&details),
                None => details,
            };
            Transition::with(
                State::PostCommitCheckingPr { context, details },
                vec![
                    Effect::success(format!("Committed on {}", branch)),
                    Effect::CheckPr { branch },
                ],
            )
        }

        // ---- Post-commit hub -------------------------------------------
        (State::PostCommitCheckingPr { context, details }, Event::PrExists { url }) => {
            post_commit(context, details, Some(url))
        }
        (State::PostCommitCheckingPr { context, details }, Event::NoPr) => {
            post_commit(context, details, None)
        }
        (State::PostCommit { context, details, .. }, Event::PostCommitChoice { choice }) => {
            match choice {
                PostCommitChoice::CreatePr => push(context, details, PushThen::CheckPr),
                PostCommitChoice::PushOnly => push(context, details, PushThen::Finish),
                PostCommitChoice::CommitMore => Transition::with(
                    State::CollectingFiles { context, earlier: Some(details) },
                    vec![Effect::CollectFiles],
                ),
                PostCommitChoice::Done => Transition::to(State::done(format!(
                    "Committed locally on {}; not pushed",
                    context.branch
                ))),
            }
        }
        (State::PostCommit { context, .. }, Event::UserCancelled) => {
            cancel_after_commit(format!("Stopped after committing on {}", context.branch))
        }
        (State::Pushing { context, details, then }, Event::PushDone) => {
            let context = context.after_push();
            match then {
                PushThen::CheckPr => {
                    let check = Effect::CheckPr { branch: context.branch.clone() };
                    Transition::with(
                        State::CheckingPr { context, details },
                        vec![Effect::success("Pushed to origin"), check],
                    )
                }
                PushThen::Finish => {
                    Transition::to(State::done(format!("Pushed {} to origin", context.branch)))
                }
            }
        }
        (State::Pushing { context, .. }, Event::UserCancelled) => cancel_after_commit(format!(
            "Push skipped; commits remain local on {}",
            context.branch
        )),
        (State::CheckingPr { context, details }, Event::PrExists { url }) => Transition::with(
            State::ConfirmingMerge { context, details, pr_url: url.clone() },
            vec![
                Effect::info(format!("Pull request already open: {}", url)),
                Effect::ConfirmMerge { pr_url: url },
            ],
        ),
        (State::CheckingPr { context, details }, Event::NoPr) => {
            let confirm = Effect::ConfirmCreatePr {
                title: details.pr_title.clone(),
                body: details.pr_body.clone(),
            };
            Transition::with(State::ConfirmingPr { context, details }, vec![confirm])
        }
        (State::ConfirmingPr { context, details }, Event::PrConfirmed { accepted }) => {
            if accepted {
                let create = Effect::CreatePr {
                    base: context.trunk.clone(),
                    head: context.branch.clone(),
                    title: details.pr_title.clone(),
                    body: details.pr_body.clone(),
                };
                Transition::with(State::CreatingPr { context, details }, vec![create])
            } else {
                Transition::to(State::done(format!(
                    "Pushed {}; no pull request created",
                    context.branch
                )))
            }
        }
        (State::ConfirmingPr { context, .. }, Event::UserCancelled) => cancel_after_commit(
            format!("Pushed {}; pull request not created", context.branch),
        ),
        (State::CreatingPr { context, details }, Event::PrCreated { url }) => Transition::with(
            State::ConfirmingMerge { context, details, pr_url: url.clone() },
            vec![
                Effect::success(format!("Opened pull request {}", url)),
                Effect::ConfirmMerge { pr_url: url },
            ],
        ),
        (
            State::ConfirmingMerge { context, details, pr_url },
            Event::MergeConfirmed { accepted },
        ) => {
            if accepted {
                let merge = Effect::MergePr { pr_url: pr_url.clone() };
                Transition::with(State::Merging { context, details, pr_url }, vec![merge])
            } else {
                Transition::to(State::done(format!("Pull request left open: {}", pr_url)))
            }
        }
        (State::ConfirmingMerge { pr_url, .. }, Event::UserCancelled) => cancel_after_commit(
            format!("Merge cancelled; pull request open at {}", pr_url),
        ),
        (State::Merging { pr_url, .. }, Event::MergeDone) => {
            Transition::to(State::done(format!("Shipped! Merged {}", pr_url)))
        }
        (State::Merging { context, .. }, Event::MergeConflict { message }) => {
            Transition::to(State::MergeConflict { context, message })
        }

        // ---- Stacked commits -------------------------------------------
        (
            State::StackCommitting { context, plan, branch, index, earlier },
            Event::StackCommitDone { next_index },
        ) if next_index == index + 1 => {
            let total = plan.groups.len();
            if let Some(group) = plan.groups.get(next_index).cloned() {
                let effect = Effect::ExecuteStackCommit {
                    group,
                    index: next_index,
                    total,
                    branch: branch.clone(),
                    create_branch: false,
                };
                return Transition::with(
                    State::StackCommitting { context, plan, branch, index: next_index, earlier },
                    vec![effect],
                );
            }
            let details = plan.combined_details(&branch);
            let details = match earlier {
                Some(earlier) => earlier.followed_by(&details),
                None => details,
            };
            let context = context.after_commit(&branch, total as u32);
            Transition::with(
                State::PostCommitCheckingPr { context, details },
                vec![
                    Effect::success(format!("Committed {} stacked commit(s) on {}", total, branch)),
                    Effect::CheckPr { branch },
                ],
            )
        }

        (state, event) => invalid(&state, &event),
    }
}

fn after_preflight(context: GitContext) -> Transition {
    if context.nothing_pending() {
        return Transition::to(State::NothingToShip);
    }
    if !context.on_trunk && context.has_upstream {
        return Transition::with(
            State::CheckingRemote { context },
            vec![Effect::FetchRemoteStatus],
        );
    }
    continue_after_pull_check(context)
}

fn continue_after_pull_check(context: GitContext) -> Transition {
    if !context.has_changes {
        if context.unpushed_count > 0 || context.unmerged_count > 0 {
            let range = if context.has_upstream && context.unpushed_count > 0 {
                "@{u}..HEAD".to_string()
            } else {
                format!("{}..HEAD", context.base_ref)
            };
            return Transition::with(
                State::FastPathLogging { context },
                vec![Effect::ShowCommitLog { range }],
            );
        }
        return Transition::to(State::NothingToShip);
    }
    Transition::with(State::CollectingFiles { context, earlier: None }, vec![Effect::CollectFiles])
}

fn push_effect(context: &GitContext) -> Effect {
    Effect::PushBranch {
        branch: context.branch.clone(),
        set_upstream: !context.has_upstream,
        to_trunk: context.on_trunk,
    }
}

/// A commit being prepared on the full path.
struct Draft {
    context: GitContext,
    staged: Staged,
    details: CommitDetails,
    branch: String,
    earlier: Option<CommitDetails>,
}

fn confirm_commit(draft: Draft) -> Transition {
    let Draft { context, staged, details, branch, earlier } = draft;
    let confirm = Effect::ConfirmCommit { details: details.clone(), branch: branch.clone() };
    Transition::with(
        State::ConfirmingCommit { context, staged, details, branch, earlier },
        vec![confirm],
    )
}

fn commit(draft: Draft) -> Transition {
    let Draft { context, staged, details, branch, earlier } = draft;
    let effect = Effect::Commit {
        branch: branch.clone(),
        create_branch: context.on_trunk,
        message: details.commit_message.clone(),
        paths: staged.paths.clone(),
    };
    Transition::with(State::Committing { context, staged, details, branch, earlier }, vec![effect])
}

fn post_commit(context: GitContext, details: CommitDetails, pr_url: Option<String>) -> Transition {
    let prompt = Effect::PromptPostCommit { branch: context.branch.clone(), pr_url: pr_url.clone() };
    Transition::with(State::PostCommit { context, details, pr_url }, vec![prompt])
}

fn push(context: GitContext, details: CommitDetails, then: PushThen) -> Transition {
    let effect = push_effect(&context);
    Transition::with(State::Pushing { context, details, then }, vec![effect])
}

/// Cancellation once staging has happened: the staged paths are restored too.
fn cancel_after_staging(staged: Staged, message: impl Into<String>) -> Transition {
    Transition::with(State::cancelled(message), vec![Effect::UnstageAll { staged }])
}

/// Cancellation after a commit. The commit consumed what was staged, so the
/// compensating effect has nothing left to restore.
fn cancel_after_commit(message: impl Into<String>) -> Transition {
    let cleanup = Effect::UnstageAll { staged: Staged::default() };
    Transition::with(State::cancelled(message), vec![cleanup])
}

fn invalid(state: &State, event: &Event) -> Transition {
    Transition::to(State::error(format!(
        "Unexpected event '{}' in state '{}'",
        event.name(),
        state.name()
    )))
}
