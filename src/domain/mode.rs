//! Run mode and the decisions an autonomous goal makes on the user's behalf.

use super::workflow::PostCommitChoice;

/// What an autonomous run is allowed to accomplish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Commit only.
    Local,
    /// Commit and push.
    Push,
    /// Commit, push and open a pull request.
    Pr,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Local => "local",
            Goal::Push => "push",
            Goal::Pr => "pr",
        }
    }

    /// Branch of the post-commit hub this goal takes.
    pub fn post_commit_choice(&self) -> PostCommitChoice {
        match self {
            Goal::Local => PostCommitChoice::Done,
            Goal::Push => PostCommitChoice::PushOnly,
            Goal::Pr => PostCommitChoice::CreatePr,
        }
    }

    pub fn allows_push(&self) -> bool {
        !matches!(self, Goal::Local)
    }

    /// Pull before shipping only when the goal will publish work.
    pub fn accepts_pull(&self) -> bool {
        self.allows_push()
    }

    pub fn accepts_pr_creation(&self) -> bool {
        matches!(self, Goal::Pr)
    }

    /// No goal carries authority to merge.
    pub fn accepts_merge(&self) -> bool {
        false
    }
}

/// Interactive, or autonomous toward a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Interactive,
    Autonomous { goal: Goal, stacked: bool },
}

impl RunMode {
    /// Build a mode from CLI flags, rejecting invalid combinations.
    pub fn from_flags(
        local: bool,
        push: bool,
        pr: bool,
        stacked: bool,
    ) -> Result<RunMode, super::AppError> {
        let goals: Vec<Goal> = [(local, Goal::Local), (push, Goal::Push), (pr, Goal::Pr)]
            .into_iter()
            .filter_map(|(set, goal)| set.then_some(goal))
            .collect();

        match goals.as_slice() {
            [] if stacked => Err(super::AppError::InvalidMode(
                "--stack requires one of --local, --push or --pr".into(),
            )),
            [] => Ok(RunMode::Interactive),
            [goal] => Ok(RunMode::Autonomous { goal: *goal, stacked }),
            _ => Err(super::AppError::InvalidMode(
                "--local, --push and --pr are mutually exclusive".into(),
            )),
        }
    }

    pub fn goal(&self) -> Option<Goal> {
        match self {
            RunMode::Interactive => None,
            RunMode::Autonomous { goal, .. } => Some(*goal),
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, RunMode::Interactive)
    }

    /// Whether a missing forge CLI must stop the run before it starts.
    ///
    /// Interactive runs only warn, since the user may never reach a PR step.
    pub fn needs_forge(&self) -> bool {
        matches!(self.goal(), Some(Goal::Push | Goal::Pr))
    }

    pub fn describe(&self) -> String {
        match self {
            RunMode::Interactive => "interactive".to_string(),
            RunMode::Autonomous { goal, stacked: false } => format!("autonomous ({})", goal.as_str()),
            RunMode::Autonomous { goal, stacked: true } => {
                format!("autonomous ({}, stacked)", goal.as_str())
            }
        }
    }
}
