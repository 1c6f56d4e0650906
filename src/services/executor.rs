//! Performs workflow effects against git, gh, the generator and the terminal.
//!
//! Autonomous runs never prompt: every decision comes from the declared goal.
//! Interactive runs ask the user, and a cancelled prompt becomes
//! `Event::UserCancelled`.

use std::path::PathBuf;

use crate::domain::details::{sanitize_branch_name, split_message};
use crate::domain::workflow::{CommitAction, Effect, Event, PostCommitChoice, Tone};
use crate::domain::{AppError, FileEntry, Goal, MergeStrategy, RunMode, StackGroup};
use crate::ports::{CommandRunner, EffectHandler, Generator, Terminal};
use crate::services::forge::Forge;
use crate::services::git_workspace::{GitWorkspace, mentions_conflict};

/// Run-wide settings the executor consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorOptions {
    pub mode: RunMode,
    pub merge_strategy: MergeStrategy,
    pub delete_branch: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            mode: RunMode::Interactive,
            merge_strategy: MergeStrategy::default(),
            delete_branch: true,
        }
    }
}

pub struct EffectExecutor<'a, C, T, G>
where
    C: CommandRunner,
    T: Terminal + ?Sized,
    G: Generator,
{
    runner: &'a C,
    git: GitWorkspace<'a, C>,
    forge: Forge<'a, C>,
    terminal: &'a T,
    generator: G,
    options: ExecutorOptions,
}

/// Map a prompt answer to an event; a cancelled prompt is `UserCancelled`.
fn answered<V>(answer: Option<V>, event: impl FnOnce(V) -> Event) -> Option<Event> {
    Some(answer.map_or(Event::UserCancelled, event))
}

impl<'a, C, T, G> EffectExecutor<'a, C, T, G>
where
    C: CommandRunner,
    T: Terminal + ?Sized,
    G: Generator,
{
    pub fn new(
        runner: &'a C,
        root: impl Into<PathBuf>,
        terminal: &'a T,
        generator: G,
        options: ExecutorOptions,
    ) -> Self {
        Self {
            runner,
            git: GitWorkspace::new(runner, root),
            forge: Forge::new(runner),
            terminal,
            generator,
            options,
        }
    }

    /// The goal making decisions, or `None` when the user decides.
    fn goal(&self) -> Option<Goal> {
        self.options.mode.goal()
    }

    fn check_tools(&self) -> Result<Option<Event>, AppError> {
        if !self.runner.succeeds("git", &["--version"]) {
            return Ok(Some(Event::ToolsMissing {
                message: "git is not installed or not on PATH".into(),
            }));
        }
        if !self.git.is_repository() {
            return Ok(Some(Event::ToolsMissing {
                message: "Not inside a git repository".into(),
            }));
        }
        if !self.forge.is_available() {
            if self.options.mode.needs_forge() {
                return Ok(Some(Event::ToolsMissing {
                    message: format!(
                        "gh (GitHub CLI) is required for {} runs; install it and run \
                         `gh auth login`",
                        self.options.mode.describe()
                    ),
                }));
            }
            if self.options.mode.is_interactive() {
                self.terminal
                    .say(Tone::Warning, "gh not found; pull request steps will not work");
            }
        }

        match self.git.context() {
            Ok(context) => Ok(Some(Event::ToolsOk { context })),
            Err(AppError::Repository(message)) => Ok(Some(Event::ToolsMissing { message })),
            Err(err) => Err(err),
        }
    }

    fn remote_status(&self) -> Option<Event> {
        let behind = match self.git.behind_upstream() {
            Ok(behind) => behind,
            Err(err) => {
                tracing::warn!(error = %err, "could not check upstream");
                self.terminal.say(Tone::Warning, "Could not reach the remote; skipping pull check");
                0
            }
        };
        Some(Event::RemoteStatus { behind })
    }

    fn confirm_pull(&self, behind: u32) -> Result<Option<Event>, AppError> {
        if let Some(goal) = self.goal() {
            return Ok(Some(Event::PullConfirmed { accepted: goal.accepts_pull() }));
        }
        let prompt = format!("Branch is {} commit(s) behind its upstream. Pull now?", behind);
        let answer = self.terminal.confirm(&prompt, true)?;
        Ok(answered(answer, |accepted| Event::PullConfirmed { accepted }))
    }

    fn pull(&self) -> Result<Option<Event>, AppError> {
        match self.git.pull() {
            Ok(_) => Ok(Some(Event::PullDone)),
            Err(err) => match err.command_output() {
                Some(output) if mentions_conflict(output) => {
                    Ok(Some(Event::PullConflict { message: output.to_string() }))
                }
                _ => Err(err),
            },
        }
    }

    fn show_commit_log(&self, range: &str) -> Result<Option<Event>, AppError> {
        let log = self.git.commit_log(range)?;
        self.terminal.say(Tone::Info, &format!("Commits to ship:\n{}", log));
        Ok(Some(Event::CommitLogReady { log }))
    }

    fn push(
        &self,
        branch: &str,
        set_upstream: bool,
        to_trunk: bool,
    ) -> Result<Option<Event>, AppError> {
        match self.goal() {
            Some(goal) if !goal.allows_push() => return Ok(Some(Event::UserCancelled)),
            Some(_) => {}
            None if to_trunk => {
                let prompt = format!("Push directly to {}?", branch);
                if self.terminal.confirm(&prompt, false)? != Some(true) {
                    return Ok(Some(Event::UserCancelled));
                }
            }
            None => {}
        }
        self.git.push(branch, set_upstream)?;
        Ok(Some(Event::PushDone))
    }

    fn check_pr(&self, branch: &str) -> Option<Event> {
        Some(match self.forge.open_pr_url(branch) {
            Some(url) => Event::PrExists { url },
            None => Event::NoPr,
        })
    }

    fn confirm_create_pr(&self, title: &str, body: &str) -> Result<Option<Event>, AppError> {
        if let Some(goal) = self.goal() {
            return Ok(Some(Event::PrConfirmed { accepted: goal.accepts_pr_creation() }));
        }
        self.terminal.say(Tone::Info, &format!("Pull request: {}\n\n{}", title, body));
        let answer = self.terminal.confirm("Create this pull request?", true)?;
        Ok(answered(answer, |accepted| Event::PrConfirmed { accepted }))
    }

    fn confirm_merge(&self, pr_url: &str) -> Result<Option<Event>, AppError> {
        if let Some(goal) = self.goal() {
            return Ok(Some(Event::MergeConfirmed { accepted: goal.accepts_merge() }));
        }
        let prompt = format!("Merge {} now ({})?", pr_url, self.options.merge_strategy);
        let answer = self.terminal.confirm(&prompt, false)?;
        Ok(answered(answer, |accepted| Event::MergeConfirmed { accepted }))
    }

    fn merge(&self, pr_url: &str) -> Result<Option<Event>, AppError> {
        let ExecutorOptions { merge_strategy, delete_branch, .. } = self.options;
        match self.forge.merge_pr(pr_url, merge_strategy, delete_branch) {
            Ok(()) => Ok(Some(Event::MergeDone)),
            Err(err) => match err.command_output() {
                Some(output) if mentions_conflict(output) => {
                    Ok(Some(Event::MergeConflict { message: output.to_string() }))
                }
                _ => Err(err),
            },
        }
    }

    fn pick_files(&self, files: Vec<FileEntry>) -> Result<Option<Event>, AppError> {
        match self.options.mode {
            RunMode::Autonomous { stacked: true, .. } => {
                let diff = self.git.working_diff(&files)?;
                Ok(Some(match self.generator.stack_plan(&files, &diff) {
                    Some(plan) => Event::StackPlanGenerated { plan },
                    None => Event::GenerationFailed,
                }))
            }
            RunMode::Autonomous { .. } => Ok(Some(Event::FilesPicked {
                paths: files.into_iter().map(|f| f.path).collect(),
            })),
            RunMode::Interactive => {
                let items: Vec<String> = files.iter().map(ToString::to_string).collect();
                let defaults = vec![true; items.len()];
                let answer = self.terminal.multi_select("Files to commit", &items, &defaults)?;
                Ok(answered(answer, |indices| Event::FilesPicked {
                    paths: indices
                        .into_iter()
                        .filter_map(|i| files.get(i).map(|f| f.path.clone()))
                        .collect(),
                }))
            }
        }
    }

    fn confirm_branch(&self, suggested: String) -> Result<Option<Event>, AppError> {
        if self.goal().is_some() {
            return Ok(Some(Event::BranchConfirmed { name: suggested }));
        }
        let answer = self.terminal.input("Branch name", Some(&suggested))?;
        Ok(answered(answer, |name| Event::BranchConfirmed {
            name: if name.trim().is_empty() { String::new() } else { sanitize_branch_name(&name) },
        }))
    }

    fn confirm_commit(&self, message: &str, branch: &str) -> Result<Option<Event>, AppError> {
        if self.goal().is_some() {
            return Ok(Some(Event::CommitAction { action: CommitAction::Accept }));
        }
        self.terminal.say(Tone::Info, &format!("Branch: {}\n\n{}", branch, message));
        let items = ["Commit", "Edit message", "Cancel"].map(String::from);
        let answer = self.terminal.select("Commit with this message?", &items, 0)?;
        Ok(answered(answer, |index| Event::CommitAction {
            action: match index {
                0 => CommitAction::Accept,
                1 => CommitAction::Edit,
                _ => CommitAction::Cancel,
            },
        }))
    }

    fn edit_commit_message(&self, message: String) -> Result<Option<Event>, AppError> {
        if self.goal().is_some() {
            return Ok(Some(Event::CommitEdited { message }));
        }
        let answer = self.terminal.edit(&message)?;
        Ok(answered(answer, |message| Event::CommitEdited { message }))
    }

    fn commit(
        &self,
        branch: &str,
        create_branch: bool,
        message: &str,
        paths: &[String],
    ) -> Result<Option<Event>, AppError> {
        if create_branch {
            self.git.create_branch(branch)?;
        }
        self.git.commit(message, paths)?;
        Ok(Some(Event::CommitDone))
    }

    fn prompt_post_commit(
        &self,
        branch: &str,
        pr_url: Option<String>,
    ) -> Result<Option<Event>, AppError> {
        if let Some(goal) = self.goal() {
            return Ok(Some(Event::PostCommitChoice { choice: goal.post_commit_choice() }));
        }
        if let Some(url) = pr_url {
            self.terminal.say(Tone::Info, &format!("Open pull request: {}", url));
        }
        let items = PostCommitChoice::ALL.map(|choice| choice.label().to_string());
        let answer = self.terminal.select(&format!("What next for {}?", branch), &items, 0)?;
        Ok(answered(answer, |index| Event::PostCommitChoice {
            choice: PostCommitChoice::ALL.get(index).copied().unwrap_or(PostCommitChoice::Done),
        }))
    }

    fn stack_commit(
        &self,
        group: StackGroup,
        index: usize,
        total: usize,
        branch: &str,
        create_branch: bool,
    ) -> Result<Option<Event>, AppError> {
        if create_branch {
            self.git.create_branch(branch)?;
        }
        self.git.stage(&group.files)?;
        self.git.commit(&group.message, &group.files)?;
        let subject = split_message(&group.message).0;
        self.terminal.say(Tone::Info, &format!("[{}/{}] {}", index + 1, total, subject));
        Ok(Some(Event::StackCommitDone { next_index: index + 1 }))
    }
}

impl<C, T, G> EffectHandler for EffectExecutor<'_, C, T, G>
where
    C: CommandRunner,
    T: Terminal + ?Sized,
    G: Generator,
{
    fn perform(&mut self, effect: Effect) -> Result<Option<Event>, AppError> {
        tracing::debug!(effect = effect.name(), "perform");
        match effect {
            Effect::CheckTools => self.check_tools(),
            Effect::FetchRemoteStatus => Ok(self.remote_status()),
            Effect::ConfirmPull { behind } => self.confirm_pull(behind),
            Effect::Pull => self.pull(),
            Effect::ShowCommitLog { range } => self.show_commit_log(&range),
            Effect::PushBranch { branch, set_upstream, to_trunk } => {
                self.push(&branch, set_upstream, to_trunk)
            }
            Effect::CheckPr { branch } => Ok(self.check_pr(&branch)),
            Effect::GetTrunkDiff { base_ref } => {
                Ok(Some(Event::DiffReady { diff: self.git.diff_since(&base_ref)? }))
            }
            Effect::GeneratePrDetails { diff } => Ok(Some(match self.generator.pr_details(&diff) {
                Some(details) => Event::PrDetailsGenerated { details },
                None => Event::GenerationFailed,
            })),
            Effect::ConfirmCreatePr { title, body } => self.confirm_create_pr(&title, &body),
            Effect::CreatePr { base, head, title, body } => {
                let url = self.forge.create_pr(&base, &head, &title, &body)?;
                Ok(Some(Event::PrCreated { url }))
            }
            Effect::ConfirmMerge { pr_url } => self.confirm_merge(&pr_url),
            Effect::MergePr { pr_url } => self.merge(&pr_url),
            Effect::CollectFiles => {
                Ok(Some(Event::FilesCollected { files: self.git.changed_files()? }))
            }
            Effect::PickFiles { files } => self.pick_files(files),
            Effect::StageFiles { paths } => {
                let snapshot = self.git.index_snapshot()?;
                self.git.stage(&paths)?;
                Ok(Some(Event::FilesStaged { snapshot }))
            }
            Effect::GetStagedDiff { paths } => {
                Ok(Some(Event::DiffReady { diff: self.git.staged_diff(&paths)? }))
            }
            Effect::GenerateCommitDetails { diff } => {
                Ok(Some(match self.generator.commit_details(&diff) {
                    Some(details) => Event::DetailsGenerated { details },
                    None => Event::GenerationFailed,
                }))
            }
            Effect::ConfirmBranch { suggested } => self.confirm_branch(suggested),
            Effect::ConfirmCommit { details, branch } => {
                self.confirm_commit(&details.commit_message, &branch)
            }
            Effect::EditCommitMessage { message } => self.edit_commit_message(message),
            Effect::Commit { branch, create_branch, message, paths } => {
                self.commit(&branch, create_branch, &message, &paths)
            }
            Effect::PromptPostCommit { branch, pr_url } => self.prompt_post_commit(&branch, pr_url),
            Effect::ExecuteStackCommit { group, index, total, branch, create_branch } => {
                self.stack_commit(group, index, total, &branch, create_branch)
            }
            Effect::UnstageAll { staged } => {
                self.git.restore_index(&staged.snapshot, &staged.paths)?;
                Ok(None)
            }
            Effect::Log { tone, message } => {
                self.terminal.say(tone, &message);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::Staged;
    use crate::domain::{CommitDetails, FileStatus, PrDetails, StackPlan};
    use crate::testing::{Answer, FakeCommands, FakeGenerator, ScriptedTerminal};

    const GH_VIEW: &str =
        "gh pr view feat/x --json url,state --jq select(.state == \"OPEN\") | .url";

    fn autonomous(goal: Goal, stacked: bool) -> ExecutorOptions {
        let mode = RunMode::Autonomous { goal, stacked };
        ExecutorOptions { mode, ..ExecutorOptions::default() }
    }

    type TestExecutor<'a> = EffectExecutor<'a, FakeCommands, ScriptedTerminal, FakeGenerator>;

    fn executor<'a>(
        commands: &'a FakeCommands,
        terminal: &'a ScriptedTerminal,
        generator: FakeGenerator,
        options: ExecutorOptions,
    ) -> TestExecutor<'a> {
        EffectExecutor::new(commands, ".", terminal, generator, options)
    }

    fn interactive<'a>(
        commands: &'a FakeCommands,
        terminal: &'a ScriptedTerminal,
    ) -> TestExecutor<'a> {
        executor(commands, terminal, FakeGenerator::default(), ExecutorOptions::default())
    }

    fn with_goal<'a>(
        commands: &'a FakeCommands,
        terminal: &'a ScriptedTerminal,
        goal: Goal,
        stacked: bool,
    ) -> TestExecutor<'a> {
        executor(commands, terminal, FakeGenerator::default(), autonomous(goal, stacked))
    }

    fn files() -> Vec<FileEntry> {
        vec![FileEntry::new("a.rs", FileStatus::Modified), FileEntry::new("b.rs", FileStatus::New)]
    }

    #[test]
    fn missing_git_is_reported_as_event() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let mut exec = interactive(&commands, &terminal);

        let event = exec.perform(Effect::CheckTools).unwrap();
        assert!(matches!(event, Some(Event::ToolsMissing { message }) if message.contains("git")));
    }

    #[test]
    fn missing_gh_blocks_pr_goal_but_not_local() {
        let commands = FakeCommands::new()
            .succeed("git --version")
            .succeed("git rev-parse --is-inside-work-tree")
            .respond("git branch --show-current", "main");
        let terminal = ScriptedTerminal::default();

        let mut pr = with_goal(&commands, &terminal, Goal::Pr, false);
        let event = pr.perform(Effect::CheckTools).unwrap();
        assert!(matches!(event, Some(Event::ToolsMissing { message }) if message.contains("gh")));

        let mut local = with_goal(&commands, &terminal, Goal::Local, false);
        let event = local.perform(Effect::CheckTools).unwrap();
        assert!(matches!(event, Some(Event::ToolsOk { ref context }) if context.on_trunk));
    }

    #[test]
    fn detached_head_cancels_instead_of_failing() {
        let commands = FakeCommands::new()
            .succeed("git --version")
            .succeed("git rev-parse --is-inside-work-tree")
            .succeed("gh --version");
        let terminal = ScriptedTerminal::default();
        let mut exec = interactive(&commands, &terminal);

        let event = exec.perform(Effect::CheckTools).unwrap();
        let Some(Event::ToolsMissing { message }) = event else {
            panic!("expected tools_missing, got {:?}", event);
        };
        assert!(message.contains("detached"));
    }

    #[test]
    fn fetch_failure_reports_not_behind() {
        let commands = FakeCommands::new().fail("git fetch --quiet", "could not resolve host");
        let terminal = ScriptedTerminal::default();
        let mut exec = interactive(&commands, &terminal);

        let event = exec.perform(Effect::FetchRemoteStatus).unwrap();
        assert_eq!(event, Some(Event::RemoteStatus { behind: 0 }));
        assert_eq!(terminal.messages()[0].0, Tone::Warning);
    }

    #[test]
    fn goal_decides_pull_and_merge() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let mut local = with_goal(&commands, &terminal, Goal::Local, false);
        assert_eq!(
            local.perform(Effect::ConfirmPull { behind: 2 }).unwrap(),
            Some(Event::PullConfirmed { accepted: false })
        );

        let mut pr = with_goal(&commands, &terminal, Goal::Pr, false);
        assert_eq!(
            pr.perform(Effect::ConfirmPull { behind: 2 }).unwrap(),
            Some(Event::PullConfirmed { accepted: true })
        );
        assert_eq!(
            pr.perform(Effect::ConfirmMerge { pr_url: "u".into() }).unwrap(),
            Some(Event::MergeConfirmed { accepted: false })
        );
        assert_eq!(
            pr.perform(Effect::ConfirmCreatePr { title: "t".into(), body: "b".into() }).unwrap(),
            Some(Event::PrConfirmed { accepted: true })
        );
        assert_eq!(terminal.prompts(), Vec::<String>::new());
    }

    #[test]
    fn pull_conflict_is_an_event_other_failures_are_errors() {
        let conflict = FakeCommands::new()
            .fail("git pull --no-rebase --no-edit", "CONFLICT (content): Merge conflict in a.rs");
        let terminal = ScriptedTerminal::default();
        let mut exec = interactive(&conflict, &terminal);
        assert_eq!(
            exec.perform(Effect::Pull).unwrap(),
            Some(Event::PullConflict {
                message: "CONFLICT (content): Merge conflict in a.rs".into()
            })
        );

        let offline = FakeCommands::new().fail("git pull --no-rebase --no-edit", "network down");
        let mut exec = interactive(&offline, &terminal);
        assert!(matches!(exec.perform(Effect::Pull), Err(AppError::CommandFailed { .. })));
    }

    #[test]
    fn local_goal_refuses_to_push() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let mut exec = with_goal(&commands, &terminal, Goal::Local, false);

        let effect =
            Effect::PushBranch { branch: "feat/x".into(), set_upstream: true, to_trunk: false };
        assert_eq!(exec.perform(effect).unwrap(), Some(Event::UserCancelled));
        assert!(commands.calls().is_empty());
    }

    #[test]
    fn interactive_trunk_push_needs_confirmation() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::new(vec![Answer::Confirm(Some(false))]);
        let mut exec = interactive(&commands, &terminal);

        let effect =
            Effect::PushBranch { branch: "main".into(), set_upstream: false, to_trunk: true };
        assert_eq!(exec.perform(effect.clone()).unwrap(), Some(Event::UserCancelled));
        assert!(commands.calls().is_empty());

        let terminal = ScriptedTerminal::new(vec![Answer::Confirm(Some(true))]);
        let mut exec = interactive(&commands, &terminal);
        assert_eq!(exec.perform(effect).unwrap(), Some(Event::PushDone));
        assert_eq!(commands.calls(), vec!["git push origin main"]);
    }

    #[test]
    fn push_sets_upstream_when_requested() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let mut exec = with_goal(&commands, &terminal, Goal::Push, false);

        let effect =
            Effect::PushBranch { branch: "feat/x".into(), set_upstream: true, to_trunk: false };
        assert_eq!(exec.perform(effect).unwrap(), Some(Event::PushDone));
        assert_eq!(commands.calls(), vec!["git push --set-upstream origin feat/x"]);
    }

    #[test]
    fn pr_lookup_maps_to_events() {
        let found = FakeCommands::new().respond(GH_VIEW, "https://pr/2");
        let terminal = ScriptedTerminal::default();
        let mut exec = interactive(&found, &terminal);
        assert_eq!(
            exec.perform(Effect::CheckPr { branch: "feat/x".into() }).unwrap(),
            Some(Event::PrExists { url: "https://pr/2".into() })
        );

        let missing = FakeCommands::new().fail(GH_VIEW, "no pull requests found");
        let mut exec = interactive(&missing, &terminal);
        let event = exec.perform(Effect::CheckPr { branch: "feat/x".into() }).unwrap();
        assert_eq!(event, Some(Event::NoPr));
    }

    #[test]
    fn merge_conflict_is_an_event() {
        let commands = FakeCommands::new().fail(
            "gh pr merge https://pr/1 --squash --delete-branch",
            "Pull request is not mergeable: merge conflict",
        );
        let terminal = ScriptedTerminal::default();
        let mut exec = interactive(&commands, &terminal);

        let event = exec.perform(Effect::MergePr { pr_url: "https://pr/1".into() }).unwrap();
        assert!(matches!(event, Some(Event::MergeConflict { .. })));
    }

    #[test]
    fn generation_results_become_events() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let pr = PrDetails { title: "Add x".into(), body: String::new() };
        let mut exec = executor(
            &commands,
            &terminal,
            FakeGenerator::default().with_pr(pr.clone()),
            ExecutorOptions::default(),
        );

        assert_eq!(
            exec.perform(Effect::GeneratePrDetails { diff: "d".into() }).unwrap(),
            Some(Event::PrDetailsGenerated { details: pr })
        );
        assert_eq!(
            exec.perform(Effect::GenerateCommitDetails { diff: "d".into() }).unwrap(),
            Some(Event::GenerationFailed)
        );
    }

    #[test]
    fn generated_commit_details_are_forwarded() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let details = CommitDetails {
            branch_name: "fix/typo".into(),
            commit_message: "fix: typo".into(),
            pr_title: "fix: typo".into(),
            pr_body: String::new(),
        };
        let generator = FakeGenerator::default().with_commit(details.clone());
        let mut exec = executor(&commands, &terminal, generator, autonomous(Goal::Local, false));

        assert_eq!(
            exec.perform(Effect::GenerateCommitDetails { diff: "d".into() }).unwrap(),
            Some(Event::DetailsGenerated { details })
        );
        assert_eq!(exec.generator.calls(), vec!["commit_details"]);
    }

    #[test]
    fn interactive_pick_maps_indices_to_paths() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::new(vec![Answer::MultiSelect(Some(vec![1]))]);
        let mut exec = interactive(&commands, &terminal);

        assert_eq!(
            exec.perform(Effect::PickFiles { files: files() }).unwrap(),
            Some(Event::FilesPicked { paths: vec!["b.rs".into()] })
        );
    }

    #[test]
    fn cancelled_prompt_is_user_cancelled() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::new(vec![Answer::MultiSelect(None)]);
        let mut exec = interactive(&commands, &terminal);

        let event = exec.perform(Effect::PickFiles { files: files() }).unwrap();
        assert_eq!(event, Some(Event::UserCancelled));
    }

    #[test]
    fn autonomous_pick_takes_everything() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let mut exec = with_goal(&commands, &terminal, Goal::Push, false);

        assert_eq!(
            exec.perform(Effect::PickFiles { files: files() }).unwrap(),
            Some(Event::FilesPicked { paths: vec!["a.rs".into(), "b.rs".into()] })
        );
    }

    #[test]
    fn stacked_pick_asks_for_a_plan() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let plan = StackPlan {
            groups: vec![StackGroup {
                files: vec!["a.rs".into(), "b.rs".into()],
                message: "feat: x".into(),
            }],
            branch_name: "feat/x".into(),
            pr_title: "feat: x".into(),
            pr_body: String::new(),
        };
        let generator = FakeGenerator::default().with_plan(plan.clone());
        let mut exec = executor(&commands, &terminal, generator, autonomous(Goal::Local, true));

        assert_eq!(
            exec.perform(Effect::PickFiles { files: files() }).unwrap(),
            Some(Event::StackPlanGenerated { plan })
        );
        assert!(commands.was_called("git diff HEAD") || commands.was_called("git diff --cached"));
    }

    #[test]
    fn interactive_branch_name_is_sanitized() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::new(vec![Answer::Input(Some("My Feature".into()))]);
        let mut exec = interactive(&commands, &terminal);

        assert_eq!(
            exec.perform(Effect::ConfirmBranch { suggested: "feat/x".into() }).unwrap(),
            Some(Event::BranchConfirmed { name: "my-feature".into() })
        );
    }

    #[test]
    fn commit_menu_maps_to_actions() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::new(vec![Answer::Select(Some(1))]);
        let mut exec = interactive(&commands, &terminal);
        let details = CommitDetails {
            branch_name: "feat/x".into(),
            commit_message: "feat: x".into(),
            pr_title: "feat: x".into(),
            pr_body: String::new(),
        };

        assert_eq!(
            exec.perform(Effect::ConfirmCommit { details, branch: "feat/x".into() }).unwrap(),
            Some(Event::CommitAction { action: CommitAction::Edit })
        );
    }

    #[test]
    fn commit_creates_branch_first_when_asked() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let mut exec = interactive(&commands, &terminal);

        let effect = Effect::Commit {
            branch: "feat/x".into(),
            create_branch: true,
            message: "feat: x".into(),
            paths: vec!["a.rs".into()],
        };
        assert_eq!(exec.perform(effect).unwrap(), Some(Event::CommitDone));
        assert_eq!(
            commands.calls(),
            vec!["git checkout -b feat/x", "git commit --quiet -m feat: x -- a.rs"]
        );
    }

    #[test]
    fn staging_records_the_index_first() {
        let commands = FakeCommands::new().respond("git write-tree", "4b825dc");
        let terminal = ScriptedTerminal::default();
        let mut exec = interactive(&commands, &terminal);

        let effect = Effect::StageFiles { paths: vec!["a.rs".into()] };
        assert_eq!(
            exec.perform(effect).unwrap(),
            Some(Event::FilesStaged { snapshot: "4b825dc".into() })
        );
        let diff = Effect::GetStagedDiff { paths: vec!["a.rs".into()] };
        exec.perform(diff).unwrap();
        assert_eq!(
            commands.calls(),
            vec!["git write-tree", "git add -A -- a.rs", "git diff --cached -- a.rs"]
        );
    }

    #[test]
    fn interactive_edit_returns_the_saved_message() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::new(vec![
            Answer::Edit(Some("fix: better\n".into())),
            Answer::Edit(None),
        ]);
        let mut exec = interactive(&commands, &terminal);

        let effect = Effect::EditCommitMessage { message: "fix: draft".into() };
        assert_eq!(
            exec.perform(effect.clone()).unwrap(),
            Some(Event::CommitEdited { message: "fix: better\n".into() })
        );
        assert_eq!(exec.perform(effect).unwrap(), Some(Event::UserCancelled));
        assert_eq!(terminal.prompts(), vec!["fix: draft", "fix: draft"]);
    }

    #[test]
    fn declined_merge_never_reaches_gh() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::new(vec![Answer::Confirm(Some(false))]);
        let mut exec = interactive(&commands, &terminal);

        assert_eq!(
            exec.perform(Effect::ConfirmMerge { pr_url: "https://pr/1".into() }).unwrap(),
            Some(Event::MergeConfirmed { accepted: false })
        );
        assert_eq!(terminal.prompts(), vec!["Merge https://pr/1 now (squash)?"]);
        assert!(commands.calls().is_empty());
    }

    #[test]
    fn post_commit_menu_names_the_branch() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::new(vec![Answer::Select(Some(2))]);
        let mut exec = interactive(&commands, &terminal);

        let pr_url = Some("https://pr/3".to_string());
        let effect = Effect::PromptPostCommit { branch: "feat/x".into(), pr_url };
        assert_eq!(
            exec.perform(effect).unwrap(),
            Some(Event::PostCommitChoice { choice: PostCommitChoice::CommitMore })
        );
        assert_eq!(terminal.prompts(), vec!["What next for feat/x?"]);
        let shown = (Tone::Info, "Open pull request: https://pr/3".to_string());
        assert_eq!(terminal.messages(), vec![shown]);
    }

    #[test]
    fn post_commit_choice_follows_goal() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let mut exec = with_goal(&commands, &terminal, Goal::Push, false);

        assert_eq!(
            exec.perform(Effect::PromptPostCommit { branch: "b".into(), pr_url: None }).unwrap(),
            Some(Event::PostCommitChoice { choice: PostCommitChoice::PushOnly })
        );
    }

    #[test]
    fn first_stack_commit_creates_branch_and_commits_its_files() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let mut exec = with_goal(&commands, &terminal, Goal::Local, true);

        let effect = Effect::ExecuteStackCommit {
            group: StackGroup { files: vec!["a.rs".into()], message: "feat: a\n\nbody".into() },
            index: 0,
            total: 2,
            branch: "feat/x".into(),
            create_branch: true,
        };
        assert_eq!(exec.perform(effect).unwrap(), Some(Event::StackCommitDone { next_index: 1 }));
        assert_eq!(
            commands.calls(),
            vec![
                "git checkout -b feat/x",
                "git add -A -- a.rs",
                "git commit --quiet -m feat: a\n\nbody -- a.rs",
            ]
        );
        assert_eq!(terminal.messages(), vec![(Tone::Info, "[1/2] feat: a".to_string())]);
    }

    #[test]
    fn cleanup_and_logging_produce_no_event() {
        let commands = FakeCommands::new();
        let terminal = ScriptedTerminal::default();
        let mut exec = interactive(&commands, &terminal);

        let staged = Staged { paths: vec!["a.rs".into()], snapshot: "4b825dc".into() };
        assert_eq!(exec.perform(Effect::UnstageAll { staged }).unwrap(), None);
        let nothing = Effect::UnstageAll { staged: Staged::default() };
        assert_eq!(exec.perform(nothing).unwrap(), None);
        assert_eq!(exec.perform(Effect::success("ok")).unwrap(), None);
        assert_eq!(commands.calls(), vec!["git reset --quiet 4b825dc -- a.rs"]);
        assert_eq!(terminal.messages(), vec![(Tone::Success, "ok".to_string())]);
    }
}
