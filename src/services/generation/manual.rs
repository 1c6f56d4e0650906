//! Generator that asks the user to type everything.

use crate::domain::details::{sanitize_branch_name, split_message};
use crate::domain::{AppError, CommitDetails, FileEntry, PrDetails, StackGroup, StackPlan};
use crate::ports::{Generator, Terminal};

pub struct ManualGenerator<'a, T: Terminal + ?Sized> {
    terminal: &'a T,
}

impl<'a, T: Terminal + ?Sized> ManualGenerator<'a, T> {
    pub fn new(terminal: &'a T) -> Self {
        Self { terminal }
    }

    fn required(&self, prompt: &str, default: Option<&str>) -> Result<Option<String>, AppError> {
        Ok(self
            .terminal
            .input(prompt, default)?
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }

    fn optional(&self, prompt: &str, default: &str) -> Result<Option<String>, AppError> {
        Ok(self.terminal.input(prompt, Some(default))?.map(|value| value.trim().to_string()))
    }

    fn try_commit_details(&self) -> Result<Option<CommitDetails>, AppError> {
        let Some(message) = self.required("Commit message", None)? else {
            return Ok(None);
        };
        let (subject, body) = split_message(&message);
        let suggested = sanitize_branch_name(subject);
        let Some(branch_name) = self.required("Branch name", Some(&suggested))? else {
            return Ok(None);
        };
        let Some(pr_title) = self.optional("Pull request title", subject)? else {
            return Ok(None);
        };
        let Some(pr_body) = self.optional("Pull request body", body)? else {
            return Ok(None);
        };
        Ok(Some(
            CommitDetails { branch_name, commit_message: message, pr_title, pr_body }
                .normalized(),
        ))
    }

    fn try_pr_details(&self) -> Result<Option<PrDetails>, AppError> {
        let Some(title) = self.required("Pull request title", None)? else {
            return Ok(None);
        };
        let Some(body) = self.optional("Pull request body", "")? else {
            return Ok(None);
        };
        Ok(PrDetails { title, body }.normalized())
    }

    fn try_stack_plan(&self, files: &[FileEntry]) -> Result<Option<StackPlan>, AppError> {
        let Some(details) = self.try_commit_details()? else {
            return Ok(None);
        };
        let plan = StackPlan {
            groups: vec![StackGroup {
                files: files.iter().map(|f| f.path.clone()).collect(),
                message: details.commit_message,
            }],
            branch_name: details.branch_name,
            pr_title: details.pr_title,
            pr_body: details.pr_body,
        };
        Ok(plan.reconcile(files))
    }
}

fn settle<V>(result: Result<Option<V>, AppError>) -> Option<V> {
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "manual input failed");
        None
    })
}

impl<T: Terminal + ?Sized> Generator for ManualGenerator<'_, T> {
    fn commit_details(&self, _diff: &str) -> Option<CommitDetails> {
        settle(self.try_commit_details())
    }

    fn pr_details(&self, _diff: &str) -> Option<PrDetails> {
        settle(self.try_pr_details())
    }

    fn stack_plan(&self, files: &[FileEntry], _diff: &str) -> Option<StackPlan> {
        settle(self.try_stack_plan(files))
    }
}
