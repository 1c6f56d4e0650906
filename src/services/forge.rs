//! Pull request operations through the `gh` CLI.

use crate::domain::{AppError, MergeStrategy};
use crate::ports::CommandRunner;

const GH: &str = "gh";

pub struct Forge<'a, C: CommandRunner> {
    runner: &'a C,
}

impl<'a, C: CommandRunner> Forge<'a, C> {
    pub fn new(runner: &'a C) -> Self {
        Self { runner }
    }

    pub fn is_available(&self) -> bool {
        self.runner.succeeds(GH, &["--version"])
    }

    /// URL of the open pull request whose head is `branch`, if any.
    ///
    /// `gh` exits non-zero when there is none, so any failure means "no PR".
    pub fn open_pr_url(&self, branch: &str) -> Option<String> {
        let output = self
            .runner
            .capture(GH, &[
                "pr",
                "view",
                branch,
                "--json",
                "url,state",
                "--jq",
                "select(.state == \"OPEN\") | .url",
            ])
            .ok()?;
        let url = output.trim();
        (!url.is_empty()).then(|| url.to_string())
    }

    pub fn create_pr(
        &self,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> Result<String, AppError> {
        let output = self.runner.capture(GH, &[
            "pr", "create", "--base", base, "--head", head, "--title", title, "--body", body,
        ])?;
        parse_pr_url(&output).ok_or_else(|| AppError::ParseError {
            what: "gh pr create output".into(),
            details: format!("No pull request URL in: '{}'", output),
        })
    }

    pub fn merge_pr(
        &self,
        pr_url: &str,
        strategy: MergeStrategy,
        delete_branch: bool,
    ) -> Result<(), AppError> {
        let mut args = vec!["pr", "merge", pr_url, strategy.flag()];
        if delete_branch {
            args.push("--delete-branch");
        }
        self.runner.capture(GH, &args).map(|_| ())
    }
}

/// Last line of `gh pr create` output that looks like a URL.
pub fn parse_pr_url(output: &str) -> Option<String> {
    output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with("https://") || line.starts_with("http://"))
        .map(str::to_string)
}
