//! Commit, pull request and stacked-commit payloads.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::git_context::FileEntry;

const FALLBACK_BRANCH: &str = "gitship/changes";
const MAX_BRANCH_LEN: usize = 60;

/// Everything needed to commit and open a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub branch_name: String,
    pub commit_message: String,
    pub pr_title: String,
    pub pr_body: String,
}

impl CommitDetails {
    /// Normalize free-form fields into usable values.
    ///
    /// The PR title falls back to the commit subject and the PR body to the
    /// commit body.
    pub fn normalized(self) -> CommitDetails {
        let commit_message = normalize_message(&self.commit_message);
        let (subject, body) = split_message(&commit_message);
        let pr_title = match normalize_line(&self.pr_title) {
            title if title.is_empty() => subject.to_string(),
            title => title,
        };
        let pr_body = match self.pr_body.trim() {
            "" => body.to_string(),
            text => text.to_string(),
        };
        CommitDetails {
            branch_name: sanitize_branch_name(&self.branch_name),
            commit_message,
            pr_title,
            pr_body,
        }
    }

    /// Replace the commit message, keeping everything else.
    pub fn with_message(&self, message: &str) -> CommitDetails {
        CommitDetails { commit_message: normalize_message(message), ..self.clone() }
    }

    /// Details describing this commit plus a `later` one on the same branch.
    ///
    /// Messages are joined in commit order and the first pull request title is
    /// kept; the later title and body are appended to the pull request body.
    pub fn followed_by(&self, later: &CommitDetails) -> CommitDetails {
        let addition = match later.pr_body.trim() {
            "" => format!("- {}", later.pr_title),
            body => format!("- {}\n\n{}", later.pr_title, body),
        };
        let pr_body = match self.pr_body.trim() {
            "" => addition,
            body => format!("{}\n\n{}", body, addition),
        };
        CommitDetails {
            branch_name: later.branch_name.clone(),
            commit_message: format!("{}\n{}", self.commit_message, later.commit_message),
            pr_title: self.pr_title.clone(),
            pr_body,
        }
    }
}

/// Pull request title and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrDetails {
    pub title: String,
    pub body: String,
}

impl PrDetails {
    pub fn normalized(self) -> Option<PrDetails> {
        let title = normalize_line(&self.title);
        if title.is_empty() {
            return None;
        }
        Some(PrDetails { title, body: self.body.trim().to_string() })
    }
}

/// One atomic commit inside a stack plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackGroup {
    pub files: Vec<String>,
    pub message: String,
}

/// Ordered commits sharing one branch and pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackPlan {
    pub groups: Vec<StackGroup>,
    pub branch_name: String,
    pub pr_title: String,
    pub pr_body: String,
}

impl StackPlan {
    /// Force the plan to partition `files` exactly.
    ///
    /// Paths outside the change set and repeated paths are dropped, files the
    /// plan forgot are appended to the last group, and empty groups vanish.
    /// Returns `None` when no group survives.
    pub fn reconcile(self, files: &[FileEntry]) -> Option<StackPlan> {
        let known: HashSet<&str> = files.iter().map(|f| f.path.as_str()).collect();
        let mut seen: HashSet<String> = HashSet::new();

        let mut groups: Vec<StackGroup> = self
            .groups
            .into_iter()
            .map(|group| {
                let files = group
                    .files
                    .into_iter()
                    .filter(|path| known.contains(path.as_str()) && seen.insert(path.clone()))
                    .collect();
                StackGroup { files, message: normalize_message(&group.message) }
            })
            .filter(|group: &StackGroup| !group.files.is_empty() && !group.message.is_empty())
            .collect();

        let leftovers: Vec<String> = files
            .iter()
            .filter(|f| !seen.contains(&f.path))
            .map(|f| f.path.clone())
            .collect();
        if !leftovers.is_empty() {
            match groups.last_mut() {
                Some(last) => last.files.extend(leftovers),
                None => return None,
            }
        }

        if groups.is_empty() {
            return None;
        }

        let first_subject = split_message(&groups[0].message).0.to_string();
        let pr_title = match normalize_line(&self.pr_title) {
            title if title.is_empty() => first_subject,
            title => title,
        };
        Some(StackPlan {
            groups,
            branch_name: sanitize_branch_name(&self.branch_name),
            pr_title,
            pr_body: self.pr_body.trim().to_string(),
        })
    }

    /// Commit messages of every group, joined in commit order.
    pub fn combined_message(&self) -> String {
        self.groups.iter().map(|g| g.message.as_str()).collect::<Vec<_>>().join("\n")
    }

    /// Single-commit view of the whole stack, used once every group is committed.
    pub fn combined_details(&self, branch: &str) -> CommitDetails {
        CommitDetails {
            branch_name: branch.to_string(),
            commit_message: self.combined_message(),
            pr_title: self.pr_title.clone(),
            pr_body: self.pr_body.clone(),
        }
    }
}

/// Trim a commit message, dropping wrapping code fences or quotes.
pub fn normalize_message(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(inner) = text.strip_prefix("```") {
        let inner = inner.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
        text = inner.strip_suffix("```").unwrap_or(inner).trim();
    }
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            text = text[1..text.len() - 1].trim();
        }
    }
    text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n")
}

/// Subject line and remaining body of a commit message.
pub fn split_message(message: &str) -> (&str, &str) {
    match message.split_once('\n') {
        Some((subject, body)) => (subject.trim(), body.trim()),
        None => (message.trim(), ""),
    }
}

fn normalize_line(raw: &str) -> String {
    raw.lines().next().unwrap_or("").trim().trim_matches('"').trim().to_string()
}

/// Turn arbitrary text into a valid, readable branch name.
pub fn sanitize_branch_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    let mut last_dash = false;
    for ch in raw.trim().to_lowercase().chars() {
        match ch {
            'a'..='z' | '0'..='9' | '/' | '.' | '_' => {
                name.push(ch);
                last_dash = false;
            }
            _ if !last_dash && !name.is_empty() && !name.ends_with('/') => {
                name.push('-');
                last_dash = true;
            }
            _ => {}
        }
    }

    while name.contains("//") {
        name = name.replace("//", "/");
    }
    while name.contains("..") {
        name = name.replace("..", ".");
    }
    let mut name: String = name.chars().take(MAX_BRANCH_LEN).collect();
    while name.ends_with(['-', '/', '.']) {
        name.pop();
    }
    let name = name.trim_start_matches(['-', '/', '.']).to_string();

    if name.is_empty() { FALLBACK_BRANCH.to_string() } else { name }
}
