//! Repository snapshot and working-tree file listing.

use std::fmt;

/// Snapshot of repository state captured at preflight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GitContext {
    /// Current branch name.
    pub branch: String,
    /// Name of the trunk branch (e.g. `main`).
    pub trunk: String,
    /// Ref that unmerged work is measured against (`origin/main` or `main`).
    pub base_ref: String,
    pub on_trunk: bool,
    pub has_staged: bool,
    pub has_unstaged: bool,
    pub has_untracked: bool,
    /// Any of staged, unstaged or untracked.
    pub has_changes: bool,
    pub has_upstream: bool,
    /// Local commits not yet on the remote tracking branch.
    pub unpushed_count: u32,
    /// Local commits not yet merged into trunk.
    pub unmerged_count: u32,
    /// Raw `git ls-files --others --exclude-standard` listing.
    pub untracked_files: String,
}

impl GitContext {
    /// True when neither uncommitted changes nor unshipped commits exist.
    pub fn nothing_pending(&self) -> bool {
        !self.has_changes && self.unpushed_count == 0 && self.unmerged_count == 0
    }

    /// Context after a commit landed on `branch`.
    pub fn after_commit(&self, branch: &str, commits: u32) -> GitContext {
        GitContext {
            branch: branch.to_string(),
            on_trunk: false,
            unpushed_count: self.unpushed_count + commits,
            unmerged_count: self.unmerged_count + commits,
            ..self.clone()
        }
    }

    /// Context after the current branch was pushed with upstream tracking.
    pub fn after_push(&self) -> GitContext {
        GitContext { has_upstream: true, unpushed_count: 0, ..self.clone() }
    }
}

/// Status tag of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Staged,
    Modified,
    New,
}

impl FileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Staged => "staged",
            FileStatus::Modified => "modified",
            FileStatus::New => "new",
        }
    }
}

/// A changed file in the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub status: FileStatus,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self { path: path.into(), status }
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.label(), self.path)
    }
}

/// Flags derived from `git status --porcelain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags {
    pub staged: bool,
    pub unstaged: bool,
    pub untracked: bool,
}

/// Summarize porcelain v1 output into staged/unstaged/untracked flags.
pub fn parse_status_flags(porcelain: &str) -> StatusFlags {
    let mut flags = StatusFlags::default();
    for line in porcelain.lines() {
        let mut codes = line.chars();
        let (Some(x), Some(y)) = (codes.next(), codes.next()) else {
            continue;
        };
        if x == '?' && y == '?' {
            flags.untracked = true;
            continue;
        }
        if x != ' ' && x != '!' {
            flags.staged = true;
        }
        if y != ' ' && y != '!' {
            flags.unstaged = true;
        }
    }
    flags
}

/// Parse porcelain v1 output into one entry per path.
///
/// A path with unstaged edits is reported as `Modified` even when part of it
/// is staged; renames report the destination path.
pub fn parse_file_entries(porcelain: &str) -> Vec<FileEntry> {
    porcelain
        .lines()
        .filter_map(|line| {
            if line.len() < 4 {
                return None;
            }
            let (codes, rest) = line.split_at(3);
            let mut codes = codes.chars();
            let x = codes.next()?;
            let y = codes.next()?;
            let path = match rest.split_once(" -> ") {
                Some((_, to)) => to,
                None => rest,
            };
            let path = unquote(path.trim());
            if path.is_empty() {
                return None;
            }
            let status = match (x, y) {
                ('?', '?') => FileStatus::New,
                ('!', '!') => return None,
                (_, y) if y != ' ' => FileStatus::Modified,
                _ => FileStatus::Staged,
            };
            Some(FileEntry::new(path, status))
        })
        .collect()
}

fn unquote(path: &str) -> String {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .map(|p| p.replace("\\\"", "\"").replace("\\\\", "\\"))
        .unwrap_or_else(|| path.to_string())
}

/// Parse a `git rev-list --count` result.
pub fn parse_count(output: &str) -> Option<u32> {
    output.trim().parse().ok()
}

/// Derive trunk name from `git symbolic-ref refs/remotes/origin/HEAD` output.
pub fn trunk_from_remote_head(output: &str) -> Option<String> {
    output
        .trim()
        .strip_prefix("refs/remotes/origin/")
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
