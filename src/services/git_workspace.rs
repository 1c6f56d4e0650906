//! Git queries and mutations expressed over a `CommandRunner`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::git_context::{
    parse_count, parse_file_entries, parse_status_flags, trunk_from_remote_head,
};
use crate::domain::{AppError, FileEntry, GitContext};
use crate::ports::CommandRunner;

const GIT: &str = "git";
const MAX_UNTRACKED_FILE_BYTES: u64 = 64 * 1024;

/// Git operations the executor needs, rooted at one repository.
pub struct GitWorkspace<'a, C: CommandRunner> {
    runner: &'a C,
    root: PathBuf,
}

impl<'a, C: CommandRunner> GitWorkspace<'a, C> {
    pub fn new(runner: &'a C, root: impl Into<PathBuf>) -> Self {
        Self { runner, root: root.into() }
    }

    fn git(&self, args: &[&str]) -> Result<String, AppError> {
        self.runner.capture(GIT, args)
    }

    fn ref_exists(&self, reference: &str) -> bool {
        self.runner.succeeds(GIT, &["rev-parse", "--verify", "--quiet", reference])
    }

    pub fn is_repository(&self) -> bool {
        self.runner.succeeds(GIT, &["rev-parse", "--is-inside-work-tree"])
    }

    /// Trunk branch name: origin's HEAD, else `main`, else `master`.
    pub fn trunk(&self) -> String {
        if let Ok(head) = self.git(&["symbolic-ref", "--quiet", "refs/remotes/origin/HEAD"])
            && let Some(name) = trunk_from_remote_head(&head)
        {
            return name;
        }
        for candidate in ["main", "master"] {
            if self.ref_exists(&format!("refs/heads/{}", candidate))
                || self.ref_exists(&format!("refs/remotes/origin/{}", candidate))
            {
                return candidate.to_string();
            }
        }
        "main".to_string()
    }

    /// Capture a complete `GitContext`.
    pub fn context(&self) -> Result<GitContext, AppError> {
        let branch = self.git(&["branch", "--show-current"])?;
        if branch.is_empty() {
            return Err(AppError::Repository(
                "HEAD is detached; check out a branch first".to_string(),
            ));
        }

        let trunk = self.trunk();
        let remote_trunk = format!("origin/{}", trunk);
        let base_ref = if self.ref_exists(&format!("refs/remotes/{}", remote_trunk)) {
            remote_trunk
        } else {
            trunk.clone()
        };
        let on_trunk = branch == trunk;

        let flags = parse_status_flags(&self.git(&["status", "--porcelain"])?);
        let untracked_files = self.git(&["ls-files", "--others", "--exclude-standard"])?;
        let has_upstream = self.runner.succeeds(
            GIT,
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
        );

        let unmerged_count = if on_trunk { 0 } else { self.count(&format!("{}..HEAD", base_ref)) };
        let unpushed_count = if has_upstream {
            self.count("@{u}..HEAD")
        } else if on_trunk {
            0
        } else {
            unmerged_count
        };

        Ok(GitContext {
            branch,
            trunk,
            base_ref,
            on_trunk,
            has_staged: flags.staged,
            has_unstaged: flags.unstaged,
            has_untracked: flags.untracked,
            has_changes: flags.staged || flags.unstaged || flags.untracked,
            has_upstream,
            unpushed_count,
            unmerged_count,
            untracked_files,
        })
    }

    fn count(&self, range: &str) -> u32 {
        self.git(&["rev-list", "--count", range]).ok().and_then(|out| parse_count(&out)).unwrap_or(0)
    }

    /// Fetch the upstream and count commits HEAD is missing.
    pub fn behind_upstream(&self) -> Result<u32, AppError> {
        self.git(&["fetch", "--quiet"])?;
        let output = self.git(&["rev-list", "--count", "HEAD..@{u}"])?;
        parse_count(&output).ok_or_else(|| AppError::ParseError {
            what: "behind count".into(),
            details: format!("Value: '{}'", output),
        })
    }

    pub fn changed_files(&self) -> Result<Vec<FileEntry>, AppError> {
        Ok(parse_file_entries(&self.git(&["status", "--porcelain", "--untracked-files=all"])?))
    }

    pub fn commit_log(&self, range: &str) -> Result<String, AppError> {
        self.git(&["log", "--oneline", "--no-decorate", range])
    }

    /// Write the current index as a tree object and return its id.
    pub fn index_snapshot(&self) -> Result<String, AppError> {
        self.git(&["write-tree"])
    }

    pub fn stage(&self, paths: &[String]) -> Result<(), AppError> {
        self.git(&with_paths(&["add", "-A"], paths)).map(|_| ())
    }

    /// Reset the index entries of `paths` to their state in `snapshot`.
    pub fn restore_index(&self, snapshot: &str, paths: &[String]) -> Result<(), AppError> {
        if paths.is_empty() {
            return Ok(());
        }
        self.git(&with_paths(&["reset", "--quiet", snapshot], paths)).map(|_| ())
    }

    pub fn staged_diff(&self, paths: &[String]) -> Result<String, AppError> {
        self.git(&with_paths(&["diff", "--cached"], paths))
    }

    /// Diff of the branch since it forked from `base_ref`.
    pub fn diff_since(&self, base_ref: &str) -> Result<String, AppError> {
        self.git(&["diff", &format!("{}...HEAD", base_ref)])
    }

    /// Diff of every uncommitted change, untracked files included.
    pub fn working_diff(&self, files: &[FileEntry]) -> Result<String, AppError> {
        let mut diff = if self.ref_exists("HEAD") {
            self.git(&["diff", "HEAD"])?
        } else {
            self.git(&["diff", "--cached"])?
        };
        for entry in files.iter().filter(|f| f.status == crate::domain::FileStatus::New) {
            if let Some(text) = read_untracked(&self.root.join(&entry.path)) {
                diff.push_str(&new_file_diff(&entry.path, &text));
            }
        }
        Ok(diff)
    }

    pub fn create_branch(&self, branch: &str) -> Result<(), AppError> {
        self.git(&["checkout", "-b", branch]).map(|_| ())
    }

    /// Commit only `paths`; other staged entries stay in the index.
    pub fn commit(&self, message: &str, paths: &[String]) -> Result<(), AppError> {
        self.runner.stream(GIT, &with_paths(&["commit", "--quiet", "-m", message], paths))
    }

    pub fn push(&self, branch: &str, set_upstream: bool) -> Result<(), AppError> {
        if set_upstream {
            self.runner.stream(GIT, &["push", "--set-upstream", "origin", branch])
        } else {
            self.runner.stream(GIT, &["push", "origin", branch])
        }
    }

    /// Pull the upstream; the error carries git's output on failure.
    pub fn pull(&self) -> Result<String, AppError> {
        self.git(&["pull", "--no-rebase", "--no-edit"])
    }
}

/// `args`, then `--` and every path.
fn with_paths<'p>(args: &[&'p str], paths: &'p [String]) -> Vec<&'p str> {
    let mut all = args.to_vec();
    all.push("--");
    all.extend(paths.iter().map(String::as_str));
    all
}

fn read_untracked(path: &Path) -> Option<String> {
    let meta = fs::metadata(path).ok()?;
    if !meta.is_file() || meta.len() > MAX_UNTRACKED_FILE_BYTES {
        return None;
    }
    fs::read_to_string(path).ok()
}

fn new_file_diff(path: &str, text: &str) -> String {
    let mut out = format!("\ndiff --git a/{0} b/{0}\nnew file\n--- /dev/null\n+++ b/{0}\n", path);
    for line in text.lines() {
        out.push('+');
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// True when git's output reports conflicting content.
pub fn mentions_conflict(output: &str) -> bool {
    let lower = output.to_lowercase();
    lower.contains("conflict") || lower.contains("not possible to fast-forward")
}
