//! Shared testing utilities for gitship CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway repository on `main` with one commit, plus an isolated config file.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        let ctx = Self { root, work_dir };
        ctx.git(&["init", "--initial-branch=main"]);
        ctx.git(&["config", "user.name", "Test User"]);
        ctx.git(&["config", "user.email", "test@example.com"]);
        ctx.git(&["config", "commit.gpgsign", "false"]);
        ctx.write_file("README.md", "# demo\n");
        ctx.git(&["add", "."]);
        ctx.git(&["commit", "--quiet", "-m", "initial commit"]);
        ctx
    }

    /// Emulated `$HOME`, outside the repository.
    pub fn home(&self) -> &Path {
        self.root.path()
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Path passed to the binary through `GITSHIP_CONFIG`.
    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("config").join("config.toml")
    }

    pub fn write_config(&self, content: &str) {
        let path = self.config_path();
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create config dir");
        fs::write(&path, content).expect("Failed to write config");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read config")
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.work_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write file");
    }

    /// Run git in the repository and return its trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn current_branch(&self) -> String {
        self.git(&["branch", "--show-current"])
    }

    /// Build a command for the compiled binary inside the repository.
    pub fn cli(&self) -> Command {
        self.cli_in(&self.work_dir)
    }

    /// Build a command for the compiled binary inside `dir`.
    ///
    /// Provider keys from the caller's environment are removed so runs are
    /// deterministic.
    pub fn cli_in<P: AsRef<Path>>(&self, dir: P) -> Command {
        let mut cmd = Command::cargo_bin("gitship").expect("Failed to locate gitship binary");
        cmd.current_dir(dir.as_ref())
            .env("HOME", self.home())
            .env("GITSHIP_CONFIG", self.config_path())
            .env_remove("ANTHROPIC_API_KEY")
            .env_remove("OPENAI_API_KEY")
            .env_remove("RUST_LOG");
        cmd
    }
}
