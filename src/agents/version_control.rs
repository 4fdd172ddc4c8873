use crate::agents::command_runner::{CommandOutput, CommandRunner, RunOptions};
use crate::error::Result;
use std::time::Duration;

/// VersionControlAgent handles the git operations around each package update.
pub struct VersionControlAgent<'a> {
    runner: &'a dyn CommandRunner,
    timeout: Duration,
}

impl<'a> VersionControlAgent<'a> {
    pub fn new(runner: &'a dyn CommandRunner, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    /// Check that we are inside a git working tree
    pub fn is_repository(&self) -> Result<bool> {
        let output = self.run_git(&["rev-parse", "--git-dir"])?;
        Ok(output.success())
    }

    /// Check for uncommitted changes to tracked files
    pub fn has_uncommitted_changes(&self) -> Result<bool> {
        let output = self.run_git(&["diff-index", "--quiet", "HEAD", "--"])?;
        Ok(!output.success())
    }

    pub fn checkout(&self, branch: &str) -> Result<bool> {
        let output = self.run_git(&["checkout", branch, "-q"])?;
        Ok(output.success())
    }

    /// Create `branch` from the current HEAD and switch to it
    pub fn create_branch(&self, branch: &str) -> Result<bool> {
        let output = self.run_git(&["checkout", "-b", branch, "-q"])?;
        Ok(output.success())
    }

    /// Force-delete a local branch; a missing branch is not an error
    pub fn delete_branch(&self, branch: &str) -> Result<bool> {
        let output = self.run_git(&["branch", "-D", branch])?;
        Ok(output.success())
    }

    /// Check whether the working tree differs from HEAD
    pub fn has_diff_against_head(&self) -> Result<bool> {
        let output = self.run_git(&["diff", "--quiet", "HEAD"])?;
        Ok(!output.success())
    }

    /// Force-push `branch` to origin, streaming git's output
    pub fn force_push(&self, branch: &str) -> Result<bool> {
        let output = self.runner.run(
            "git",
            &["push", "origin", branch, "--force"],
            RunOptions::inherited(self.timeout),
        )?;
        Ok(output.success())
    }

    fn run_git(&self, args: &[&str]) -> Result<CommandOutput> {
        self.runner
            .run("git", args, RunOptions::captured(self.timeout))
    }
}

/// Branch that isolates the update commit of one package.
pub fn update_branch_name(package: &str) -> String {
    format!("update/{package}")
}
