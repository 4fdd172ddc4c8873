use crate::agents::command_runner::{CommandRunner, RunOptions};
use crate::error::Result;
use std::time::Duration;

pub const OBSOLETE_PR_COMMENT: &str = "Package is already up to date";

/// State of the pull request whose head is an update branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrState {
    Open,
    NotFound,
    /// CLOSED, MERGED or anything else gh reports
    Other(String),
}

impl PrState {
    fn parse(state: &str) -> Self {
        match state.trim() {
            "OPEN" => PrState::Open,
            "" | "NOT_FOUND" => PrState::NotFound,
            other => PrState::Other(other.to_string()),
        }
    }
}

pub fn pr_title(package: &str, version_info: &str) -> String {
    format!("chore(deps): update {package} to {version_info}")
}

pub fn pr_body(package: &str, version_info: &str) -> String {
    format!("Automated update of {package} to {version_info}")
}

/// PullRequestAgent talks to GitHub through the gh CLI.
pub struct PullRequestAgent<'a> {
    runner: &'a dyn CommandRunner,
    timeout: Duration,
    base_branch: String,
}

impl<'a> PullRequestAgent<'a> {
    pub fn new(runner: &'a dyn CommandRunner, timeout: Duration, base_branch: impl Into<String>) -> Self {
        Self {
            runner,
            timeout,
            base_branch: base_branch.into(),
        }
    }

    /// Look up the PR for `branch`; any lookup failure counts as not found
    pub fn state(&self, branch: &str) -> PrState {
        match self.runner.run(
            "gh",
            &["pr", "view", branch, "--json", "state", "--jq", ".state"],
            RunOptions::captured(self.timeout),
        ) {
            Ok(output) if output.success() => PrState::parse(&output.stdout),
            _ => PrState::NotFound,
        }
    }

    pub fn create(&self, branch: &str, title: &str, body: &str) -> Result<bool> {
        let output = self.runner.run(
            "gh",
            &[
                "pr",
                "create",
                "--title",
                title,
                "--body",
                body,
                "--head",
                branch,
                "--base",
                &self.base_branch,
            ],
            RunOptions::inherited(self.timeout),
        )?;
        Ok(output.success())
    }

    pub fn edit(&self, branch: &str, title: &str, body: &str) -> Result<bool> {
        let output = self.runner.run(
            "gh",
            &["pr", "edit", branch, "--title", title, "--body", body],
            RunOptions::inherited(self.timeout),
        )?;
        Ok(output.success())
    }

    /// Close the PR and delete its remote branch
    pub fn close(&self, branch: &str) -> Result<bool> {
        let output = self.runner.run(
            "gh",
            &[
                "pr",
                "close",
                branch,
                "--comment",
                OBSOLETE_PR_COMMENT,
                "--delete-branch",
            ],
            RunOptions::captured(self.timeout),
        )?;
        Ok(output.success())
    }
}
