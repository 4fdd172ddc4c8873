use crate::agents::command_runner::{CommandOutput, CommandRunner};
use crate::agents::nix_evaluator::NixEvaluatorAgent;
use crate::agents::pull_request::{PrState, PullRequestAgent, pr_body, pr_title};
use crate::agents::update::branch::UpdateBranch;
use crate::agents::update::classifier::classify;
use crate::agents::update::result::{UpdateResult, UpdateStatus};
use crate::agents::update_helper::{UpdateHelperAgent, needs_branch_mode};
use crate::agents::version_control::VersionControlAgent;
use crate::error::Result;
use crate::output;
use std::time::Duration;

pub const BRANCH_CREATION_FAILED: &str = "Failed to create branch";

/// PackageUpdater runs the update helper for one package at a time and, in
/// automated mode, publishes or cleans up the package's update branch.
pub struct PackageUpdater<'a> {
    nix: NixEvaluatorAgent<'a>,
    helper: UpdateHelperAgent<'a>,
    git: VersionControlAgent<'a>,
    prs: PullRequestAgent<'a>,
    system: String,
    base_branch: String,
    automated: bool,
    show_progress: bool,
}

impl<'a> PackageUpdater<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        timeout: Duration,
        system: impl Into<String>,
        base_branch: impl Into<String>,
        automated: bool,
    ) -> Self {
        let base_branch = base_branch.into();
        Self {
            nix: NixEvaluatorAgent::new(runner, timeout),
            helper: UpdateHelperAgent::new(runner, timeout),
            git: VersionControlAgent::new(runner, timeout),
            prs: PullRequestAgent::new(runner, timeout, base_branch.clone()),
            system: system.into(),
            base_branch,
            automated,
            show_progress: true,
        }
    }

    /// Draw a spinner while nix-update runs. Off when commands are echoed.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    #[cfg(test)]
    pub fn shows_progress(&self) -> bool {
        self.show_progress
    }

    pub fn update_package(&self, package: &str) -> UpdateResult {
        output::info(format!("Checking {package} for updates..."));

        if !self.automated {
            let attempt = self.attempt_update(package);
            return classify(package, attempt.exit_code, &attempt.combined());
        }

        let branch = match UpdateBranch::open(&self.git, &self.base_branch, package) {
            Ok(Some(branch)) => branch,
            Ok(None) | Err(_) => return UpdateResult::failed(package, BRANCH_CREATION_FAILED),
        };

        let attempt = self.attempt_update(package);
        let result = classify(package, attempt.exit_code, &attempt.combined());

        let settled = match result.status {
            UpdateStatus::Success => {
                let version_info = result.version_info.as_deref().unwrap_or("unknown");
                self.publish(package, branch.name(), version_info)
            }
            UpdateStatus::Skipped => branch.discard(package, true, &self.prs),
            UpdateStatus::Failed => branch.discard(package, false, &self.prs),
        };
        if let Err(e) = settled {
            output::warning(format!("Branch bookkeeping for {package} failed: {e}"));
        }

        result
    }

    /// Release update first; packages without tagged releases fall back to
    /// tracking the latest commit of their homepage repository.
    fn attempt_update(&self, package: &str) -> CommandOutput {
        let spinner = output::spinner(format!("nix-update {package}"), self.show_progress);
        let mut attempt = self.helper.update_release(package);

        if needs_branch_mode(&attempt) {
            spinner.suspend(|| {
                output::info(format!("{package} appears to be unstable, trying branch mode..."));
            });
            if let Some(homepage) = self.nix.homepage(&self.system, package) {
                attempt = self.helper.update_to_branch(package, &homepage);
            }
        }

        spinner.finish_and_clear();
        attempt
    }

    /// Push the update commit if the tree still differs from HEAD, then
    /// open or refresh the PR. The commit may already be in place from an
    /// earlier push, in which case only the PR is refreshed.
    fn publish(&self, package: &str, branch: &str, version_info: &str) -> Result<()> {
        if self.git.has_diff_against_head()? && !self.git.force_push(branch)? {
            output::warning(format!("Failed to push {branch}, not touching its PR"));
            return Ok(());
        }
        self.handle_pr(package, branch, version_info)
    }

    pub fn handle_pr(&self, package: &str, branch: &str, version_info: &str) -> Result<()> {
        let title = pr_title(package, version_info);
        let body = pr_body(package, version_info);

        match self.prs.state(branch) {
            PrState::Open => {
                output::info(format!("Updating existing PR for {package}"));
                self.prs.edit(branch, &title, &body)?;
            }
            PrState::NotFound => {
                output::info(format!("Creating PR for {package}"));
                self.prs.create(branch, &title, &body)?;
            }
            PrState::Other(state) => {
                output::info(format!("PR for {package} is {state}, leaving it alone"));
            }
        }
        Ok(())
    }
}
