use crate::agents::command_runner::{CommandOutput, CommandRunner, RunOptions};
use std::time::Duration;

/// Only accept plain `MAJOR.MINOR.PATCH` releases from upstream tags.
pub const VERSION_REGEX: &str = r".*?(\d+\.\d+\.\d+)$";

/// nix-update reports this when a package has no usable release to pin.
pub const UNKNOWN_VERSION_MARKER: &str = "Please specify the version";

/// UpdateHelperAgent drives nix-update for a single package.
pub struct UpdateHelperAgent<'a> {
    runner: &'a dyn CommandRunner,
    timeout: Duration,
}

impl<'a> UpdateHelperAgent<'a> {
    pub fn new(runner: &'a dyn CommandRunner, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    /// Bump to the newest tagged release, build it and commit the change
    pub fn update_release(&self, package: &str) -> CommandOutput {
        self.run(&[
            package,
            "--flake",
            "--build",
            "--commit",
            "--version-regex",
            VERSION_REGEX,
        ])
    }

    /// Track the latest commit of the default branch at `url`
    pub fn update_to_branch(&self, package: &str, url: &str) -> CommandOutput {
        self.run(&[
            package,
            "--flake",
            "--build",
            "--commit",
            "--version=branch",
            "--url",
            url,
        ])
    }

    fn run(&self, args: &[&str]) -> CommandOutput {
        // A helper that cannot even start is reported like any other helper failure.
        self.runner
            .run("nix-update", args, RunOptions::captured(self.timeout))
            .unwrap_or_else(|e| CommandOutput::new(1, "", e.to_string()))
    }
}

/// Whether a failed release update should be retried in branch mode.
pub fn needs_branch_mode(output: &CommandOutput) -> bool {
    !output.success() && output.combined().contains(UNKNOWN_VERSION_MARKER)
}
