use crate::agents::command_runner::{CommandRunner, RunOptions};
use crate::error::{Result, UpdaterError};
use std::time::Duration;

/// NixEvaluatorAgent queries the flake for the platform and its packages.
pub struct NixEvaluatorAgent<'a> {
    runner: &'a dyn CommandRunner,
    timeout: Duration,
}

impl<'a> NixEvaluatorAgent<'a> {
    pub fn new(runner: &'a dyn CommandRunner, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    /// Current platform identifier, e.g. `x86_64-linux`
    pub fn current_system(&self) -> Result<String> {
        let output = self.runner.run(
            "nix",
            &["eval", "--impure", "--raw", "--expr", "builtins.currentSystem"],
            RunOptions::captured(self.timeout),
        )?;

        let system = output.stdout.trim();
        if !output.success() || system.is_empty() {
            return Err(UpdaterError::Discovery(
                "Failed to determine system".to_string(),
            ));
        }
        Ok(system.to_string())
    }

    /// Names of all packages the flake exposes for `system`
    pub fn packages(&self, system: &str) -> Result<Vec<String>> {
        let attr = format!(".#packages.{system}");
        let output = self.runner.run(
            "nix",
            &["eval", "--json", &attr, "--apply", "builtins.attrNames"],
            RunOptions::captured(self.timeout),
        )?;

        if !output.success() {
            return Err(UpdaterError::Discovery(
                "Failed to get packages from flake".to_string(),
            ));
        }

        // Only stdout: nix prints evaluation warnings on stderr.
        serde_json::from_str(&output.stdout).map_err(|e| {
            UpdaterError::Discovery(format!("Unexpected package list from flake: {e}"))
        })
    }

    /// `meta.homepage` of a package, if it has a non-empty one
    pub fn homepage(&self, system: &str, package: &str) -> Option<String> {
        let attr = format!(".#packages.{system}.{package}.meta.homepage");
        let output = self
            .runner
            .run("nix", &["eval", "--raw", &attr], RunOptions::captured(self.timeout))
            .ok()?;

        let homepage = output.stdout.trim();
        (output.success() && !homepage.is_empty()).then(|| homepage.to_string())
    }
}
