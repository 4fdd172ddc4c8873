use crate::cli::Cli;
use crate::error::{Result, UpdaterError};
use crate::utils::flake_root;
use crate::utils::package_filter::PackageFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for a single run, resolved once from the command line and environment.
#[derive(Debug)]
pub struct RunConfig {
    pub project_path: PathBuf,
    /// Branch and pull request management without prompts.
    pub automated: bool,
    pub base_branch: String,
    pub timeout: Duration,
    pub filter: Option<PackageFilter>,
    pub verbose: bool,
    pub json_report: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_cli(cli: Cli, ci_env: Option<String>) -> Result<Self> {
        let project_path = flake_root::locate(&cli.path)?;

        let base_branch = cli.base.trim().to_string();
        if base_branch.is_empty() {
            return Err(UpdaterError::Configuration(
                "Base branch cannot be empty".to_string(),
            ));
        }

        if cli.timeout == 0 {
            return Err(UpdaterError::Configuration(
                "Timeout must be at least one second".to_string(),
            ));
        }

        let filter = cli.filter.as_deref().map(PackageFilter::parse).transpose()?;

        Ok(Self {
            project_path,
            automated: cli.ci || is_set(ci_env.as_deref()),
            base_branch,
            timeout: Duration::from_secs(cli.timeout),
            filter,
            verbose: cli.verbose,
            json_report: cli.json_report,
        })
    }

    pub fn includes(&self, package: &str) -> bool {
        self.filter
            .as_ref()
            .is_none_or(|matcher| matcher.matches(package))
    }
}

/// Any non-empty `CI` value counts, including `0` and `false`.
fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
