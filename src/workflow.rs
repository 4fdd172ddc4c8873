use crate::agents::update::interaction;
use crate::agents::{
    CommandRunner, NixEvaluatorAgent, PackageUpdater, SystemRunner, UpdateResult, UpdateStatus,
    VersionControlAgent,
};
use crate::config::RunConfig;
use crate::error::{Result, UpdaterError};
use crate::output;
use crate::report::{self, Summary};
use jiff::Timestamp;

/// Execute the full update run and return the process exit code
pub fn execute_update(config: &RunConfig) -> Result<i32> {
    let started = Timestamp::now();
    let runner = SystemRunner::new(&config.project_path, config.verbose);

    let mut confirm = interaction::confirm_continue;
    let results = run_update(config, &runner, &mut confirm)?;

    let summary = Summary::new(&results);
    summary.print(config.automated, Timestamp::now().duration_since(started));

    if let Some(path) = &config.json_report {
        report::write_json_report(path, &results)?;
        output::info(format!("Wrote report to {}", path.display()));
    }

    Ok(summary.exit_code())
}

/// Validate the repository, discover packages and update each of them in turn.
pub fn run_update(
    config: &RunConfig,
    runner: &dyn CommandRunner,
    confirm: &mut dyn FnMut() -> Result<()>,
) -> Result<Vec<UpdateResult>> {
    let git = VersionControlAgent::new(runner, config.timeout);
    if !git.is_repository()? {
        return Err(UpdaterError::NotARepository);
    }

    if !config.automated && git.has_uncommitted_changes()? {
        output::warning("Working directory has uncommitted changes.");
        if let Err(e) = confirm() {
            output::info("Aborted by user.");
            return Err(e);
        }
    }

    let (system, packages) = discover_packages(config, runner)?;
    println!();

    let updater = package_updater(config, runner, system);

    let mut results = Vec::with_capacity(packages.len());
    for package in &packages {
        let result = updater.update_package(package);
        log_result(&result);
        results.push(result);
        println!();
    }

    Ok(results)
}

fn package_updater<'a>(
    config: &'a RunConfig,
    runner: &'a dyn CommandRunner,
    system: String,
) -> PackageUpdater<'a> {
    PackageUpdater::new(
        runner,
        config.timeout,
        system,
        config.base_branch.as_str(),
        config.automated,
    )
    .with_progress(!config.verbose)
}

fn discover_packages(config: &RunConfig, runner: &dyn CommandRunner) -> Result<(String, Vec<String>)> {
    output::info("Discovering packages...");

    let nix = NixEvaluatorAgent::new(runner, config.timeout);
    let system = nix.current_system()?;
    let packages = nix.packages(&system)?;

    output::info(format!("Found packages: {}", packages.join(" ")));

    let selected: Vec<String> = packages
        .into_iter()
        .filter(|package| config.includes(package))
        .collect();
    if config.filter.is_some() {
        output::info(format!("Selected by filter: {}", selected.join(" ")));
    }

    Ok((system, selected))
}

fn log_result(result: &UpdateResult) {
    let package = &result.package;
    match result.status {
        UpdateStatus::Success => {
            let version = result
                .version_info
                .as_deref()
                .map(|v| format!(" ({v})"))
                .unwrap_or_default();
            output::success(format!("Successfully updated {package}{version}"));
        }
        UpdateStatus::Skipped => {
            output::warning(format!(
                "{package}: {}",
                result.error.as_deref().unwrap_or_default()
            ));
        }
        UpdateStatus::Failed => {
            output::error(format!("Failed to update {package}"));
            if let Some(error) = &result.error {
                println!("{error}");
            }
        }
    }
}
