use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "nixkit-update",
    about = "Check every flake package for upstream updates and open pull requests in CI",
    version,
    author
)]
pub struct Cli {
    /// Path to the flake repository (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Echo every external command before running it
    #[arg(short, long)]
    pub verbose: bool,

    /// Only check these flake attributes, comma-separated; `*` and `?` match
    /// any run or single character (e.g. "hello,python3-*")
    #[arg(long, value_name = "ATTRS")]
    pub filter: Option<String>,

    /// Manage branches and pull requests even when CI is not set
    #[arg(long)]
    pub ci: bool,

    /// Main line branch that update branches start from
    #[arg(long, value_name = "BRANCH", default_value = "main")]
    pub base: String,

    /// Timeout in seconds for every external command
    #[arg(long, value_name = "SECS", default_value_t = 600)]
    pub timeout: u64,

    /// Write the per-package results as JSON to this file
    #[arg(long = "json-report", value_name = "FILE")]
    pub json_report: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_run() {
        let cli = Cli::parse_from(["nixkit-update"]);
        assert_eq!(cli.path, ".");
        assert_eq!(cli.base, "main");
        assert_eq!(cli.timeout, 600);
        assert!(!cli.ci);
        assert!(cli.filter.is_none());
    }

    #[test]
    fn parses_all_options() {
        let cli = Cli::parse_from([
            "nixkit-update",
            "--ci",
            "--filter",
            "python-*",
            "--base",
            "master",
            "--timeout",
            "30",
            "--json-report",
            "out.json",
            "-v",
        ]);
        assert!(cli.ci);
        assert!(cli.verbose);
        assert_eq!(cli.filter.as_deref(), Some("python-*"));
        assert_eq!(cli.base, "master");
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.json_report, Some(PathBuf::from("out.json")));
    }
}
