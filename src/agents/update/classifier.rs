//! Maps the exit code and text of an update helper run to an [`UpdateResult`].
//!
//! nix-update has no machine-readable output, so every rule here matches
//! literal fragments of its messages. Rules are checked in order.

use crate::agents::command_runner::TIMEOUT_EXIT_CODE;
use crate::agents::update::result::UpdateResult;
use regex::Regex;
use std::sync::LazyLock;

pub const ALREADY_UP_TO_DATE: &str = "Already up to date";
pub const NO_SOURCE_URL: &str = "No URL in src (local source)";
pub const TIMED_OUT: &str = "Timeout after 10 minutes";
pub const EVALUATION_ERROR: &str = "Nix evaluation error (complex versioning/dependencies)";

const NO_CHANGES_MARKER: &str = "No changes detected";
const NO_URL_MARKER: &str = "Could not find a url in the derivations src attribute";
const NOTHING_TO_DO_EXIT_CODE: i32 = 2;
const ERROR_EXCERPT_LINES: usize = 3;

static VERSION_SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Update (.*?) in").expect("version summary pattern is valid"));

pub fn classify(package: &str, exit_code: i32, output: &str) -> UpdateResult {
    if exit_code == 0 {
        return if is_update(output) {
            UpdateResult::success(package, extract_version_info(output))
        } else {
            UpdateResult::skipped(package, ALREADY_UP_TO_DATE)
        };
    }

    if exit_code == TIMEOUT_EXIT_CODE {
        return UpdateResult::failed(package, TIMED_OUT);
    }

    if exit_code == NOTHING_TO_DO_EXIT_CODE || output.contains(NO_CHANGES_MARKER) {
        return UpdateResult::skipped(package, ALREADY_UP_TO_DATE);
    }

    if output.contains(NO_URL_MARKER) {
        return UpdateResult::skipped(package, NO_SOURCE_URL);
    }

    let lower = output.to_lowercase();
    if lower.contains("error") && lower.contains("eval") {
        return UpdateResult::failed(package, EVALUATION_ERROR);
    }

    let excerpt: Vec<&str> = output.split('\n').take(ERROR_EXCERPT_LINES).collect();
    UpdateResult::failed(package, excerpt.join("\n"))
}

fn is_update(output: &str) -> bool {
    output.contains("Update") && output.contains("->") && !output.contains(NO_CHANGES_MARKER)
}

/// Text between `Update ` and ` in` of the helper's summary line.
pub fn extract_version_info(output: &str) -> String {
    VERSION_SUMMARY
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::update::result::UpdateStatus;

    #[test]
    fn update_line_is_success_with_version_info() {
        let output = "fetching source\nUpdate foo-1.0 -> 2.0 in pkgs/foo/default.nix\n";
        let result = classify("foo", 0, output);
        assert_eq!(result, UpdateResult::success("foo", "foo-1.0 -> 2.0"));
    }

    #[test]
    fn success_without_parsable_summary_is_unknown() {
        let result = classify("foo", 0, "Updated -> somewhere");
        assert_eq!(result.status, UpdateStatus::Success);
        assert_eq!(result.version_info.as_deref(), Some("unknown"));
    }

    #[test]
    fn exit_zero_with_no_changes_is_up_to_date() {
        let output = "Update foo 1.0 -> 1.0 in x\nNo changes detected, you might want to...";
        assert_eq!(
            classify("foo", 0, output),
            UpdateResult::skipped("foo", ALREADY_UP_TO_DATE)
        );
        assert_eq!(
            classify("foo", 0, "No changes detected"),
            UpdateResult::skipped("foo", ALREADY_UP_TO_DATE)
        );
    }

    #[test]
    fn exit_zero_without_marker_is_up_to_date() {
        assert_eq!(
            classify("foo", 0, "fetching https://example.org\n"),
            UpdateResult::skipped("foo", ALREADY_UP_TO_DATE)
        );
    }

    #[test]
    fn timeout_always_fails() {
        assert_eq!(
            classify("foo", 124, "Command timed out"),
            UpdateResult::failed("foo", TIMED_OUT)
        );
        assert_eq!(
            classify("foo", 124, "No changes detected"),
            UpdateResult::failed("foo", TIMED_OUT)
        );
    }

    #[test]
    fn exit_two_or_no_changes_is_skipped() {
        assert_eq!(
            classify("foo", 2, "whatever"),
            UpdateResult::skipped("foo", ALREADY_UP_TO_DATE)
        );
        assert_eq!(
            classify("foo", 1, "error: No changes detected"),
            UpdateResult::skipped("foo", ALREADY_UP_TO_DATE)
        );
    }

    #[test]
    fn local_source_is_skipped() {
        let output = "Traceback...\nValueError: Could not find a url in the derivations src attribute\n";
        assert_eq!(
            classify("foo", 1, output),
            UpdateResult::skipped("foo", NO_SOURCE_URL)
        );
    }

    #[test]
    fn evaluation_errors_are_summarised() {
        let output = "ERROR: nix-instantiate failed\nwhile evaluating the attribute 'src'";
        assert_eq!(
            classify("foo", 1, output),
            UpdateResult::failed("foo", EVALUATION_ERROR)
        );
    }

    #[test]
    fn other_failures_keep_first_three_lines() {
        let output = "line one\nline two\nline three\nline four\n";
        assert_eq!(
            classify("foo", 1, output),
            UpdateResult::failed("foo", "line one\nline two\nline three")
        );
    }

    #[test]
    fn extracts_first_summary_only() {
        let output = "Update bar: 0.1.0 -> 0.2.0 in flake.nix\nUpdate other in y";
        assert_eq!(extract_version_info(output), "bar: 0.1.0 -> 0.2.0");
    }

    #[test]
    fn summary_pattern_is_shared_across_calls() {
        let first: *const Regex = &*VERSION_SUMMARY;
        assert_eq!(extract_version_info("Update a 1 -> 2 in x"), "a 1 -> 2");
        assert_eq!(extract_version_info("no summary here"), "unknown");
        assert!(std::ptr::eq(first, &*VERSION_SUMMARY));
        assert_eq!(VERSION_SUMMARY.as_str(), r"Update (.*?) in");
    }
}
