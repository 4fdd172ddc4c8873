use crate::agents::{UpdateResult, UpdateStatus};
use crate::error::Result;
use crate::output::{Level, format_line};
use colored::Colorize;
use jiff::SignedDuration;
use std::fmt::Write as _;
use std::path::Path;

/// Results of a run grouped by status, in processing order.
pub struct Summary<'r> {
    successful: Vec<&'r UpdateResult>,
    skipped: Vec<&'r UpdateResult>,
    failed: Vec<&'r UpdateResult>,
}

impl<'r> Summary<'r> {
    pub fn new(results: &'r [UpdateResult]) -> Self {
        let pick = |status: UpdateStatus| -> Vec<&'r UpdateResult> {
            results.iter().filter(|r| r.status == status).collect()
        };
        Self {
            successful: pick(UpdateStatus::Success),
            skipped: pick(UpdateStatus::Skipped),
            failed: pick(UpdateStatus::Failed),
        }
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.successful.len(), self.skipped.len(), self.failed.len())
    }

    /// 1 if any package failed, otherwise 0
    pub fn exit_code(&self) -> i32 {
        if self.failed.is_empty() { 0 } else { 1 }
    }

    pub fn render(&self, automated: bool, elapsed: SignedDuration) -> String {
        let (succeeded, skipped, failed) = self.counts();
        let rule = "=".repeat(40);
        let mut out = String::new();

        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(out, "{}", "📊 Update Summary".blue());
        let _ = writeln!(out, "{rule}\n");

        if !self.successful.is_empty() {
            let header = format!("Successfully updated ({succeeded}):");
            let _ = writeln!(out, "{}", format_line(Level::Success, &header));
            for result in &self.successful {
                let version = result
                    .version_info
                    .as_deref()
                    .map(|v| format!(" ({v})"))
                    .unwrap_or_default();
                let _ = writeln!(out, "  ✅ {}{}", result.package, version);
            }
            out.push('\n');
        }

        if !self.skipped.is_empty() {
            let header = format!("Skipped ({skipped}):");
            let _ = writeln!(out, "{}", format_line(Level::Warning, &header));
            for result in &self.skipped {
                let reason = result
                    .error
                    .as_deref()
                    .map(|e| format!(" - {e}"))
                    .unwrap_or_default();
                let _ = writeln!(out, "  ⏭️  {}{}", result.package, reason);
            }
            out.push('\n');
        }

        if !self.failed.is_empty() {
            let header = format!("Failed ({failed}):");
            let _ = writeln!(out, "{}", format_line(Level::Error, &header));
            for result in &self.failed {
                let _ = writeln!(out, "  ❌ {}", result.package);
                if let Some(error) = &result.error {
                    let _ = writeln!(out, "     {error}");
                }
            }
            out.push('\n');
        } else if !self.successful.is_empty() {
            let _ = writeln!(out, "{}", "🎉 All updates completed successfully!".green());
            if !automated {
                let _ = writeln!(out, "{}", "💡 Don't forget to push: git push".blue());
            }
        } else {
            let _ = writeln!(out, "{}", "✨ All packages are up to date!".blue());
        }

        let _ = writeln!(out, "{}", format!("Finished in {}", format_elapsed(elapsed)).dimmed());
        out
    }

    pub fn print(&self, automated: bool, elapsed: SignedDuration) {
        print!("{}", self.render(automated, elapsed));
    }
}

/// Write all results as a JSON array for CI artifacts.
pub fn write_json_report(path: &Path, results: &[UpdateResult]) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn format_elapsed(elapsed: SignedDuration) -> String {
    let secs = elapsed.as_secs().max(0);
    match (secs / 3600, (secs % 3600) / 60, secs % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, m, s) => format!("{h}h {m}m {s}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn mixed_results() -> Vec<UpdateResult> {
        vec![
            UpdateResult::success("pkg-a", "1.2.3"),
            UpdateResult::skipped("pkg-b", "Already up to date"),
            UpdateResult::failed("pkg-c", "Timeout after 10 minutes"),
        ]
    }

    #[test]
    fn groups_mixed_run_and_fails() {
        let results = mixed_results();
        let summary = Summary::new(&results);
        assert_eq!(summary.counts(), (1, 1, 1));
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn exit_code_zero_without_failures() {
        let results = vec![
            UpdateResult::success("a", "1.0 -> 1.1"),
            UpdateResult::skipped("b", "No URL in src (local source)"),
        ];
        assert_eq!(Summary::new(&results).exit_code(), 0);
        assert_eq!(Summary::new(&[]).exit_code(), 0);
    }

    #[test]
    fn renders_each_group() {
        colored::control::set_override(false);
        let results = mixed_results();
        let text = Summary::new(&results).render(true, SignedDuration::from_secs(75));

        assert!(text.contains("📊 Update Summary"));
        assert!(text.contains("✅ Successfully updated (1):"));
        assert!(text.contains("  ✅ pkg-a (1.2.3)"));
        assert!(text.contains("⚠️ Skipped (1):"));
        assert!(text.contains("  ⏭️  pkg-b - Already up to date"));
        assert!(text.contains("❌ Failed (1):"));
        assert!(text.contains("  ❌ pkg-c\n     Timeout after 10 minutes"));
        assert!(!text.contains("🎉"));
        assert!(text.contains("Finished in 1m 15s"));
    }

    #[test]
    fn push_hint_only_outside_automation() {
        colored::control::set_override(false);
        let results = vec![UpdateResult::success("a", "1.0 -> 1.1")];
        let summary = Summary::new(&results);

        let local = summary.render(false, SignedDuration::ZERO);
        assert!(local.contains("🎉 All updates completed successfully!"));
        assert!(local.contains("git push"));

        let automated = summary.render(true, SignedDuration::ZERO);
        assert!(!automated.contains("git push"));
    }

    #[test]
    fn all_skipped_is_up_to_date() {
        colored::control::set_override(false);
        let results = vec![UpdateResult::skipped("a", "Already up to date")];
        let text = Summary::new(&results).render(false, SignedDuration::ZERO);
        assert!(text.contains("✨ All packages are up to date!"));
    }

    #[test]
    fn elapsed_is_human_readable() {
        assert_eq!(format_elapsed(SignedDuration::from_secs(42)), "42s");
        assert_eq!(format_elapsed(SignedDuration::from_secs(3723)), "1h 2m 3s");
    }

    #[test]
    fn json_report_lists_every_result() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json_report(&path, &mixed_results()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["status"], "success");
        assert_eq!(entries[0]["version_info"], "1.2.3");
        assert_eq!(entries[2]["error"], "Timeout after 10 minutes");
    }
}
