use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Severity of a progress line printed while packages are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn emoji(self) -> &'static str {
        match self {
            Level::Info => "🔍",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Error => "❌",
        }
    }

    fn paint(self, text: String) -> ColoredString {
        match self {
            Level::Info => text.blue(),
            Level::Success => text.green(),
            Level::Warning => text.yellow(),
            Level::Error => text.red(),
        }
    }
}

pub fn format_line(level: Level, message: &str) -> ColoredString {
    level.paint(format!("{} {}", level.emoji(), message))
}

pub fn log(level: Level, message: impl AsRef<str>) {
    println!("{}", format_line(level, message.as_ref()));
    let _ = io::stdout().flush();
}

pub fn info(message: impl AsRef<str>) {
    log(Level::Info, message);
}

pub fn success(message: impl AsRef<str>) {
    log(Level::Success, message);
}

pub fn warning(message: impl AsRef<str>) {
    log(Level::Warning, message);
}

pub fn error(message: impl AsRef<str>) {
    log(Level::Error, message);
}

/// Echo of an external command, shown only with `--verbose`.
pub fn command(program: &str, args: &[&str]) {
    println!(
        "{}",
        format!("Executing: {} {}", program, args.join(" ")).dimmed()
    );
}

/// Spinner shown while a long external command runs. indicatif draws to
/// stderr and stays silent when that is not a terminal. A hidden spinner
/// keeps verbose `Executing:` lines from being drawn over.
pub fn spinner(message: impl Into<String>, visible: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if !visible {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
