use crate::error::{Result, UpdaterError};
use crate::output;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Exit code reported for commands killed after exceeding their timeout.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub timeout: Duration,
    /// Let the child write straight to the terminal instead of capturing.
    pub inherit: bool,
}

impl RunOptions {
    pub fn captured(timeout: Duration) -> Self {
        Self {
            timeout,
            inherit: false,
        }
    }

    pub fn inherited(timeout: Duration) -> Self {
        Self {
            timeout,
            inherit: true,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::captured(DEFAULT_TIMEOUT)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn timed_out() -> Self {
        Self::new(TIMEOUT_EXIT_CODE, "", "Command timed out")
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr, the text outcome rules are matched against.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Narrow seam over process execution so agents can be driven by a fake.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str], options: RunOptions) -> Result<CommandOutput>;
}

/// Runs real processes inside the repository directory.
pub struct SystemRunner {
    working_dir: PathBuf,
    verbose: bool,
}

impl SystemRunner {
    pub fn new<P: AsRef<Path>>(working_dir: P, verbose: bool) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            verbose,
        }
    }

    fn spawn(&self, program: &str, args: &[&str], inherit: bool) -> Result<Child> {
        let mut command = Command::new(program);
        command.current_dir(&self.working_dir).args(args).stdin(Stdio::null());
        if !inherit {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        command.spawn().map_err(|e| {
            UpdaterError::CommandSpawn(format!("{} {}: {e}", program, args.join(" ")))
        })
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], options: RunOptions) -> Result<CommandOutput> {
        if self.verbose {
            output::command(program, args);
        }

        let mut child = self.spawn(program, args, options.inherit)?;

        // Drain both pipes while waiting so a chatty child never blocks on a full buffer.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let start = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break Some(status);
            }
            if start.elapsed() > options.timeout {
                let _ = child.kill();
                let _ = child.wait();
                break None;
            }
            thread::sleep(POLL_INTERVAL);
        };

        // Reader threads of a killed child are left detached: grandchildren may
        // still hold the pipes open.
        match status {
            Some(status) => Ok(CommandOutput::new(
                status.code().unwrap_or(-1),
                collect(stdout),
                collect(stderr),
            )),
            None => Ok(CommandOutput::timed_out()),
        }
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::cell::RefCell;

    /// Answers commands from argv-prefix rules and records every call.
    /// Commands without a matching rule succeed with empty output.
    #[derive(Default)]
    pub struct ScriptedRunner {
        rules: Vec<(Vec<String>, CommandOutput)>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Later rules take precedence over earlier ones.
        pub fn on(mut self, argv_prefix: &[&str], output: CommandOutput) -> Self {
            let prefix = argv_prefix.iter().map(|s| s.to_string()).collect();
            self.rules.insert(0, (prefix, output));
            self
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }

        pub fn calls_starting_with(&self, argv_prefix: &[&str]) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|call| starts_with(call, argv_prefix))
                .count()
        }

        /// Index of the first recorded call starting with `argv_prefix`.
        pub fn position(&self, argv_prefix: &[&str]) -> Option<usize> {
            self.calls
                .borrow()
                .iter()
                .position(|call| starts_with(call, argv_prefix))
        }
    }

    fn starts_with(call: &[String], prefix: &[&str]) -> bool {
        call.len() >= prefix.len() && call.iter().zip(prefix).all(|(a, b)| a == b)
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, program: &str, args: &[&str], _options: RunOptions) -> Result<CommandOutput> {
            let mut argv = vec![program.to_string()];
            argv.extend(args.iter().map(|s| s.to_string()));

            let output = self
                .rules
                .iter()
                .find(|(prefix, _)| {
                    let prefix: Vec<&str> = prefix.iter().map(String::as_str).collect();
                    starts_with(&argv, &prefix)
                })
                .map(|(_, output)| output.clone())
                .unwrap_or_default();

            self.calls.borrow_mut().push(argv);
            Ok(output)
        }
    }
}
