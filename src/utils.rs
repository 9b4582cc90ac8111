//! Utility functions for external command execution.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

/// Default timeout for captured commands.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Result of running an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub return_code: i32,
}

impl CommandResult {
    /// Uniform result for a command that could not be run to completion.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            return_code: 1,
        }
    }

    pub fn success(&self) -> bool {
        self.return_code == 0
    }
}

/// Execute a command, capturing stdout and stderr, and kill it if it runs
/// longer than `timeout`.
///
/// The deadline also covers collecting output: a descendant that keeps the
/// child's pipes open past it turns the run into a timeout.
///
/// # Arguments
/// * `cmd` - Program and arguments
/// * `cwd` - Working directory for the child, if any
/// * `timeout` - Maximum wall time before the child is killed
pub fn run_command_with_timeout(
    cmd: &[String],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<CommandResult> {
    let (program, args) = cmd.split_first().context("Empty command")?;
    log::debug!("running {:?} (timeout {:?})", cmd, timeout);

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to execute command: {}", program))?;

    // Pipes are drained concurrently; a full pipe would stall the child.
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let timed_out = || {
        anyhow::anyhow!(
            "Command '{}' timed out after {} seconds",
            cmd.join(" "),
            timeout.as_secs()
        )
    };

    let deadline = Instant::now() + timeout;
    let check_interval = Duration::from_millis(50);
    let status = loop {
        if let Some(status) = child.try_wait().context("Failed to wait for command")? {
            break status;
        }
        if Instant::now() >= deadline {
            log::warn!("{} timed out after {:?}, killing it", program, timeout);
            let _ = child.kill();
            let _ = child.wait();
            return Err(timed_out());
        }
        thread::sleep(check_interval);
    };

    let stdout = collect_reader(stdout_reader, deadline);
    let stderr = collect_reader(stderr_reader, deadline);
    match (stdout, stderr) {
        (Some(stdout), Some(stderr)) => Ok(CommandResult {
            stdout,
            stderr,
            return_code: exit_code(status),
        }),
        _ => {
            log::warn!("{} exited but its output was still open at the deadline", program);
            Err(timed_out())
        }
    }
}

/// Execute a command with inherited stdio and no timeout, returning its
/// exit status.
pub fn run_command_inherited(cmd: &[String], cwd: Option<&Path>) -> Result<ExitStatus> {
    let (program, args) = cmd.split_first().context("Empty command")?;
    log::debug!("running {:?} in {:?}", cmd, cwd);

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    command
        .status()
        .with_context(|| format!("Failed to execute command: {}", program))
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    rx
}

/// Wait for a reader until `deadline`. `None` means the pipe was still open.
fn collect_reader(reader: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Option<String> {
    let Some(rx) = reader else {
        return Some(String::new());
    };
    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(buf) => Some(String::from_utf8_lossy(&buf).to_string()),
        Err(mpsc::RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(mpsc::RecvTimeoutError::Timeout) => None,
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Quote a word for a POSIX shell command line.
///
/// Words made only of safe characters are returned unchanged.
pub fn shell_quote(word: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "-_./=:@%+,".contains(c);
    if !word.is_empty() && word.chars().all(is_safe) {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Join words into a single shell command line.
pub fn shell_join(words: &[String]) -> String {
    words
        .iter()
        .map(|w| shell_quote(w))
        .collect::<Vec<_>>()
        .join(" ")
}
