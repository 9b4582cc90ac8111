//! Facade over the `kaggle` command-line tool.

use crate::utils::{
    run_command_inherited, run_command_with_timeout, shell_join, CommandResult,
    DEFAULT_TIMEOUT_SECS,
};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the `kaggle` binary gets started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// Run the binary directly.
    Direct,
    /// Run the command line inside `nix-shell --run`, using the given
    /// shell file.
    NixShell(PathBuf),
}

/// Runs kernel operations through the Kaggle CLI.
#[derive(Debug, Clone)]
pub struct KaggleCli {
    program: String,
    launcher: Launcher,
    timeout: Duration,
}

impl KaggleCli {
    /// Create a new KaggleCli.
    ///
    /// # Arguments
    /// * `program` - Name or path of the kaggle binary
    /// * `launcher` - Direct execution or via nix-shell
    pub fn new(program: impl Into<String>, launcher: Launcher) -> Self {
        Self {
            program: program.into(),
            launcher,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Timeout applied to status and output queries.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the full argv for a kaggle invocation.
    pub fn command_line(&self, args: &[&str]) -> Vec<String> {
        let mut kaggle = vec![self.program.clone()];
        kaggle.extend(args.iter().map(|a| a.to_string()));

        match &self.launcher {
            Launcher::Direct => kaggle,
            Launcher::NixShell(shell_file) => vec![
                "nix-shell".to_string(),
                "--run".to_string(),
                shell_join(&kaggle),
                shell_file.to_string_lossy().to_string(),
            ],
        }
    }

    /// Push the kernel whose files live in `notebook_dir`.
    ///
    /// Output goes straight to the terminal and there is no timeout.
    pub fn push(&self, notebook_dir: &Path) -> Result<bool> {
        let cmd = self.command_line(&["kernels", "push"]);
        let status = run_command_inherited(&cmd, Some(notebook_dir))?;
        Ok(status.success())
    }

    /// Query the execution status of a kernel.
    pub fn status(&self, slug: &str) -> CommandResult {
        self.capture(&["kernels", "status", slug])
    }

    /// Download a kernel's output files into `dest`.
    pub fn output(&self, slug: &str, dest: &Path) -> CommandResult {
        let dest = dest.to_string_lossy();
        self.capture(&["kernels", "output", slug, "--path", &*dest])
    }

    /// Run a captured query; spawn failures and timeouts become a failed
    /// result carrying the error text as stderr.
    fn capture(&self, args: &[&str]) -> CommandResult {
        let cmd = self.command_line(args);
        match run_command_with_timeout(&cmd, None, self.timeout) {
            Ok(result) => result,
            Err(e) => {
                log::debug!("{:?} failed: {:#}", cmd, e);
                CommandResult::failure(format!("{:#}", e))
            }
        }
    }
}
