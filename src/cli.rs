//! Command definitions and handlers for `push_notebook` and
//! `get_notebook_logs`.

use crate::config::Settings;
use crate::kaggle::KaggleCli;
use crate::log_files::{display_logs, log_dir, reset_log_dir, RULE};
use crate::notebooks::{available_notebooks, kernel_url, notebook_dir, resolve_slug};
use crate::utils::CommandResult;
use anyhow::Result;
use clap::{Args, Parser};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options shared by both commands.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory containing one subdirectory per notebook
    #[arg(long, env = "NOTEBOOKS_DIR", default_value = "notebooks")]
    pub notebooks_dir: PathBuf,

    /// Kaggle CLI binary
    #[arg(long, env = "KAGGLE_BIN", default_value = "kaggle")]
    pub kaggle_bin: String,

    /// Run the Kaggle CLI inside `nix-shell` using this shell file
    /// (the project's `shell.nix` workflow). Without it `kaggle` is run
    /// directly from PATH
    #[arg(long, env = "KAGGLE_NIX_SHELL", value_name = "SHELL_NIX")]
    pub nix_shell: Option<PathBuf>,
}

/// Push a notebook to Kaggle.
#[derive(Parser, Debug)]
#[command(name = "push_notebook")]
#[command(version)]
#[command(about = "Push a notebook under notebooks/ to Kaggle")]
pub struct PushCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Notebook name (directory under the notebooks directory)
    pub notebook_name: Option<String>,
}

impl PushCli {
    pub fn settings(&self) -> Settings {
        Settings {
            notebooks_dir: self.common.notebooks_dir.clone(),
            kaggle_bin: self.common.kaggle_bin.clone(),
            nix_shell: self.common.nix_shell.clone(),
            ..Default::default()
        }
    }
}

/// Fetch Kaggle notebook execution status and logs.
#[derive(Parser, Debug)]
#[command(name = "get_notebook_logs")]
#[command(version)]
#[command(about = "Fetch Kaggle notebook execution status and logs")]
pub struct LogsCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory under which logs/<notebook_name> is rebuilt
    #[arg(long, env = "NOTEBOOK_LOGS_DIR", default_value = "logs")]
    pub logs_dir: PathBuf,

    /// Timeout in seconds for each Kaggle query
    #[arg(long, env = "KAGGLE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Notebook name (directory under the notebooks directory)
    pub notebook_name: Option<String>,
}

impl LogsCli {
    pub fn settings(&self) -> Settings {
        Settings {
            notebooks_dir: self.common.notebooks_dir.clone(),
            logs_dir: self.logs_dir.clone(),
            kaggle_bin: self.common.kaggle_bin.clone(),
            nix_shell: self.common.nix_shell.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// Outcome of one best-effort step of the logs command.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub attempted: bool,
    pub succeeded: bool,
    pub output: CommandResult,
}

impl StepOutcome {
    fn ran(output: CommandResult) -> Self {
        Self {
            attempted: true,
            succeeded: output.success(),
            output,
        }
    }

    fn skipped(reason: String) -> Self {
        Self {
            attempted: false,
            succeeded: false,
            output: CommandResult::failure(reason),
        }
    }
}

fn write_available<W: Write>(out: &mut W, notebooks_dir: &Path, leading_blank: bool) -> Result<()> {
    let available = available_notebooks(notebooks_dir);
    if !available.is_empty() {
        let prefix = if leading_blank { "\n" } else { "" };
        writeln!(out, "{}Available notebooks: {}", prefix, available.join(", "))?;
    }
    Ok(())
}

fn write_missing_name<W: Write>(out: &mut W, program: &str, notebooks_dir: &Path) -> Result<()> {
    writeln!(out, "Error: Notebook name is required")?;
    writeln!(out, "\nUsage: {} <notebook_name>", program)?;
    write_available(out, notebooks_dir, true)
}

/// Handle `push_notebook`.
///
/// Only the notebook directory's existence is checked; a directory without
/// metadata is still pushed and Kaggle reports the problem.
pub fn handle_push<W: Write>(
    settings: &Settings,
    notebook_name: Option<&str>,
    out: &mut W,
) -> Result<i32> {
    let Some(name) = notebook_name else {
        write_missing_name(out, "push_notebook", &settings.notebooks_dir)?;
        return Ok(1);
    };

    let dir = notebook_dir(&settings.notebooks_dir, name);
    if !dir.is_dir() {
        writeln!(out, "Error: {} does not exist", dir.display())?;
        write_available(out, &settings.notebooks_dir, true)?;
        return Ok(1);
    }

    writeln!(out, "Pushing {} to Kaggle...", name)?;
    writeln!(out, "{}", RULE)?;
    out.flush()?;

    let pushed = match settings.kaggle_cli().push(&dir) {
        Ok(pushed) => pushed,
        Err(e) => {
            writeln!(out, "Errors: {:#}", e)?;
            false
        }
    };

    writeln!(out, "\n{}", RULE)?;
    if pushed {
        writeln!(out, "✓ Successfully pushed {}", name)?;
    } else {
        writeln!(out, "✗ Failed to push {}", name)?;
    }
    writeln!(out, "{}", RULE)?;

    Ok(if pushed { 0 } else { 1 })
}

/// Drop stderr lines mentioning HTTP 403, which Kaggle emits for private
/// kernels whose output is not downloadable.
pub fn filter_forbidden(stderr: &str) -> String {
    stderr
        .lines()
        .filter(|line| !line.contains("403"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_step<W: Write>(kaggle: &KaggleCli, slug: &str, out: &mut W) -> Result<StepOutcome> {
    writeln!(out, "Checking status for: {}", slug)?;
    writeln!(out, "{}", RULE)?;

    let result = kaggle.status(slug);
    if !result.stdout.is_empty() {
        writeln!(out, "{}", result.stdout)?;
    }
    if !result.stderr.is_empty() {
        writeln!(out, "Errors: {}", result.stderr)?;
    }

    Ok(StepOutcome::ran(result))
}

fn output_step<W: Write>(
    kaggle: &KaggleCli,
    slug: &str,
    dir: &Path,
    out: &mut W,
) -> Result<StepOutcome> {
    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "Fetching kernel output...")?;
    writeln!(out, "{}\n", RULE)?;

    if let Err(e) = reset_log_dir(dir) {
        let reason = format!("Could not prepare {}: {}", dir.display(), e);
        writeln!(out, "Errors: {}", reason)?;
        return Ok(StepOutcome::skipped(reason));
    }

    let result = kaggle.output(slug, dir);
    if !result.stdout.is_empty() {
        writeln!(out, "{}", result.stdout)?;
    }
    let stderr = filter_forbidden(&result.stderr);
    if !stderr.trim().is_empty() {
        writeln!(out, "Errors: {}", stderr)?;
    }

    Ok(StepOutcome::ran(result))
}

/// Handle `get_notebook_logs`.
///
/// Exits non-zero only when the name is missing or has no slug; fetch
/// failures downstream produce an advisory warning.
pub fn handle_logs<W: Write>(
    settings: &Settings,
    notebook_name: Option<&str>,
    out: &mut W,
) -> Result<i32> {
    let Some(name) = notebook_name else {
        write_missing_name(out, "get_notebook_logs", &settings.notebooks_dir)?;
        return Ok(1);
    };

    let Some(slug) = resolve_slug(&settings.notebooks_dir, name, out)? else {
        writeln!(out, "Error: Could not find metadata for notebook '{}'", name)?;
        write_available(out, &settings.notebooks_dir, false)?;
        return Ok(1);
    };

    let kaggle = settings.kaggle_cli();
    let dir = log_dir(&settings.logs_dir, name);

    writeln!(out, "Kaggle Notebook Log Fetcher")?;
    writeln!(out, "{}\n", RULE)?;

    let status = status_step(&kaggle, &slug, out)?;
    let output = output_step(&kaggle, &slug, &dir, out)?;
    log::debug!(
        "status attempted={} ok={}, output attempted={} ok={}",
        status.attempted,
        status.succeeded,
        output.attempted,
        output.succeeded
    );

    display_logs(&dir, out)?;

    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "To view logs on Kaggle website:")?;
    writeln!(out, "{}", kernel_url(&slug))?;
    writeln!(out, "{}", RULE)?;

    if !output.attempted {
        writeln!(out, "\n⚠ Kernel output was not fetched: {}", output.output.stderr)?;
    }

    if !status.succeeded && !output.succeeded {
        writeln!(out, "\n⚠ Warning: Could not fetch logs via API")?;
        writeln!(out, "You may need to:")?;
        writeln!(out, "  1. Check if the kernel has been executed")?;
        writeln!(out, "  2. Verify the kernel slug is correct")?;
        writeln!(out, "  3. Check your Kaggle API credentials")?;
    }

    Ok(0)
}
