//! Shared testing utilities for the notebook CLI tests.

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for the kaggle CLI. Every call is appended to `$FAKE_KAGGLE_LOG`
/// as "<cwd> <args>"; behaviour is steered through `FAKE_*` variables.
const FAKE_KAGGLE: &str = r#"#!/bin/sh
echo "$(pwd -P) $*" >> "$FAKE_KAGGLE_LOG"
case "$2" in
  push)
    if [ -n "$FAKE_PUSH_FAIL" ]; then echo "push rejected" >&2; exit 1; fi
    echo "Kernel version 1 successfully pushed"
    ;;
  status)
    if [ -n "$FAKE_STATUS_SLEEP" ]; then sleep "$FAKE_STATUS_SLEEP"; fi
    if [ -n "$FAKE_STATUS_FAIL" ]; then echo "404 - Not Found" >&2; exit 1; fi
    echo "$3 has status \"KernelWorkerStatus.COMPLETE\""
    ;;
  output)
    if [ -n "$FAKE_OUTPUT_STDERR" ]; then echo "$FAKE_OUTPUT_STDERR" >&2; exit 1; fi
    printf 'epoch 1 loss 0.42\n' > "$5/demo.log"
    printf 'id,target\n1,0\n' > "$5/submission.csv"
    echo "Output file downloaded to $5/demo.log"
    ;;
esac
"#;

/// Isolated project root with a fake kaggle binary.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    kaggle_bin: PathBuf,
    invocation_log: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let bin_dir = root.path().join("bin");
        fs::create_dir_all(&bin_dir).unwrap();

        let kaggle_bin = bin_dir.join("kaggle");
        fs::write(&kaggle_bin, FAKE_KAGGLE).unwrap();
        fs::set_permissions(&kaggle_bin, fs::Permissions::from_mode(0o755)).unwrap();

        let invocation_log = root.path().join("kaggle-calls.log");
        Self { root, kaggle_bin, invocation_log }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Create `notebooks/<name>/`, with a metadata file if given.
    pub fn add_notebook(&self, name: &str, metadata: Option<&str>) -> PathBuf {
        let dir = self.root().join("notebooks").join(name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(content) = metadata {
            fs::write(dir.join("kernel-metadata.json"), content).unwrap();
        }
        dir
    }

    pub fn log_dir(&self, name: &str) -> PathBuf {
        self.root().join("logs").join(name)
    }

    /// Build a command for one of the binaries, run from the project root.
    pub fn cli(&self, bin: &str) -> Command {
        let mut cmd = Command::cargo_bin(bin).expect("Failed to locate binary");
        cmd.current_dir(self.root())
            .env("KAGGLE_BIN", &self.kaggle_bin)
            .env("FAKE_KAGGLE_LOG", &self.invocation_log)
            .env_remove("NOTEBOOKS_DIR")
            .env_remove("NOTEBOOK_LOGS_DIR")
            .env_remove("KAGGLE_NIX_SHELL")
            .env_remove("KAGGLE_TIMEOUT_SECS")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Lines recorded by the fake kaggle binary.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.invocation_log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
