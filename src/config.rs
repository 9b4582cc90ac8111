//! Runtime settings shared by both commands.

use crate::kaggle::{KaggleCli, Launcher};
use crate::utils::DEFAULT_TIMEOUT_SECS;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Root holding one directory per notebook project
    pub notebooks_dir: PathBuf,
    /// Root under which per-notebook log directories are rebuilt
    pub logs_dir: PathBuf,
    /// Name or path of the kaggle binary
    pub kaggle_bin: String,
    /// Shell file for running kaggle inside nix-shell
    pub nix_shell: Option<PathBuf>,
    /// Timeout for status and output queries
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notebooks_dir: PathBuf::from("notebooks"),
            logs_dir: PathBuf::from("logs"),
            kaggle_bin: "kaggle".to_string(),
            nix_shell: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Build the CLI facade these settings describe.
    ///
    /// A relative nix shell file is anchored to the current directory, since
    /// push runs the CLI from inside the notebook directory.
    pub fn kaggle_cli(&self) -> KaggleCli {
        let launcher = match &self.nix_shell {
            Some(file) => Launcher::NixShell(absolutize(file)),
            None => Launcher::Direct,
        };
        KaggleCli::new(self.kaggle_bin.clone(), launcher).with_timeout(self.timeout)
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_project_layout() {
        let settings = Settings::default();
        assert_eq!(settings.notebooks_dir, PathBuf::from("notebooks"));
        assert_eq!(settings.logs_dir, PathBuf::from("logs"));
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.nix_shell.is_none());
    }

    #[test]
    fn test_nix_shell_is_absolutized() {
        let settings = Settings {
            nix_shell: Some(PathBuf::from("shell.nix")),
            ..Default::default()
        };
        let argv = settings.kaggle_cli().command_line(&["kernels", "push"]);
        assert_eq!(argv[0], "nix-shell");
        assert!(Path::new(&argv[3]).is_absolute());
        assert!(argv[3].ends_with("shell.nix"));
    }
}
