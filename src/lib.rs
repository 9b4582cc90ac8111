//! Helpers for pushing Kaggle notebooks kept under `notebooks/<name>/` and
//! fetching their execution logs into `logs/<name>/`.

pub mod cli;
pub mod config;
pub mod error;
pub mod kaggle;
pub mod log_files;
pub mod notebooks;
pub mod utils;

/// Initialise `env_logger` for a binary. Diagnostics go to stderr at `warn`
/// unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}
