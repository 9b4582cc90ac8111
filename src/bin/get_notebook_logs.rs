use clap::Parser;
use notebook_tools::cli::{handle_logs, LogsCli};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    notebook_tools::init_logging();
    let cli = LogsCli::parse();

    let mut stdout = io::stdout().lock();
    match handle_logs(&cli.settings(), cli.notebook_name.as_deref(), &mut stdout) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
