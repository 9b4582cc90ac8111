use clap::Parser;
use notebook_tools::cli::{handle_push, PushCli};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    notebook_tools::init_logging();
    let cli = PushCli::parse();

    let mut stdout = io::stdout();
    match handle_push(&cli.settings(), cli.notebook_name.as_deref(), &mut stdout) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
