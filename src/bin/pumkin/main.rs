use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod cmd_create;
mod cmd_log;
mod cmd_sync;
mod cmd_verify;

fn init_logger() {
    // RUST_LOG wins, otherwise info. Example: RUST_LOG=debug pumkin sync .
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Create { path } => cmd_create::exec(path),

        cli::Cmd::Sync { path } => cmd_sync::exec(path),

        cli::Cmd::Log { path, json } => cmd_log::exec(path, json),

        cli::Cmd::Verify { path, json } => cmd_verify::exec(path, json),
    }
}
