//! Binary crate for the `weather-notify` job.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Mapping the run outcome to a process exit status

use std::process::ExitCode;

use clap::Parser;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let cmd = cli::Cli::parse();
    cmd.run().await
}
