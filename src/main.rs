use clap::Parser;
use iac_scanner::{cli::Cli, config, run_command};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run() -> iac_scanner::Result<i32> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let current_dir = std::env::current_dir().ok();
    let config = config::load_config(cli.config.as_deref(), current_dir.as_deref())?;

    run_command(cli.command, &config).await
}
