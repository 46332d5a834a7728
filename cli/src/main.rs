mod cli;
mod commands;
mod config;
mod error;
mod terminal;
mod ui;

use clap::Parser;
use cli::Cli;
use commands::Context;
use config::Config;
use error::{Result, ResultExt};
use metalcloud::JsonRpcClient;
use std::process;
use terminal::Console;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        ui::error_message(&err.user_message());
        process::exit(1);
    }
}

/// `--verbose` forces debug output, otherwise `RUST_LOG` or `warn`
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let client = JsonRpcClient::new(config.client_settings())
        .with_context(|| format!("Failed to set up the client for {}", config.endpoint))?;
    let ctx = Context {
        client: &client,
        terminal: &Console,
    };

    let output = commands::execute(&ctx, cli.command)?;
    if !output.is_empty() {
        if output.ends_with('\n') {
            print!("{output}");
        } else {
            println!("{output}");
        }
    }
    Ok(())
}
