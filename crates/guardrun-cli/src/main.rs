use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use guardrun_core::config::RunConfig;
use guardrun_core::exec::ProcessRunner;
use guardrun_core::github::RestClient;
use guardrun_core::report::console::{escape_data, render_text, render_workflow_commands};
use guardrun_core::tool::{Target, ToolInstaller};

mod args;

fn main() {
    let args = args::Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    match execute(&args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{e:#}");
            println!("::error::{}", escape_data(&format!("{e:#}")));
            std::process::exit(1);
        }
    }
}

fn execute(args: &args::Args) -> Result<i32> {
    let config = RunConfig::resolve(args.inputs(), |key| std::env::var(key).ok())?;
    info!(
        repository = %config.repository,
        sha = %config.sha,
        version = %config.tool_version,
        "starting {}",
        env!("CARGO_PKG_NAME")
    );

    let api = RestClient::new(&config.api_url, config.repository.clone(), &config.token)?;
    let installer = ToolInstaller::new(&config, Target::current()?)?;

    let outcome = guardrun_core::run(&config, &api, &installer, &ProcessRunner)?;

    print!("{}", render_text(&outcome.result));
    print!("{}", render_workflow_commands(&outcome.result));

    for e in &outcome.publication_errors {
        error!("publication failed: {e}");
        println!("::error::{}", escape_data(e));
    }

    if let Some(message) = &outcome.failure {
        println!("::error::{}", escape_data(message));
    }

    Ok(outcome.exit_code())
}
