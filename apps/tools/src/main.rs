use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use control_store::ControlStore;
use dispatch::DispatchContext;
use shared::{domain::Control, protocol::ActivationRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "panelctl", about = "Inspect and drive a control panel configuration")]
struct Cli {
    #[arg(long, default_value = "config.json")]
    controls: PathBuf,
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the configured controls.
    List,
    /// Print the controls with live values from the status endpoint.
    Status,
    /// Activate a control the same way the web panel does.
    Activate {
        name: String,
        #[arg(long, default_value = "")]
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = ControlStore::new(&cli.controls);
    let config = store.load().await?;

    match cli.command {
        Command::List => print_controls(&config.controls),
        Command::Status => {
            let ctx = context(cli.timeout_secs)?;
            let controls =
                dispatch::merge_status(&ctx, config.controls, config.status_url.as_deref()).await;
            print_controls(&controls);
        }
        Command::Activate { name, value } => {
            let ctx = context(cli.timeout_secs)?;
            let request = ActivationRequest::new(name, value);
            let result = dispatch::activate(&ctx, &config.controls, &request).await?;
            println!("{}", serde_json::to_string(&result)?);
        }
    }

    Ok(())
}

fn context(timeout_secs: u64) -> Result<DispatchContext> {
    let timeout = match timeout_secs {
        0 => dispatch::DEFAULT_TIMEOUT,
        secs => Duration::from_secs(secs),
    };
    DispatchContext::new(timeout).context("failed to build http client")
}

fn print_controls(controls: &[Control]) {
    for control in controls {
        match control.range() {
            Some((min, max)) => println!(
                "{:<20} {:<7} [{min}..{max}] value={:<6} {}",
                control.name,
                control.kind.as_str(),
                control.value,
                control.target_url
            ),
            None => println!(
                "{:<20} {:<7} {}",
                control.name,
                control.kind.as_str(),
                control.target_url
            ),
        }
    }
}
