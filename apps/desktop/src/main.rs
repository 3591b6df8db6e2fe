use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_config, AppContext, Application, Dispatcher, HttpDispatcher, Settings};
use shared::domain::Region;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

use commands::{dispatch_ui_command, UiCommand, USAGE};
use terminal::{TerminalHooks, TerminalSurface};

static APP_CONTEXT: AppContext = AppContext::new();

#[derive(Parser, Debug)]
#[command(about = "Tabbed game client running in the terminal")]
struct Args {
    /// Config file; defaults to ./client.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    html_dir: Option<String>,
    /// Tab shown at launch.
    #[arg(long, default_value = "GAME")]
    start_tab: String,
    /// Extra notification regions besides the content region.
    #[arg(long = "region")]
    regions: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }
    if let Some(dir) = args.html_dir {
        config.html_dir = dir;
    }
    client_core::config::validate(&config)?;

    let backend = HttpDispatcher::new(config.request_timeout())
        .context("client startup failure: could not build request dispatcher")?;
    let dispatcher = Dispatcher::new(config.registry(), Arc::new(backend));
    let regions = std::iter::once(Region::content())
        .chain(args.regions.iter().map(|r| Region::new(r.as_str())))
        .collect::<Vec<_>>();

    let initial_settings = config.settings.clone();
    let handle = APP_CONTEXT
        .get_instance(move || {
            Application::new(
                initial_settings,
                dispatcher,
                Box::new(TerminalSurface::new(regions)),
                Box::new(TerminalHooks),
            )
        })
        .clone();
    info!(
        api_base_url = %config.api_base_url,
        html_dir = %config.html_dir,
        "client ready"
    );

    handle.request_tab(args.start_tab)?;
    println!("{USAGE}");

    let mut settings: Settings = config.settings;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    handle.shutdown()?;
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<UiCommand>() {
                    Ok(command) => {
                        let quit = command == UiCommand::Quit;
                        if let Err(err) = dispatch_ui_command(&handle, command, &mut settings) {
                            warn!("command not delivered: {err}");
                            break;
                        }
                        if quit {
                            break;
                        }
                    }
                    Err(message) => println!("{message}"),
                }
            }
            _ = handle.closed() => break,
        }
    }

    handle.closed().await;
    info!("client stopped");
    Ok(())
}
