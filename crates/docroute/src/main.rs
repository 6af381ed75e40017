//! Command-line entry point: run the HTTP service or route a single document.

use anyhow::Context;
use clap::{Parser, Subcommand};
use docroute::config::DocrouteConfig;
use docroute::server::{AppState, FileIntake, PdfExtractConverter, serve};
use log::{debug, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line options for docroute.
#[derive(Parser)]
#[command(name = "docroute", version)]
struct Cli {
    /// Optional path to a docroute.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP intake API
    Serve {
        /// Bind address override, e.g. 127.0.0.1:8000
        #[arg(long)]
        bind: Option<String>,
    },
    /// Route one document and print the result as JSON
    Route {
        /// Thread identifier to file the record under
        #[arg(long)]
        thread: Option<String>,
        /// Input file; stdin when omitted
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docroute::init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { bind } => {
            let mut server = config.server.clone();
            if let Some(bind) = bind {
                server.bind = bind;
            }
            let router = docroute::router_from_config(&config).context("failed to build router")?;
            info!("starting server (bind={})", server.bind);
            serve(&server, AppState::new(router))
                .await
                .context("server failed")?;
        }
        Command::Route { thread, file } => {
            let bytes = match file.as_ref() {
                Some(path) => std::fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buffer = Vec::new();
                    io::stdin()
                        .read_to_end(&mut buffer)
                        .context("failed to read stdin")?;
                    buffer
                }
            };
            let router = docroute::router_from_config(&config).context("failed to build router")?;
            let intake = FileIntake::new(router, Arc::new(PdfExtractConverter));
            let result = intake
                .submit_file(&bytes, None, thread)
                .context("failed to route document")?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DocrouteConfig> {
    if let Some(path) = path {
        info!("loading config from path: {}", path.display());
        return DocrouteConfig::load_from_path(path).context("failed to load config");
    }
    let cwd = std::env::current_dir().context("failed to resolve cwd")?;
    info!("loading layered config from cwd: {}", cwd.display());
    let layered = DocrouteConfig::load_layered(&cwd).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}
