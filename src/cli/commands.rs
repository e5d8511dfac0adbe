use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;
use crate::demo::build_engine;
use crate::logging::init_logging;
use crate::server::{HttpServer, ShutdownHandle};

/// Command-line interface for tinyroute
#[derive(Parser)]
#[command(name = "tinyroute")]
#[command(about = "Trie-based HTTP request dispatcher", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the sample application
    Serve {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen address, e.g. 127.0.0.1:8080
        #[arg(long)]
        addr: Option<String>,

        /// Directory served under /assets
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Directory of HTML templates
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Number of worker threads
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Print the sample application's routes
    Routes {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Parse `std::env::args` and run the selected command.
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

/// Run an already parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            addr,
            static_dir,
            templates,
            workers,
        } => {
            let mut config = ServerConfig::from_sources(config.as_deref())?;
            if let Some(addr) = addr {
                config.addr = addr;
            }
            if let Some(dir) = static_dir {
                config.static_dir = Some(dir);
            }
            if let Some(dir) = templates {
                config.templates_dir = Some(dir);
            }
            if let Some(workers) = workers {
                config.workers = workers;
            }
            serve(&config)
        }
        Commands::Routes { config } => {
            let config = ServerConfig::from_sources(config.as_deref())?;
            let engine = build_engine(&config)?;
            let mut out = std::io::stdout().lock();
            for (method, pattern) in engine.routes() {
                writeln!(out, "{:<7} {}", method.as_str(), pattern)?;
            }
            Ok(())
        }
    }
}

fn serve(config: &ServerConfig) -> Result<()> {
    init_logging(&config.log)?;
    let engine = Arc::new(build_engine(config)?);
    let handle = HttpServer::new(engine)
        .with_workers(config.workers)
        .start(config.addr.as_str())
        .with_context(|| format!("failed to bind {}", config.addr))?;
    install_signal_handlers(handle.shutdown_handle())?;

    handle
        .join()
        .map_err(|_| anyhow::anyhow!("a server worker panicked"))?;
    info!("Server stopped");
    Ok(())
}

#[cfg(unix)]
fn install_signal_handlers(shutdown: ShutdownHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to install signal handlers")?;
    std::thread::Builder::new()
        .name("tinyroute-signals".to_string())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                info!(signal, "Received shutdown signal");
                shutdown.shutdown();
            }
        })
        .context("failed to spawn signal thread")?;
    Ok(())
}

#[cfg(not(unix))]
fn install_signal_handlers(_shutdown: ShutdownHandle) -> Result<()> {
    Ok(())
}
