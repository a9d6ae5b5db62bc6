//! Probe - main entry point.
//!
//! Loads configuration, picks a search backend, and runs a typeahead session
//! fed from stdin.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use probe_client::{Catalog, SearchClient};
use probe_console::prompt::HELP;
use probe_console::{
    render_snapshot, CatalogBackend, ConsoleNavigator, HttpBackend, PromptCommand, SearchBackend,
    Session, SessionSnapshot,
};
use probe_core::{load_config, ConfigError, FetchError, TypeaheadConfig};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

// =============================================================================
// Command Line
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "probe", version, about = "Typeahead search for the explorer console")]
struct Cli {
    /// Config file (default: <config dir>/probe/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Search the built-in demo catalog instead of the search service
    #[arg(long)]
    offline: bool,

    /// Print snapshots as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create search client: {0}")]
    Client(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries snapshots
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StartupError> {
    let config = load_config(cli.config.as_deref())?;

    let backend: Arc<dyn SearchBackend> = if cli.offline {
        tracing::info!("Using offline demo catalog");
        Arc::new(CatalogBackend::new(Catalog::demo()))
    } else {
        let client = SearchClient::new(&config.endpoint)?;
        tracing::info!("Searching {}", client.search_url());
        Arc::new(HttpBackend::new(client))
    };
    let navigator = Arc::new(ConsoleNavigator::new(config.console.base_url.clone()));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(interact(backend, navigator, &config.typeahead, cli.json))
}

async fn interact(
    backend: Arc<dyn SearchBackend>,
    navigator: Arc<ConsoleNavigator>,
    config: &TypeaheadConfig,
    json: bool,
) -> Result<(), StartupError> {
    let (session, handle) = Session::new(backend, navigator, config);
    let session_task = tokio::spawn(session.run());
    let printer = tokio::spawn(print_snapshots(handle.subscribe(), json));

    tracing::info!("Session started (:help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let sent = match PromptCommand::parse(&line) {
            Ok(PromptCommand::Input(text)) => handle.input(text),
            Ok(PromptCommand::Select(id)) => handle.select(id),
            Ok(PromptCommand::Key(key)) => handle.keydown(key),
            Ok(PromptCommand::Help) => {
                println!("{}", HELP);
                Ok(())
            }
            Ok(PromptCommand::Quit) => break,
            Err(e) => {
                eprintln!("{}", e);
                Ok(())
            }
        };

        if let Err(e) = sent {
            tracing::warn!("{}", e);
            break;
        }
    }

    // Dropping the handle unmounts the session; the printer follows
    drop(handle);
    let _ = session_task.await;
    let _ = printer.await;
    Ok(())
}

async fn print_snapshots(mut state: watch::Receiver<SessionSnapshot>, json: bool) {
    while state.changed().await.is_ok() {
        let snapshot = state.borrow_and_update().clone();
        if json {
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!("Failed to encode snapshot: {}", e),
            }
        } else {
            print!("{}", render_snapshot(&snapshot));
        }
    }
}
