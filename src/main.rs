//! Strainer selector - main entry point

use anyhow::Context;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::sync::Arc;
use tracing::{debug, info};

use strainsel::app::App;
use strainsel::catalog::{CatalogSource, LocalCatalog};
use strainsel::cli::{Cli, Commands};
use strainsel::order::{LocalOrderSink, OrderSink};

/// Initialize the tracing subscriber; RUST_LOG overrides the default level.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("strainer selector starting up");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    match cli.command {
        Some(Commands::Validate { catalog }) => {
            info!(path = %catalog.display(), "validating catalog file");
            match LocalCatalog::load_from_file(&catalog) {
                Ok(loaded) => {
                    println!(
                        "✓ Catalog file is valid: {} ({} products)",
                        catalog.display(),
                        loaded.len()
                    );
                }
                Err(e) => {
                    eprintln!("✗ Catalog validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            let catalog: Arc<dyn CatalogSource> = match &cli.catalog {
                Some(path) => Arc::new(
                    LocalCatalog::load_from_file(path)
                        .with_context(|| format!("loading catalog {}", path.display()))?,
                ),
                None => Arc::new(LocalCatalog::builtin()),
            };
            let sink: Arc<dyn OrderSink> = match cli.order_log {
                Some(path) => Arc::new(LocalOrderSink::with_log_path(path)),
                None => Arc::new(LocalOrderSink::new()),
            };
            run_tui(catalog, sink)?;
        }
    }

    Ok(())
}

/// Run the TUI, always restoring the terminal afterwards.
fn run_tui(catalog: Arc<dyn CatalogSource>, sink: Arc<dyn OrderSink>) -> anyhow::Result<()> {
    debug!("initializing terminal for TUI mode");

    enable_raw_mode().context("failed to enable raw mode")?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut app = App::new(catalog, sink);
    let result = app.run(&mut terminal);

    // Always attempt cleanup, even if the app failed
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    result
}
