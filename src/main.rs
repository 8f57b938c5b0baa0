//! roster-wizard binary entry point

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roster_wizard::{cli::Cli, config::Config, wizard::App};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.apply(Config::from_env()?);
    config.validate()?;

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "roster_wizard=info");
    }

    // Log to file only; the terminal belongs to the UI
    let log_dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let log_name = config
        .log_file
        .file_name()
        .context("Log file path has no file name")?;
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    info!(
        "Starting roster-wizard (output dir: {}, finalize delay: {:?})",
        config.output_dir.display(),
        config.finalize_delay()
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => info!("roster-wizard exited successfully"),
        Err(e) => error!("roster-wizard encountered an error: {:#}", e),
    }

    result
}
