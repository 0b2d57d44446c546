use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vista_core::{AppConfig, PageConfig};

mod commands;

#[derive(Parser)]
#[command(name = "vista")]
#[command(author, version, about = "Scroll-driven animated pages in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to ~/.config/vista/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Page description to show instead of the configured one
    #[arg(short, long, global = true)]
    page: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run,
    /// Print the section the navigation highlights at a scroll offset
    Spy {
        /// Scroll offset in page pixels
        scroll_y: f64,
        /// Viewport height in page pixels
        #[arg(long, default_value_t = 600.0)]
        viewport: f64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print animation samples of the first animated block over simulated time
    Timeline {
        /// Block to sample (defaults to the first block with counters, bars or a typewriter)
        #[arg(long)]
        block: Option<String>,
        /// Sampling step in milliseconds
        #[arg(long, default_value_t = 250)]
        step_ms: u64,
        /// Stop after this many milliseconds
        #[arg(long, default_value_t = 4000)]
        until_ms: u64,
    },
    /// Show the effective configuration
    Config {
        /// Write the defaults to the configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let config = Arc::new(config);

    let command = cli.command.unwrap_or(Commands::Run);

    // The TUI owns the terminal, so its logs go to a file
    let _guard = match command {
        Commands::Run => Some(init_file_logging(&config)?),
        _ => {
            init_stderr_logging(&config);
            None
        }
    };

    let page_path = cli.page.or_else(|| config.page_path());
    let load_page = || {
        PageConfig::load_or_demo(page_path.as_deref())
            .with_context(|| match &page_path {
                Some(path) => format!("Failed to load page {}", path.display()),
                None => "Failed to load the built-in page".to_string(),
            })
    };

    match command {
        Commands::Run => commands::run::run(config, load_page()?),
        Commands::Spy {
            scroll_y,
            viewport,
            json,
        } => commands::spy::run(&config, &load_page()?, scroll_y, viewport, json),
        Commands::Timeline {
            block,
            step_ms,
            until_ms,
        } => commands::timeline::run(&config, &load_page()?, block.as_deref(), step_ms, until_ms),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    // Respect RUST_LOG, fall back to the configured level
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.general.log_level))
}

fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn init_file_logging(config: &AppConfig) -> Result<WorkerGuard> {
    let log_path = config.log_file();
    let directory = log_path
        .parent()
        .with_context(|| format!("Log path has no parent directory: {}", log_path.display()))?;
    let file_name = log_path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", log_path.display()))?;

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    Ok(guard)
}
