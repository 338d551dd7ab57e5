//! Fabula - Storybook Generation Toolset
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use fabula::cli::{Cli, Commands};
use fabula::config::ConfigManager;
use fabula::error::FabulaResult;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> FabulaResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn (spinners only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("fabula=warn"),
        1 => EnvFilter::new("fabula=info"),
        _ => EnvFilter::new("fabula=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    fabula::ui::init_theme();

    match cli.command {
        // Completions and init run before any config exists
        Commands::Completions(args) => fabula::cli::commands::completions(args),
        Commands::Init(args) => fabula::cli::commands::init(args).await,
        command => {
            let config_manager = if let Some(path) = cli.config {
                ConfigManager::with_path(path)
            } else {
                ConfigManager::new()
            };

            let cwd = std::env::current_dir()
                .map_err(|e| fabula::error::FabulaError::io("getting current directory", e))?;
            let mut config = config_manager.load_merged(&cwd).await?;
            if cli.plain {
                config.ui.plain = true;
            }

            match command {
                Commands::Generate(args) => fabula::cli::commands::generate(args, &config).await,
                Commands::Book(args) => fabula::cli::commands::book(args, &config).await,
                Commands::Frame(args) => fabula::cli::commands::frame(args, &config).await,
                Commands::Versions(args) => fabula::cli::commands::versions(args, &config).await,
                Commands::Check => fabula::cli::commands::check(&config).await,
                Commands::Text(args) => fabula::cli::commands::text(args, &config).await,
                Commands::Prompt(args) => fabula::cli::commands::prompt(args, &config).await,
                Commands::Merge(args) => fabula::cli::commands::merge(args, &config).await,
                Commands::Pick(args) => fabula::cli::commands::pick(args, &config).await,
                Commands::Config(args) => fabula::cli::commands::config(args, &config).await,
                Commands::Completions(_) | Commands::Init(_) => {
                    unreachable!("handled before config load")
                }
            }
        }
    }
}
