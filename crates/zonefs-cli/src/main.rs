use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zonefs_config::ZonefsConfig;
use zonefs_remote::Session;

mod commands;
mod errors;

#[derive(Parser)]
#[command(name = "zonefs", version, about = "zonefs - remote zone store client")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the content of data objects
    Cat {
        /// Data object paths: absolute, relative to the working collection, or ~/ for home
        paths: Vec<String>,
    },
    /// Show effective configuration
    Config,
    /// Validate configuration file
    Validate,
}

fn find_config() -> Option<PathBuf> {
    // 1. ZONEFS_CONFIG environment variable
    if let Ok(path) = std::env::var("ZONEFS_CONFIG") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. zonefs.yaml in current directory
    let cwd_config = PathBuf::from("zonefs.yaml");
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. ~/.config/zonefs/config.yaml
    if let Some(home) = dirs_next::home_dir() {
        let home_config = home.join(".config/zonefs/config.yaml");
        if home_config.exists() {
            return Some(home_config);
        }
    }

    None
}

/// Log to stderr; stdout carries object content only.
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli
        .config
        .or_else(find_config)
        .ok_or("No configuration file found. Use --config, set ZONEFS_CONFIG, or create zonefs.yaml")?;

    tracing::debug!(config = %config_path.display(), "using configuration");

    if let Commands::Validate = cli.command {
        return commands::validate::run(&config_path).await;
    }

    let config = ZonefsConfig::from_file(&config_path)?;
    let session = Session::from_config(config)?;

    match cli.command {
        Commands::Cat { paths } => {
            commands::cat::run(&session, &paths).await?;
        }
        Commands::Config => {
            commands::config::run(&session).await?;
        }
        Commands::Validate => {
            return Err("Internal error: command should have been handled earlier".into());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = err.exit_code();
            let code = if code < 0 {
                1u8
            } else if code > 255 {
                255u8
            } else {
                code as u8
            };
            return ExitCode::from(code);
        }
    };

    init_logging(cli.debug);

    if let Err(e) = run(cli).await {
        errors::print_error(e.as_ref());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
