//! menu-maint CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use menu_maint::{
    classify::Classifier,
    commands::{
        cmd_init, cmd_reorg, cmd_replace, cmd_status, print_reorg_report, print_replace_report,
        print_status,
    },
    config::Config,
    error::Result,
    meta::{MenuDb, MenuStore},
};
use std::path::{Path, PathBuf};
use tracing::{error, Level};
use tracing_subscriber::{fmt, fmt::writer::MakeWriterExt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "menu-maint")]
#[command(version, about = "Restaurant menu database maintenance", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// PostgreSQL connection URL (overrides the config file)
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Replace the whole dish catalog with the configured menu
    Replace,

    /// Reorganize dish categories (rename, create, move dishes)
    Reorg,

    /// Show catalog statistics
    Status,

    /// Print the category a dish name is assigned to
    Classify {
        /// Dish name
        name: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Progress on stdout, warnings and errors on stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .or_else(std::io::stdout),
        ))
        .with(filter)
        .init();

    let command = match cli.command {
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(Config::default_config_path);
            let config = cmd_init(path, force)?;
            println!("✓ menu-maint initialized");
            println!("  Config: {}", config.paths.config_file.display());
            return Ok(());
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "menu-maint", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Classify { name } => {
            let config = load_config(cli.config.as_deref())?;
            let category_id = Classifier::new(&config.classifier).classify(&name);
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "name": name, "category_id": category_id })
                );
            } else {
                println!("{} -> {}", name, category_id);
            }
            return Ok(());
        }
        Commands::Replace => DbCommand::Replace,
        Commands::Reorg => DbCommand::Reorg,
        Commands::Status => DbCommand::Status,
    };

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let db = MenuDb::connect(&config.database_url).await?;
    let outcome = run_with_db(command, &config, &db, cli.json).await;
    db.close().await;

    if !outcome? {
        std::process::exit(1);
    }
    Ok(())
}

/// Subcommands that need a database connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DbCommand {
    Replace,
    Reorg,
    Status,
}

/// Run a database command; `Ok(false)` means the procedure stopped on an error
async fn run_with_db(
    command: DbCommand,
    config: &Config,
    db: &MenuDb,
    json: bool,
) -> Result<bool> {
    match command {
        DbCommand::Replace => {
            let report = cmd_replace(config, db).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_replace_report(&report);
            }
            Ok(report.succeeded())
        }

        DbCommand::Reorg => {
            let report = cmd_reorg(config, db).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_reorg_report(&report);
            }
            Ok(report.succeeded())
        }

        DbCommand::Status => {
            let status = cmd_status(config, db).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
            Ok(true)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_from(None),
    }
}
