//! tagmark CLI
//!
//! Command-line interface for tagmark - keyword-classified bookmarks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tagmark_core::{Config, StorageError, Store};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "tagmark")]
#[command(about = "tagmark - Bookmarks sorted and tagged by keyword")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Add a bookmark
    Add {
        /// URL to save
        url: String,
        /// Bookmark title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Tags (replaced by the classifier's tags)
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Import an HTML bookmark export
    Import {
        /// Exported bookmarks file
        file: PathBuf,
    },
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long, conflicts_with = "tag")]
        category: Option<String>,
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Remove a bookmark by URL
    #[command(alias = "rm")]
    Remove {
        /// URL of the bookmark
        url: String,
    },
    /// Show the category and tag keyword tables
    Rules,
    /// Show configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = run(cli).await;
    if let Err(ref err) = result {
        if let Some(hint) = recovery_hint(err) {
            eprintln!("Hint: {}", hint);
        }
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let config_path = cli.config.clone().unwrap_or_else(Config::config_file_path);
    let config = Config::load_from_path(&config_path).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { host, port } => commands::serve::serve(config, host, port).await,
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => {
                commands::config::show(&config, &config_path, &output)
            }
        },
        command => {
            let mut store =
                Store::open_with_config(config).context("Failed to open bookmark store")?;
            run_store_command(command, &mut store, &output)
        }
    }
}

fn run_store_command(command: Commands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        Commands::Add { url, title, tag } => commands::bookmark::add(store, url, title, tag, output),
        Commands::Import { file } => commands::bookmark::import(store, file, output),
        Commands::List { category, tag } => commands::bookmark::list(store, category, tag, output),
        Commands::Remove { url } => commands::bookmark::remove(store, url, output),
        Commands::Rules => commands::rules::show(store, output),
        Commands::Serve { .. } | Commands::Config { .. } => unreachable!(), // Handled in main
    }
}

/// Suggestion for a storage failure anywhere in the error chain
fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StorageError>())
        .and_then(StorageError::recovery_suggestion)
}

/// Log to stderr so stdout stays clean for `--json`
///
/// `RUST_LOG` wins; otherwise `info`, or `warn` in quiet mode.
fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::try_parse_from(["tagmark", "list", "--category", "technical"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List { category: Some(ref c), tag: None } if c == "technical"
        ));

        let result = Cli::try_parse_from(["tagmark", "list", "-c", "news", "-t", "github"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tagmark",
            "add",
            "https://github.com/a/b",
            "--tag",
            "x",
            "--tag",
            "y",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Add { ref tag, .. } if tag == &["x", "y"]));
    }

    #[test]
    fn test_recovery_hint_for_malformed_bookmark_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("bookmarks.json"), "{not json").unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };

        let err = Store::open_with_config(config)
            .context("Failed to open bookmark store")
            .err()
            .unwrap();
        let hint = recovery_hint(&err).unwrap();
        assert!(hint.contains("url, title, tags and category"));
    }

    #[test]
    fn test_no_recovery_hint_for_other_errors() {
        let err = anyhow::anyhow!("Bookmark not found: https://example.com");
        assert!(recovery_hint(&err).is_none());
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["tagmark", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { host: None, port: Some(8080) }
        ));
    }
}
