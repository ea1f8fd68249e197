//! mcp-spec CLI — MCP server for the Model Context Protocol specification
//!
//! Commands: serve (default), search, section, chunks

mod serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mcpspec_core::{HeadingRule, SpecConfig, SpecError, SpecLibrary};

#[derive(Parser)]
#[command(name = "mcp-spec")]
#[command(version)]
#[command(about = "MCP server for searching the Model Context Protocol specification")]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true, env = "MCP_SPEC_CONFIG")]
    config: Option<PathBuf>,

    /// Markdown document to index (overrides the config file)
    #[arg(short, long, global = true, env = "MCP_SPEC_DOCUMENT")]
    document: Option<PathBuf>,

    /// Chunk boundary rule: any-level or top-level
    #[arg(long, global = true)]
    heading_rule: Option<HeadingRule>,

    /// Reuse the index while the document is unchanged
    #[arg(long, global = true)]
    cache: bool,

    /// Rebuild the index on every call, even if the config file enables caching
    #[arg(long, global = true, conflicts_with = "cache")]
    no_cache: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,
    /// Fuzzy search the document and print JSON results
    #[command(alias = "s")]
    Search {
        /// Free-text query
        query: String,
        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print the content of a section by exact name
    Section {
        /// Section heading text
        name: String,
    },
    /// List the chunks the document splits into
    Chunks,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::error!("mcp-spec failed: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    // stdout carries MCP framing; logs go to stderr only.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let library = SpecLibrary::new(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_stdio(library).await,
        Commands::Search { query, limit } => {
            match library.search(&query, limit) {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(e @ SpecError::NoMatch(_)) => println!("{e}"),
                Err(e) => return Err(e.into()),
            }
            Ok(())
        }
        Commands::Section { name } => {
            match library.section(&name) {
                Ok(content) => println!("{content}"),
                Err(e @ SpecError::SectionNotFound(_)) => println!("{e}"),
                Err(e) => return Err(e.into()),
            }
            Ok(())
        }
        Commands::Chunks => {
            let index = library.try_load()?;
            let json: Vec<serde_json::Value> = index
                .chunks()
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "id": c.id,
                        "section": c.section,
                        "line": c.line,
                        "lines": c.line_count(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<SpecConfig> {
    let mut config = match &cli.config {
        Some(path) => SpecConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SpecConfig::default(),
    };
    if let Some(document) = &cli.document {
        config.document = absolutize(document)?;
    }
    if let Some(rule) = cli.heading_rule {
        config.heading_rule = rule;
    }
    if cli.cache {
        config.cache = true;
    }
    if cli.no_cache {
        config.cache = false;
    }
    config.validate()?;
    Ok(config)
}

/// Command-line paths are relative to the working directory, not the
/// install directory.
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    Ok(cwd.join(path))
}
