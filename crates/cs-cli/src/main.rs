mod workspace;

use anyhow::{Context, Result};
use clap::Parser;
use cs_cache::CacheRegistry;
use cs_core::{OutputFormat, StripConfig, TransformMode};
use cs_host::{BareFormatter, ExecutionHost, StandardFormatter};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use workspace::{load_files, Workspace};

/// codestrip - strip comments from or minify source files
#[derive(Parser, Debug)]
#[command(name = "codestrip")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to process, in output order
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// raw, remove-comments or minify
    #[arg(short, long, default_value = "remove-comments")]
    mode: String,

    /// plain, markdown or xml
    #[arg(short, long, default_value = "plain")]
    format: String,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Omit per-file headers
    #[arg(long)]
    no_headers: bool,

    /// Print size savings to stderr
    #[arg(long)]
    stats: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mode: TransformMode = cli.mode.parse().context("Invalid --mode")?;
    let format: OutputFormat = cli.format.parse().context("Invalid --format")?;
    let config = match &cli.config {
        Some(path) => StripConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StripConfig::default(),
    };
    debug!(?config, %mode, %format, "starting");

    let files = load_files(&cli.files)?;
    let host = if cli.no_headers {
        ExecutionHost::create(&config, BareFormatter)
    } else {
        ExecutionHost::create(&config, StandardFormatter)
    }
    .context("Failed to start execution host")?;
    let ws = Workspace::new("cli", host, CacheRegistry::new(config.cache.clone()));

    let result = ws.transform(files, mode, format).await?;
    println!("{}", result.joined());
    if cli.stats {
        eprintln!(
            "{} -> {} bytes ({}% smaller)",
            result.original_bytes, result.processed_bytes, result.size_savings_percent
        );
    }
    ws.close();
    Ok(())
}
