//! skiff asset cache CLI.
//!
//! Thin operational wrapper over [`skiff_assets`]: rebuild the persisted
//! cache ahead of a deploy, check whether it is still fresh, or dump the
//! records a compile would serve.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use skiff_assets::{AssetPaths, CacheStore, Section, Toolchain};
use skiff_manifest::AssetManifest;

/// skiff asset cache build tool
#[derive(Parser)]
#[command(name = "skiff-assets")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root containing the client assets
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Asset manifest file (JSON); defaults to the built-in manifest
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure a fresh, decodable persisted cache exists (pre-start rebuild)
    Build,

    /// Report whether the persisted cache is fresh against its sources
    Status,

    /// Compile (or load) the cache and list its records
    Inspect {
        /// Development compile: no minification, persisted cache untouched
        #[arg(long)]
        dev: bool,
    },
}

// The compiler is cooperative and single-threaded: independent I/O and
// compression are dispatched concurrently but never run in parallel.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let manifest = match &cli.manifest {
        Some(path) => AssetManifest::from_file(path).into_diagnostic()?,
        None => AssetManifest::default(),
    };
    let paths = AssetPaths::from_root(&cli.root);
    let store = CacheStore::new(paths, manifest, Toolchain::probe());

    match cli.command {
        Commands::Build => {
            store.build().await.into_diagnostic()?;
            info!("asset cache is ready");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status => {
            if store.is_fresh().await {
                println!("cache is fresh: {}", store.paths().cache_file.display());
                Ok(ExitCode::SUCCESS)
            } else {
                println!(
                    "cache is stale or missing: {}",
                    store.paths().cache_file.display()
                );
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Inspect { dev } => {
            let cache = store.load(dev).await.into_diagnostic()?;
            for section in Section::ALL {
                for (name, record) in cache.section(section) {
                    println!(
                        "{}/{}  {}  {} bytes (gzip {})  etag {}",
                        section.name(),
                        name,
                        record.mime,
                        record.data.len(),
                        record.gzip.len(),
                        &record.etag[..record.etag.len().min(12)],
                    );
                }
            }
            println!("{} records", cache.record_count());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
