use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use catalog_ingest::{load_catalogs, Catalog, ErrorClass, LoadError, RunConfig};
use clap::Parser;
use log::{error, info};

#[derive(Parser)]
#[command(name = "catalog-ingest")]
#[command(about = "Load point catalogs for correlation-function estimation")]
#[command(version)]
struct Cli {
    /// JSON run configuration listing the catalogs
    config: PathBuf,

    /// Worker threads for the parallel merge (0 = all cores); overrides the configuration
    #[arg(short, long)]
    threads: Option<usize>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            let class = err
                .downcast_ref::<LoadError>()
                .map(LoadError::class)
                .unwrap_or(ErrorClass::Generic);
            ExitCode::from(class.code())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = RunConfig::from_file(&cli.config).context("loading run configuration")?;
    configure_thread_pool(cli.threads.unwrap_or(config.threads))?;

    let results = load_catalogs(&config.catalogs);
    for (catalog_config, result) in config.catalogs.iter().zip(results) {
        let name = catalog_config.display_name();
        let catalog = result.with_context(|| format!("loading catalog {name}"))?;
        report(&name, &catalog);
    }
    Ok(())
}

fn configure_thread_pool(threads: usize) -> Result<()> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if threads > 0 {
        builder = builder.num_threads(threads);
    }
    builder
        .build_global()
        .context("configuring the worker thread pool")
}

fn report(name: &str, catalog: &Catalog) {
    info!(
        "{name}: {} records, weights {}, total weight {}",
        catalog.len(),
        catalog.weights(),
        catalog.total_weight()
    );
    if let Some(bounds) = catalog.bounds() {
        for (axis, (lo, hi)) in ["x", "y", "z"].iter().zip(bounds) {
            info!("{name}: {axis} in [{lo}, {hi}]");
        }
    }
    if let Some(selection) = catalog.selection() {
        info!("{name}: selection '{selection}' left to the caller");
    }
}
