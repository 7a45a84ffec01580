//! planet-upload CLI
//!
//! Entry point for the `planet-upload` command-line tool.

use clap::{Parser, Subcommand};
use planet_granules::catalog::{CatalogWorkflow, DryRunCatalog, EarthEngineCatalog, WorkflowError};
use planet_granules::config::{ConfigError, EffectiveConfig, DEFAULT_CONFIG_FILE};
use planet_granules::dispatch::{ids_with_status, run_batch};
use planet_granules::{
    aggregate, logging, report, Catalog, DestinationConfig, DryRunStore, ExitCode, GcloudStore,
    ObjectStore, UploadStatus,
};
use serde_json::{json, Value};
use sidecar_metadata::{extract, MetadataError, SidecarSchema};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, error, info, info_span, warn};
use ulid::Ulid;

#[derive(Parser)]
#[command(name = "planet-upload")]
#[command(about = "Check vendor imagery granules and upload the complete ones", version)]
struct Cli {
    /// Config file (default: ./planet-upload.toml when present)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a data directory, upload complete granules, print the table
    Table {
        /// Region-of-interest (site) code used in bucket names
        roi: String,

        /// Directory to scan recursively
        data_dir: PathBuf,

        /// Log copy commands instead of running them
        #[arg(long)]
        dry_run: bool,

        /// Bucket name prefix
        #[arg(long)]
        store_prefix: Option<String>,
    },

    /// Register every image in a bucket with the image catalog
    Catalog {
        /// Bucket holding the images
        bucket: String,

        /// Target collection id
        collection: String,

        /// Directory searched for sidecar files
        sidecar_dir: PathBuf,

        /// Log catalog commands instead of running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the properties extracted from one sidecar file
    Inspect {
        /// XML or JSON sidecar
        sidecar: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let run_id = Ulid::new();
    let span = info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let code = match cli.command {
        Commands::Table {
            roi,
            data_dir,
            dry_run,
            store_prefix,
        } => run_table(cli.config.as_deref(), &roi, &data_dir, dry_run, store_prefix),
        Commands::Catalog {
            bucket,
            collection,
            sidecar_dir,
            dry_run,
        } => run_catalog(cli.config.as_deref(), &bucket, &collection, &sidecar_dir, dry_run),
        Commands::Inspect { sidecar } => run_inspect(&sidecar),
    };
    process::exit(code.as_i32());
}

fn load_config(path: Option<&Path>, overrides: Value) -> Result<EffectiveConfig, ConfigError> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let path = path.or_else(|| default_path.is_file().then_some(default_path));
    let config = EffectiveConfig::build(path, Some(overrides))?;
    for source in &config.sources {
        if let (Some(path), Some(digest)) = (&source.path, &source.digest) {
            info!(%path, %digest, "loaded config file");
        }
    }
    debug!(config = %config.merged, "effective config");
    Ok(config)
}

fn cli_overrides(dry_run: bool, store_prefix: Option<String>) -> Value {
    let mut overrides = json!({});
    if dry_run {
        overrides["dry_run"] = json!(true);
    }
    if let Some(prefix) = store_prefix {
        overrides["store"] = json!({ "prefix": prefix });
    }
    overrides
}

fn run_table(
    config_path: Option<&Path>,
    roi: &str,
    data_dir: &Path,
    dry_run: bool,
    store_prefix: Option<String>,
) -> ExitCode {
    let config = match load_config(config_path, cli_overrides(dry_run, store_prefix)) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "configuration error");
            return ExitCode::from(&e);
        }
    };
    let settings = &config.settings;

    let granules = match aggregate(data_dir) {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "cannot scan data directory");
            return ExitCode::from(&e);
        }
    };
    info!(dir = %data_dir.display(), granules = granules.len(), "aggregated");

    let destinations = DestinationConfig::new(&settings.store.scheme, &settings.store.prefix, roi);
    if let Err(e) = destinations.validate() {
        warn!(error = %e, "destination is malformed; every transfer will fail");
    }

    let store: Box<dyn ObjectStore> = if settings.dry_run {
        Box::new(DryRunStore::new(&settings.store.program))
    } else {
        Box::new(GcloudStore::new(&settings.store.program, &settings.store.scheme))
    };

    let entries = run_batch(granules, &destinations, store.as_ref());
    info!(
        uploaded = ids_with_status(&entries, UploadStatus::Uploaded).len(),
        failed = ids_with_status(&entries, UploadStatus::Failed).len(),
        incomplete = ids_with_status(&entries, UploadStatus::Incomplete).len(),
        "batch finished"
    );

    match report::write_granules(io::stdout().lock(), entries.iter().map(|e| &e.granule)) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            error!(error = %e, "report failed");
            ExitCode::from(&e)
        }
    }
}

fn run_catalog(
    config_path: Option<&Path>,
    bucket: &str,
    collection: &str,
    sidecar_dir: &Path,
    dry_run: bool,
) -> ExitCode {
    let config = match load_config(config_path, cli_overrides(dry_run, None)) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "configuration error");
            return ExitCode::from(&e);
        }
    };
    let settings = &config.settings;

    // Listing is read-only, so a dry run still lists the real bucket.
    let store = GcloudStore::new(&settings.store.program, &settings.store.scheme);
    let catalog: Box<dyn Catalog> = if settings.dry_run {
        Box::new(DryRunCatalog::new(&settings.catalog.program))
    } else {
        Box::new(EarthEngineCatalog::new(&settings.catalog.program))
    };

    let workflow = CatalogWorkflow::new(&store, catalog.as_ref(), &settings.catalog);
    let (results, code) = match workflow.run(bucket, collection, sidecar_dir) {
        Ok(r) => (r, ExitCode::Success),
        Err(WorkflowError::MissingSidecar {
            granule,
            file,
            dir,
            completed,
        }) => {
            error!(%granule, %file, dir = %dir.display(), "catalog upload aborted: xml sidecar missing");
            (completed, ExitCode::MissingSidecar)
        }
        Err(e) => {
            error!(error = %e, "catalog upload aborted");
            return ExitCode::from(&e);
        }
    };

    match report::write_assets(io::stdout().lock(), &results) {
        Ok(()) => code,
        Err(e) => {
            error!(error = %e, "report failed");
            ExitCode::from(&e)
        }
    }
}

fn run_inspect(sidecar: &Path) -> ExitCode {
    let properties = SidecarSchema::from_path(sidecar).and_then(|schema| extract(sidecar, schema));
    match properties {
        Ok(properties) => {
            println!("{}", properties.to_args().join(" "));
            ExitCode::Success
        }
        Err(e) => {
            error!(error = %e, path = %sidecar.display(), "cannot read sidecar");
            match e {
                MetadataError::Io { .. } => ExitCode::Io,
                _ => ExitCode::Config,
            }
        }
    }
}
