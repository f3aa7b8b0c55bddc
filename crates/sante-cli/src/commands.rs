use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use sante_cli::config::Config;
use sante_cli::pipeline::{run_pipeline, synchronise};
use sante_cli::types::{RunResult, StorageSummary};
use sante_output::{QualityReport, read_canonical_csv};
use sante_store::{
    ObservationFilter, ObservationStore, SqliteStore, StatsFilter, SyncOptions, WriteMode,
    indicator_stats, query_observations,
};

use crate::cli::{LoadArgs, QueryArgs, ReportArgs, RunArgs, SourcesArgs, StatsArgs};
use crate::summary::{
    print_configured_sources, print_observations, print_report, print_stats, print_storage,
};

/// Applies the command-line overrides of `sante run` to the configuration.
fn apply_run_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(dir) = &args.data_dir {
        config.paths.data_dir = dir.clone();
    }
    if let Some(output) = &args.output {
        config.paths.output_file = output.clone();
    }
    if let Some(db) = &args.db {
        config.database.path = db.clone();
        config.database.enabled = true;
    }
    if args.no_db {
        config.database.enabled = false;
    }
    if let Some(mode) = args.mode {
        config.database.mode = mode.into();
    }
}

pub fn run_run(args: &RunArgs) -> Result<RunResult> {
    let mut config = Config::discover(args.config.as_deref()).context("load configuration")?;
    apply_run_overrides(&mut config, args);

    if config.database.enabled {
        let mut store = open_store(&config.database.path)?;
        run_pipeline(&config, Some(&mut store as &mut dyn ObservationStore))
    } else {
        info!("storage disabled");
        run_pipeline(&config, None)
    }
}

pub fn run_load(args: &LoadArgs) -> Result<Vec<StorageSummary>> {
    let config = Config::discover(args.config.as_deref()).context("load configuration")?;
    let frame = read_canonical_csv(&args.csv)
        .with_context(|| format!("read {}", args.csv.display()))?;
    let db_path = args.db.clone().unwrap_or(config.database.path);
    let mut store = open_store(&db_path)?;
    let options = SyncOptions {
        mode: WriteMode::Replace,
        backup_dir: config.paths.backup_dir,
    };
    let storage = synchronise(&mut store, &frame, &options)?;
    print_storage(&storage);
    Ok(storage)
}

pub fn run_query(args: &QueryArgs) -> Result<()> {
    let mut store = open_existing_store(args.db.as_deref(), args.config.as_deref())?;
    let filter = ObservationFilter {
        disease: args.disease.clone(),
        indicator: args.indicator.clone(),
        year: args.year,
        region: args.region.clone(),
        limit: args.limit,
    };
    let rows = query_observations(&mut store, &filter).context("query observations")?;
    print_observations(&rows);
    Ok(())
}

pub fn run_stats(args: &StatsArgs) -> Result<()> {
    let mut store = open_existing_store(args.db.as_deref(), args.config.as_deref())?;
    let filter = StatsFilter {
        disease: args.disease.clone(),
        indicator: args.indicator.clone(),
        year: args.year,
    };
    let stats = indicator_stats(&mut store, &filter).context("compute statistics")?;
    print_stats(&stats);
    Ok(())
}

pub fn run_report(args: &ReportArgs) -> Result<()> {
    let frame = read_canonical_csv(&args.csv)
        .with_context(|| format!("read {}", args.csv.display()))?;
    let report = QualityReport::from_frame(&frame).context("compute quality report")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub fn run_sources(args: &SourcesArgs) -> Result<()> {
    let config = Config::discover(args.config.as_deref()).context("load configuration")?;
    print_configured_sources(&config);
    Ok(())
}

fn open_store(path: &Path) -> Result<SqliteStore> {
    SqliteStore::open(path).with_context(|| format!("open database {}", path.display()))
}

/// Opens the database for reading; a missing file is an error rather than
/// an empty result.
fn open_existing_store(db: Option<&Path>, config: Option<&Path>) -> Result<SqliteStore> {
    let path: PathBuf = match db {
        Some(path) => path.to_path_buf(),
        None => {
            Config::discover(config)
                .context("load configuration")?
                .database
                .path
        }
    };
    if !path.is_file() {
        bail!(
            "database {} does not exist; run `sante run` or `sante load` first",
            path.display()
        );
    }
    open_store(&path)
}
