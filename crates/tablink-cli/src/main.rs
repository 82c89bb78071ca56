use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tablink_core::config::{ConfigError, DEFAULT_HIERARCHY_DB_PATH};
use tablink_core::hierarchy::{load_hierarchy, HierarchyStore, SURREAL_BACKEND};
use tablink_core::pipeline::load_context;
use tablink_core::{
    Annotator, Config, ElasticBackend, Orchestrator, ResultWriter, RunReport, SearchBackend,
    SnapshotStore, SurrealHierarchyStore, TableJob, TaskKind, TaskManifest,
};

#[derive(Parser)]
#[command(name = "tablink")]
#[command(about = "Annotate tables with knowledge base entities, column types and relations", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate every table listed in the task manifest
    Run {
        /// Configuration file (defaults to ./tablink.toml or the user config)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Task to run: cea, cta or cpa
        #[arg(short, long)]
        task: Option<TaskKind>,

        /// Tables processed concurrently
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Manage the class hierarchy
    Hierarchy {
        #[command(subcommand)]
        command: HierarchyCommands,
    },
    /// Print the default configuration
    Config,
}

#[derive(Subcommand)]
enum HierarchyCommands {
    /// Load a JSON snapshot into the embedded database
    Import {
        /// Snapshot file
        snapshot: PathBuf,

        /// Database directory
        #[arg(long)]
        db: Option<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show size, depth and anomalies of the configured hierarchy
    Stats {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            task,
            workers,
        } => run(config, task, workers).await,
        Commands::Hierarchy { command } => match command {
            HierarchyCommands::Import { snapshot, db, config } => import_hierarchy(&snapshot, db, config).await,
            HierarchyCommands::Stats { config } => hierarchy_stats(config).await,
        },
        Commands::Config => {
            print!("{}", Config::default_config_string());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "tablink=debug,tablink_core=debug"
    } else {
        "tablink=info,tablink_core=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
}

async fn run(config_path: Option<PathBuf>, task: Option<TaskKind>, workers: Option<usize>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(task) = task {
        config.task.kind = task;
    }
    if let Some(workers) = workers {
        config.run.workers = workers;
    }
    config.validate()?;

    let task = config.task.kind;
    info!(task = %task, workers = config.run.workers, manifest = %config.task.manifest, "starting run");
    println!("{} ({})", task.display_name(), task);

    let manifest = TaskManifest::load(Path::new(&config.task.manifest), task)?;
    if manifest.is_empty() {
        return Err(eyre!("manifest {} lists no tables", config.task.manifest));
    }
    let jobs = TableJob::from_manifest(&manifest, &config.task);

    let ctx = load_context(&config).await?.shared();
    let backend: Arc<dyn SearchBackend> = Arc::new(ElasticBackend::from_config(&config.search)?);
    let writer = ResultWriter::create(&config.output, task)?;
    let errors_path = writer.errors_path().to_path_buf();

    let annotator = Arc::new(Annotator::new(backend, ctx, &config));
    let orchestrator = Orchestrator::new(annotator, writer, config.run.workers);

    let progress = progress_bar(jobs.len() as u64);
    let report = orchestrator
        .run(jobs, |outcome| {
            progress.set_message(outcome.table().to_string());
            progress.inc(1);
        })
        .await;
    progress.finish_and_clear();

    let report = report?;
    print_report(&report, &config.output.results_path(), &errors_path);
    Ok(())
}

fn progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress
}

fn print_report(report: &RunReport, results: &Path, errors: &Path) {
    println!();
    println!("Tables:    {}", report.files);
    println!("Annotated: {} ({} records)", report.annotated, report.records);
    println!("Omitted:   {}", report.omitted.len());
    println!("Failed:    {}", report.failed.len());
    for (table, reason) in &report.failed {
        println!("  {}: {}", table, reason);
    }
    println!(
        "Started:   {}",
        report.started_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
    );
    println!("Duration:  {}s", report.duration().num_seconds());
    println!();
    println!("Results:   {}", results.display());
    println!("Errors:    {}", errors.display());
}

async fn import_hierarchy(snapshot: &Path, db: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let db = db.unwrap_or_else(|| {
        if config.hierarchy.backend == SURREAL_BACKEND {
            PathBuf::from(&config.hierarchy.path)
        } else {
            PathBuf::from(DEFAULT_HIERARCHY_DB_PATH)
        }
    });

    let snapshot = SnapshotStore::new(snapshot).load().await?;
    let store = SurrealHierarchyStore::open(&db, &config.hierarchy.namespace, &config.hierarchy.database).await?;
    let hierarchy = store.import(&snapshot).await?;

    println!("Imported {} classes into {}", hierarchy.len(), db.display());
    println!("  Max depth: {}", hierarchy.max_depth());
    println!("  Diameter:  {}", hierarchy.diameter());
    Ok(())
}

async fn hierarchy_stats(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let hierarchy = load_hierarchy(&config.hierarchy).await?;

    println!("Backend:   {} ({})", config.hierarchy.backend, config.hierarchy.path);
    println!("Classes:   {}", hierarchy.len());
    println!("Max depth: {}", hierarchy.max_depth());
    println!("Diameter:  {}", hierarchy.diameter());

    let anomalies: Vec<&str> = hierarchy.anomalies().collect();
    println!("Classes with several parents: {}", anomalies.len());
    for uri in anomalies {
        println!("  {}", uri);
    }
    Ok(())
}
