//! File-parallel execution of a task.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::{Annotator, PipelineError, TableAnnotation};
use crate::config::TaskConfig;
use crate::output::ResultWriter;
use crate::table::{Table, TaskManifest};
use crate::task::{TableTargets, TaskKind};

/// One table to annotate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableJob {
    pub targets: TableTargets,
    pub path: PathBuf,
}

impl TableJob {
    /// One job per manifest table, reading `<tables_dir>/<table>.csv`.
    pub fn from_manifest(manifest: &TaskManifest, config: &TaskConfig) -> Vec<TableJob> {
        manifest
            .targets
            .iter()
            .map(|targets| TableJob {
                path: config.table_path(&targets.table),
                targets: targets.clone(),
            })
            .collect()
    }
}

/// What happened to one table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableOutcome {
    Annotated {
        table: String,
        records: usize,
        path: PathBuf,
    },
    /// Processed without producing any answer.
    Omitted { table: String },
    Failed { table: String, reason: String },
}

impl TableOutcome {
    pub fn table(&self) -> &str {
        match self {
            TableOutcome::Annotated { table, .. }
            | TableOutcome::Omitted { table }
            | TableOutcome::Failed { table, .. } => table,
        }
    }
}

/// Summary of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub task: TaskKind,
    pub files: usize,
    pub annotated: usize,
    pub records: usize,
    pub omitted: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    fn new(task: TaskKind, files: usize) -> Self {
        let now = Utc::now();
        Self {
            task,
            files,
            annotated: 0,
            records: 0,
            omitted: Vec::new(),
            failed: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    fn record(&mut self, outcome: TableOutcome) {
        match outcome {
            TableOutcome::Annotated { records, .. } => {
                self.annotated += 1;
                self.records += records;
            }
            TableOutcome::Omitted { table } => self.omitted.push(table),
            TableOutcome::Failed { table, reason } => self.failed.push((table, reason)),
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Tables listed in the error file.
    pub fn errors(&self) -> usize {
        self.omitted.len() + self.failed.len()
    }
}

/// Runs a task over many tables with a bounded number of workers.
pub struct Orchestrator {
    annotator: Arc<Annotator>,
    writer: ResultWriter,
    workers: usize,
}

impl Orchestrator {
    pub fn new(annotator: Arc<Annotator>, writer: ResultWriter, workers: usize) -> Self {
        Self {
            annotator,
            writer,
            workers: workers.max(1),
        }
    }

    /// Annotate every job and write its results as soon as it completes.
    ///
    /// `on_outcome` is called once per table in completion order. A table
    /// that fails or yields nothing goes to the error list; a fatal error
    /// aborts the remaining tables and is returned.
    pub async fn run<F>(&self, jobs: Vec<TableJob>, mut on_outcome: F) -> Result<RunReport, PipelineError>
    where
        F: FnMut(&TableOutcome),
    {
        let task = self.annotator.task();
        let mut report = RunReport::new(task, jobs.len());
        info!(task = %task, files = jobs.len(), workers = self.workers, "starting run");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut join_set: JoinSet<(String, Result<TableAnnotation, PipelineError>)> = JoinSet::new();

        for job in jobs {
            let sem = Arc::clone(&semaphore);
            let annotator = Arc::clone(&self.annotator);

            join_set.spawn(async move {
                let table = job.targets.table.clone();
                let result = process(&annotator, job, sem).await;
                (table, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            let (table, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    join_set.abort_all();
                    return Err(PipelineError::Join(format!("table task panicked: {}", e)));
                }
            };

            let outcome = match result {
                Ok(annotation) if annotation.is_empty() => {
                    info!(table = %table, "no answer for table");
                    self.writer.record_error(&table)?;
                    TableOutcome::Omitted { table }
                }
                Ok(annotation) => {
                    let path = self.writer.write(&table, &annotation)?;
                    info!(table = %table, records = annotation.len(), "annotated table");
                    TableOutcome::Annotated {
                        table,
                        records: annotation.len(),
                        path,
                    }
                }
                Err(e) if e.is_fatal() => {
                    join_set.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    warn!(table = %table, error = %e, "table failed");
                    self.writer.record_error(&table)?;
                    TableOutcome::Failed {
                        table,
                        reason: e.to_string(),
                    }
                }
            };

            on_outcome(&outcome);
            report.record(outcome);
        }

        report.finished_at = Utc::now();
        info!(
            annotated = report.annotated,
            errors = report.errors(),
            seconds = report.duration().num_seconds(),
            "run finished"
        );

        Ok(report)
    }
}

async fn process(
    annotator: &Annotator,
    job: TableJob,
    semaphore: Arc<Semaphore>,
) -> Result<TableAnnotation, PipelineError> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|_| PipelineError::Join("worker pool closed".into()))?;

    info!(table = %job.targets.table, "annotating table");

    let path = job.path.clone();
    let table = tokio::task::spawn_blocking(move || Table::from_path(&path)).await??;

    annotator.annotate(&table, &job.targets).await
}
