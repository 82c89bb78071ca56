use std::sync::Arc;

use tracing::debug;

use super::PipelineError;
use crate::config::{Config, SearchConfig};
use crate::matcher::{ColumnMatcher, MatchOutput};
use crate::ranking::{
    annotate_column_types, AggregatedCandidate, ColumnTypeAnnotation, RankingEngine, ScoringContext,
};
use crate::relation::{RelationEdge, RelationExtractor};
use crate::search::SearchBackend;
use crate::table::Table;
use crate::task::{TableTargets, TaskKind};

/// Final answers for one table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableAnnotation {
    /// One entity per cell.
    Cells(Vec<AggregatedCandidate>),
    /// One type per column.
    Columns(Vec<ColumnTypeAnnotation>),
    /// One relation per column pair.
    Relations(Vec<RelationEdge>),
}

impl TableAnnotation {
    pub fn len(&self) -> usize {
        match self {
            TableAnnotation::Cells(v) => v.len(),
            TableAnnotation::Columns(v) => v.len(),
            TableAnnotation::Relations(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs one task on one table.
pub struct Annotator {
    backend: Arc<dyn SearchBackend>,
    ctx: Arc<ScoringContext>,
    task: TaskKind,
    search: SearchConfig,
    sample_rows: usize,
}

impl Annotator {
    pub fn new(backend: Arc<dyn SearchBackend>, ctx: Arc<ScoringContext>, config: &Config) -> Self {
        Self {
            backend,
            ctx,
            task: config.task.kind,
            search: config.search.clone(),
            sample_rows: config.run.sample_rows,
        }
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }

    /// Search the target cells, then rank on the blocking pool.
    pub async fn annotate(&self, table: &Table, targets: &TableTargets) -> Result<TableAnnotation, PipelineError> {
        let matcher = ColumnMatcher::new(self.backend.as_ref(), &self.ctx, &self.search);

        let seed = matcher.table_hint(&table.name).await?;
        let rows = targets.sampled_rows(self.task, self.sample_rows);

        let head_keywords = table.keywords(&rows, &targets.columns);
        let head = matcher
            .match_rows(&head_keywords, &self.search.index, &seed)
            .await?;

        let tail = if self.task == TaskKind::ColumnPair {
            let tail_keywords = table.keywords(&rows, &targets.tail_columns);
            Some(
                matcher
                    .match_rows(&tail_keywords, &self.search.tail_index, &seed)
                    .await?,
            )
        } else {
            None
        };

        let ctx = Arc::clone(&self.ctx);
        let task = self.task;
        let annotation = tokio::task::spawn_blocking(move || resolve(ctx, task, head, tail)).await?;

        debug!(table = %table.name, records = annotation.len(), "resolved table");
        Ok(annotation)
    }
}

/// Rank matched signals into the task's answers.
///
/// For the column-pair task, `tail` holds the matches of the tail columns
/// and relations are looked up among the head entities.
pub fn resolve(
    ctx: Arc<ScoringContext>,
    task: TaskKind,
    head: MatchOutput,
    tail: Option<MatchOutput>,
) -> TableAnnotation {
    let engine = RankingEngine::new(Arc::clone(&ctx));
    let winners = engine.rank(&head.signals, task);

    match task {
        TaskKind::CellEntity => TableAnnotation::Cells(winners),
        TaskKind::ColumnType => TableAnnotation::Columns(annotate_column_types(&winners, &ctx)),
        TaskKind::ColumnPair => {
            let tail_winners = tail
                .map(|t| engine.rank(&t.signals, task))
                .unwrap_or_default();
            TableAnnotation::Relations(
                RelationExtractor::new(&head.relations).extract(&winners, &tail_winners),
            )
        }
    }
}
