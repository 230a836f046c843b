use crate::{
    cursor::{QueryResult, release_all},
    error::MergeError,
    group_by::{memory::GroupByMemoryMergedResult, stream::GroupByStreamMergedResult},
    merged::MergedResult,
    pagination::limit::LimitDecoratorMergedResult,
    stream::{iterator::IteratorStreamMergedResult, order_by::OrderByStreamMergedResult},
};
use model::{core::database_type::DatabaseType, statement::context::MergeContext};
use tracing::debug;

/// Combines the per-shard cursors of one logical SELECT into a single cursor.
///
/// Picks the strategy from the statement shape:
/// - GROUP BY or aggregates: stream grouping when ORDER BY matches GROUP BY,
///   in-memory grouping otherwise
/// - ORDER BY only: ordered k-way merge
/// - neither: concatenation in shard order
///
/// and wraps the result in a pagination decorator when the statement carries
/// a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShardingResultMerger {
    database_type: DatabaseType,
}

impl ShardingResultMerger {
    pub fn new(database_type: DatabaseType) -> Self {
        Self { database_type }
    }

    /// Takes ownership of the shard cursors. They are released if the context
    /// is rejected or building the merge fails.
    pub async fn merge(
        &self,
        mut query_results: Vec<Box<dyn QueryResult>>,
        context: &MergeContext,
    ) -> Result<MergedResult, MergeError> {
        if let Err(err) = context.validate() {
            release_all(query_results.iter_mut()).await;
            return Err(err.into());
        }

        let shards = query_results.len();
        let merged = self.build(query_results, context).await?;
        debug!(
            "Merging {} shard results with {} strategy",
            shards,
            merged.kind()
        );

        Ok(match context.pagination {
            Some(window) => {
                debug!(
                    "Applying pagination window offset={} row_count={:?}",
                    window.offset(),
                    window.row_count()
                );
                MergedResult::Limit(Box::new(LimitDecoratorMergedResult::new(merged, window)))
            }
            None => merged,
        })
    }

    async fn build(
        &self,
        query_results: Vec<Box<dyn QueryResult>>,
        context: &MergeContext,
    ) -> Result<MergedResult, MergeError> {
        if context.requires_grouping() {
            if context.is_same_group_by_and_order_by() {
                let result =
                    GroupByStreamMergedResult::new(query_results, context, self.database_type)
                        .await?;
                return Ok(MergedResult::GroupByStream(result));
            }
            let result =
                GroupByMemoryMergedResult::new(query_results, context, self.database_type).await?;
            return Ok(MergedResult::GroupByMemory(result));
        }

        if context.has_order_by() {
            let result = OrderByStreamMergedResult::new(
                query_results,
                context.order_by.clone(),
                self.database_type,
                context.column_count,
            )
            .await?;
            return Ok(MergedResult::OrderBy(result));
        }

        Ok(MergedResult::Iterator(IteratorStreamMergedResult::new(
            query_results,
            context.column_count,
        )))
    }
}
