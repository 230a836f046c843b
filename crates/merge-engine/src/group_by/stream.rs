use crate::{
    cursor::{QueryResult, check_column},
    error::MergeError,
    group_by::{GroupRow, key::GroupKey},
    stream::order_by::OrderByStreamMergedResult,
};
use async_trait::async_trait;
use model::{
    core::{database_type::DatabaseType, value::Value},
    statement::{aggregation::AggregationProjection, context::MergeContext, order_by::OrderByItem},
};
use tracing::warn;

/// Group-by merge over shards already sorted by the group key.
///
/// Runs an ordered merge underneath, so rows of one group arrive adjacent
/// across all shards. Only the group being built is held; reading the first
/// row of the following group is what ends the current one.
pub struct GroupByStreamMergedResult {
    inner: OrderByStreamMergedResult,
    group_by: Vec<OrderByItem>,
    aggregations: Vec<AggregationProjection>,
    column_count: usize,
    inner_has_row: bool,
    current_row: Option<Vec<Value>>,
}

impl GroupByStreamMergedResult {
    pub async fn new(
        query_results: Vec<Box<dyn QueryResult>>,
        context: &MergeContext,
        database_type: DatabaseType,
    ) -> Result<Self, MergeError> {
        let inner = OrderByStreamMergedResult::new(
            query_results,
            context.order_by.clone(),
            database_type,
            context.column_count,
        )
        .await?;

        let mut result = Self {
            inner,
            group_by: context.group_by.clone(),
            aggregations: context.aggregations.clone(),
            column_count: context.column_count,
            inner_has_row: false,
            current_row: None,
        };
        result.inner_has_row = result.inner.next().await?;
        Ok(result)
    }

    async fn next_group(&mut self) -> Result<bool, MergeError> {
        if !self.inner_has_row {
            return Ok(false);
        }

        let group_key = GroupKey::read(&self.inner, &self.group_by)?;
        let mut group = GroupRow::start(&self.inner, self.column_count, &self.aggregations)?;
        loop {
            group.aggregate(&self.inner, &self.aggregations)?;
            self.inner_has_row = self.inner.next().await?;
            if !self.inner_has_row || GroupKey::read(&self.inner, &self.group_by)? != group_key {
                break;
            }
        }

        self.current_row = Some(group.finish(&self.aggregations));
        Ok(true)
    }
}

#[async_trait]
impl QueryResult for GroupByStreamMergedResult {
    async fn next(&mut self) -> Result<bool, MergeError> {
        self.current_row = None;
        match self.next_group().await {
            Ok(has_row) => Ok(has_row),
            Err(err) => {
                self.inner_has_row = false;
                if let Err(close_err) = self.inner.close().await {
                    warn!("Failed to release shard results after group merge error: {close_err}");
                }
                Err(err)
            }
        }
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        check_column(column_index, self.column_count)?;
        let row = self.current_row.as_ref().ok_or(MergeError::NoCurrentRow)?;
        Ok(row[column_index].clone())
    }

    fn column_count(&self) -> usize {
        self.column_count
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        self.inner_has_row = false;
        self.current_row = None;
        self.inner.close().await
    }
}
