use crate::{
    compare::compare_rows,
    cursor::{QueryResult, check_column, release_all},
    error::MergeError,
    group_by::{GroupRow, key::GroupKey},
};
use async_trait::async_trait;
use model::{
    core::{database_type::DatabaseType, value::Value},
    statement::context::MergeContext,
};
use std::collections::HashMap;
use tracing::debug;

/// Group-by merge for shards whose rows are not sorted by the group key.
///
/// Drains every shard on construction, keeping the first row and one partial
/// aggregate per distinct group, then exposes the merged rows sorted by ORDER
/// BY (or by the group key when there is none). A statement with aggregates
/// but no GROUP BY forms a single group.
pub struct GroupByMemoryMergedResult {
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
    column_count: usize,
}

impl GroupByMemoryMergedResult {
    pub async fn new(
        mut query_results: Vec<Box<dyn QueryResult>>,
        context: &MergeContext,
        database_type: DatabaseType,
    ) -> Result<Self, MergeError> {
        let mut positions: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<GroupRow> = Vec::new();

        for shard_index in 0..query_results.len() {
            let drained = Self::collect(
                &mut query_results[shard_index],
                context,
                &mut positions,
                &mut groups,
            )
            .await;
            if let Err(err) = drained {
                release_all(query_results.iter_mut()).await;
                return Err(err);
            }
        }
        release_all(query_results.iter_mut()).await;

        if groups.is_empty() && !context.has_group_by() && context.has_aggregations() {
            groups.push(GroupRow::empty(context.column_count, &context.aggregations));
        }

        let mut rows: Vec<Vec<Value>> = groups
            .into_iter()
            .map(|group| group.finish(&context.aggregations))
            .collect();

        let sort_items = if context.has_order_by() {
            &context.order_by
        } else {
            &context.group_by
        };
        if !sort_items.is_empty() {
            rows.sort_by(|a, b| compare_rows(a, b, sort_items, database_type));
        }

        debug!("Merged {} groups in memory", rows.len());

        Ok(Self {
            rows: rows.into_iter(),
            current: None,
            column_count: context.column_count,
        })
    }

    async fn collect(
        query_result: &mut Box<dyn QueryResult>,
        context: &MergeContext,
        positions: &mut HashMap<GroupKey, usize>,
        groups: &mut Vec<GroupRow>,
    ) -> Result<(), MergeError> {
        while query_result.next().await? {
            let key = GroupKey::read(query_result.as_ref(), &context.group_by)?;
            let position = match positions.get(&key) {
                Some(position) => *position,
                None => {
                    groups.push(GroupRow::start(
                        query_result.as_ref(),
                        context.column_count,
                        &context.aggregations,
                    )?);
                    positions.insert(key, groups.len() - 1);
                    groups.len() - 1
                }
            };
            groups[position].aggregate(query_result.as_ref(), &context.aggregations)?;
        }
        Ok(())
    }
}

#[async_trait]
impl QueryResult for GroupByMemoryMergedResult {
    async fn next(&mut self) -> Result<bool, MergeError> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        check_column(column_index, self.column_count)?;
        let row = self.current.as_ref().ok_or(MergeError::NoCurrentRow)?;
        Ok(row[column_index].clone())
    }

    fn column_count(&self) -> usize {
        self.column_count
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        self.rows = Vec::new().into_iter();
        self.current = None;
        Ok(())
    }
}
