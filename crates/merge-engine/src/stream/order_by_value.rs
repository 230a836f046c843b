use crate::{compare::compare_keys, cursor::QueryResult, error::MergeError};
use model::{
    core::{database_type::DatabaseType, value::Value},
    statement::order_by::OrderByItem,
};
use std::{cmp::Ordering, sync::Arc};

/// A shard cursor together with the sort key of its current row.
///
/// Keys are read once per `next()` so heap comparisons never touch the cursor.
pub(crate) struct OrderByValue {
    shard_index: usize,
    query_result: Box<dyn QueryResult>,
    order_by: Arc<[OrderByItem]>,
    database_type: DatabaseType,
    order_values: Vec<Value>,
}

impl OrderByValue {
    pub fn new(
        shard_index: usize,
        query_result: Box<dyn QueryResult>,
        order_by: Arc<[OrderByItem]>,
        database_type: DatabaseType,
    ) -> Self {
        Self {
            shard_index,
            query_result,
            order_by,
            database_type,
            order_values: Vec::new(),
        }
    }

    pub async fn next(&mut self) -> Result<bool, MergeError> {
        let has_row = self.query_result.next().await?;
        self.order_values = if has_row {
            self.order_by
                .iter()
                .map(|item| self.query_result.value(item.index))
                .collect::<Result<_, _>>()?
        } else {
            Vec::new()
        };
        Ok(has_row)
    }

    pub fn query_result(&self) -> &dyn QueryResult {
        self.query_result.as_ref()
    }

    pub fn query_result_mut(&mut self) -> &mut Box<dyn QueryResult> {
        &mut self.query_result
    }

    pub fn into_query_result(self) -> Box<dyn QueryResult> {
        self.query_result
    }

    pub fn shard_index(&self) -> usize {
        self.shard_index
    }

    pub fn order_values(&self) -> &[Value] {
        &self.order_values
    }
}

impl Ord for OrderByValue {
    /// Sort key first, shard index as the tie-breaker so equal keys come out
    /// in shard order.
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(
            &self.order_values,
            &other.order_values,
            &self.order_by,
            self.database_type,
        )
        .then_with(|| self.shard_index.cmp(&other.shard_index))
    }
}

impl PartialOrd for OrderByValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderByValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderByValue {}
