use crate::{
    cursor::QueryResult,
    error::MergeError,
    group_by::{memory::GroupByMemoryMergedResult, stream::GroupByStreamMergedResult},
    pagination::limit::LimitDecoratorMergedResult,
    stream::{iterator::IteratorStreamMergedResult, order_by::OrderByStreamMergedResult},
};
use async_trait::async_trait;
use model::core::value::Value;

/// The single logical cursor handed back by the merger.
pub enum MergedResult {
    Iterator(IteratorStreamMergedResult),
    OrderBy(OrderByStreamMergedResult),
    GroupByStream(GroupByStreamMergedResult),
    GroupByMemory(GroupByMemoryMergedResult),
    Limit(Box<LimitDecoratorMergedResult<MergedResult>>),
}

impl MergedResult {
    /// Name of the strategy, with the decorator spelled around it.
    pub fn kind(&self) -> String {
        match self {
            MergedResult::Iterator(_) => "iterator".to_string(),
            MergedResult::OrderBy(_) => "order_by".to_string(),
            MergedResult::GroupByStream(_) => "group_by_stream".to_string(),
            MergedResult::GroupByMemory(_) => "group_by_memory".to_string(),
            MergedResult::Limit(limit) => format!("limit({})", limit.inner().kind()),
        }
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self, MergedResult::Limit(_))
    }
}

#[async_trait]
impl QueryResult for MergedResult {
    async fn next(&mut self) -> Result<bool, MergeError> {
        match self {
            MergedResult::Iterator(result) => result.next().await,
            MergedResult::OrderBy(result) => result.next().await,
            MergedResult::GroupByStream(result) => result.next().await,
            MergedResult::GroupByMemory(result) => result.next().await,
            MergedResult::Limit(result) => result.next().await,
        }
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        match self {
            MergedResult::Iterator(result) => result.value(column_index),
            MergedResult::OrderBy(result) => result.value(column_index),
            MergedResult::GroupByStream(result) => result.value(column_index),
            MergedResult::GroupByMemory(result) => result.value(column_index),
            MergedResult::Limit(result) => result.value(column_index),
        }
    }

    fn column_count(&self) -> usize {
        match self {
            MergedResult::Iterator(result) => result.column_count(),
            MergedResult::OrderBy(result) => result.column_count(),
            MergedResult::GroupByStream(result) => result.column_count(),
            MergedResult::GroupByMemory(result) => result.column_count(),
            MergedResult::Limit(result) => result.column_count(),
        }
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        match self {
            MergedResult::Iterator(result) => result.close().await,
            MergedResult::OrderBy(result) => result.close().await,
            MergedResult::GroupByStream(result) => result.close().await,
            MergedResult::GroupByMemory(result) => result.close().await,
            MergedResult::Limit(result) => result.close().await,
        }
    }
}
