use crate::{
    cursor::{QueryResult, check_column, release_all},
    error::MergeError,
    stream::order_by_value::OrderByValue,
};
use async_trait::async_trait;
use model::{
    core::{database_type::DatabaseType, value::Value},
    statement::order_by::OrderByItem,
};
use std::{cmp::Reverse, collections::BinaryHeap, iter, sync::Arc};

/// k-way merge of shard result sets that are each sorted by the statement's
/// ORDER BY, producing one globally sorted sequence.
///
/// The heap holds every shard that still has a row; its top is the current
/// row. Building the merge positions each shard on its first row.
pub struct OrderByStreamMergedResult {
    queue: BinaryHeap<Reverse<OrderByValue>>,
    first_next: bool,
    column_count: usize,
}

impl OrderByStreamMergedResult {
    pub async fn new(
        query_results: Vec<Box<dyn QueryResult>>,
        order_by: Vec<OrderByItem>,
        database_type: DatabaseType,
        column_count: usize,
    ) -> Result<Self, MergeError> {
        let order_by: Arc<[OrderByItem]> = order_by.into();
        let mut queue = BinaryHeap::with_capacity(query_results.len());
        let mut pending = query_results.into_iter().enumerate();

        while let Some((shard_index, query_result)) = pending.next() {
            let mut order_by_value =
                OrderByValue::new(shard_index, query_result, order_by.clone(), database_type);
            match order_by_value.next().await {
                Ok(true) => queue.push(Reverse(order_by_value)),
                Ok(false) => release_all(iter::once(order_by_value.query_result_mut())).await,
                Err(err) => {
                    let mut opened: Vec<Box<dyn QueryResult>> = queue
                        .into_iter()
                        .map(|Reverse(value)| value.into_query_result())
                        .chain(iter::once(order_by_value.into_query_result()))
                        .chain(pending.map(|(_, query_result)| query_result))
                        .collect();
                    release_all(opened.iter_mut()).await;
                    return Err(err);
                }
            }
        }

        Ok(Self {
            queue,
            first_next: true,
            column_count,
        })
    }

    /// Index of the shard the current row comes from.
    pub fn current_shard(&self) -> Option<usize> {
        if self.first_next {
            return None;
        }
        self.queue.peek().map(|Reverse(value)| value.shard_index())
    }

    /// Sort key of the current row.
    pub fn current_order_values(&self) -> Option<&[Value]> {
        if self.first_next {
            return None;
        }
        self.queue.peek().map(|Reverse(value)| value.order_values())
    }

    async fn release(&mut self) {
        let mut opened: Vec<Box<dyn QueryResult>> = self
            .queue
            .drain()
            .map(|Reverse(value)| value.into_query_result())
            .collect();
        release_all(opened.iter_mut()).await;
    }
}

#[async_trait]
impl QueryResult for OrderByStreamMergedResult {
    async fn next(&mut self) -> Result<bool, MergeError> {
        if self.queue.is_empty() {
            return Ok(false);
        }
        if self.first_next {
            self.first_next = false;
            return Ok(true);
        }

        let Some(Reverse(mut first)) = self.queue.pop() else {
            return Ok(false);
        };
        match first.next().await {
            Ok(true) => self.queue.push(Reverse(first)),
            Ok(false) => release_all(iter::once(first.query_result_mut())).await,
            Err(err) => {
                release_all(iter::once(first.query_result_mut())).await;
                self.release().await;
                return Err(err);
            }
        }

        Ok(!self.queue.is_empty())
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        check_column(column_index, self.column_count)?;
        if self.first_next {
            return Err(MergeError::NoCurrentRow);
        }
        match self.queue.peek() {
            Some(Reverse(current)) => current.query_result().value(column_index),
            None => Err(MergeError::NoCurrentRow),
        }
    }

    fn column_count(&self) -> usize {
        self.column_count
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        self.release().await;
        Ok(())
    }
}
