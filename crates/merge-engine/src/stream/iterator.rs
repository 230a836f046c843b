use crate::{
    cursor::{QueryResult, check_column, release_all},
    error::MergeError,
};
use async_trait::async_trait;
use model::core::value::Value;

/// Concatenates shard result sets in shard order.
///
/// Used when the statement needs no cross-shard interleaving. Each shard is
/// drained before the next one is touched.
pub struct IteratorStreamMergedResult {
    query_results: Vec<Box<dyn QueryResult>>,
    current: usize,
    positioned: bool,
    column_count: usize,
}

impl IteratorStreamMergedResult {
    pub fn new(query_results: Vec<Box<dyn QueryResult>>, column_count: usize) -> Self {
        Self {
            query_results,
            current: 0,
            positioned: false,
            column_count,
        }
    }

    /// Index of the shard the current row comes from.
    pub fn current_shard(&self) -> Option<usize> {
        self.positioned.then_some(self.current)
    }
}

#[async_trait]
impl QueryResult for IteratorStreamMergedResult {
    async fn next(&mut self) -> Result<bool, MergeError> {
        while let Some(query_result) = self.query_results.get_mut(self.current) {
            match query_result.next().await {
                Ok(true) => {
                    self.positioned = true;
                    return Ok(true);
                }
                Ok(false) => self.current += 1,
                Err(err) => {
                    self.positioned = false;
                    self.current = self.query_results.len();
                    release_all(self.query_results.iter_mut()).await;
                    return Err(err);
                }
            }
        }
        self.positioned = false;
        Ok(false)
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        check_column(column_index, self.column_count)?;
        match self.current_shard() {
            Some(shard) => self.query_results[shard].value(column_index),
            None => Err(MergeError::NoCurrentRow),
        }
    }

    fn column_count(&self) -> usize {
        self.column_count
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        self.positioned = false;
        self.current = self.query_results.len();
        release_all(self.query_results.iter_mut()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::MemoryQueryResult;

    fn shard(values: &[i64]) -> Box<dyn QueryResult> {
        MemoryQueryResult::new(1, values.iter().map(|v| vec![Value::Int(*v)]).collect()).boxed()
    }

    async fn drain(result: &mut IteratorStreamMergedResult) -> Vec<(usize, Value)> {
        let mut rows = Vec::new();
        while result.next().await.unwrap() {
            rows.push((result.current_shard().unwrap(), result.value(0).unwrap()));
        }
        rows
    }

    #[tokio::test]
    async fn test_concatenates_in_shard_order() {
        let mut result =
            IteratorStreamMergedResult::new(vec![shard(&[3, 1]), shard(&[]), shard(&[2])], 1);

        let rows = drain(&mut result).await;
        assert_eq!(
            rows,
            vec![
                (0, Value::Int(3)),
                (0, Value::Int(1)),
                (2, Value::Int(2)),
            ]
        );
        assert!(!result.next().await.unwrap());
        assert!(matches!(result.value(0), Err(MergeError::NoCurrentRow)));
    }

    #[tokio::test]
    async fn test_no_shards() {
        let mut result = IteratorStreamMergedResult::new(Vec::new(), 1);
        assert!(!result.next().await.unwrap());
    }

    #[tokio::test]
    async fn test_value_before_first_next() {
        let result = IteratorStreamMergedResult::new(vec![shard(&[1])], 1);
        assert!(matches!(result.value(0), Err(MergeError::NoCurrentRow)));
        assert!(matches!(
            result.value(1),
            Err(MergeError::ColumnOutOfRange { index: 1, count: 1 })
        ));
    }
}
