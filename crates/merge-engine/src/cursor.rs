use crate::error::MergeError;
use async_trait::async_trait;
use model::core::value::Value;
use std::collections::VecDeque;
use tracing::warn;

/// Forward-only cursor over a result set.
///
/// Shard cursors handed over by the execution layer implement it, and so does
/// every merged result, which is what lets decorators stack on any of them.
#[async_trait]
pub trait QueryResult: Send {
    /// Moves to the next row. Returns `false` once the result set is
    /// exhausted; after that every call returns `false`.
    async fn next(&mut self) -> Result<bool, MergeError>;

    /// Reads a column (0-based) of the current row.
    fn value(&self, column_index: usize) -> Result<Value, MergeError>;

    fn column_count(&self) -> usize;

    /// Releases the underlying resources. Dropping the cursor also releases
    /// them; `close` exists for sources that can report a failure.
    async fn close(&mut self) -> Result<(), MergeError> {
        Ok(())
    }
}

#[async_trait]
impl<T: QueryResult + ?Sized> QueryResult for Box<T> {
    async fn next(&mut self) -> Result<bool, MergeError> {
        (**self).next().await
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        (**self).value(column_index)
    }

    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        (**self).close().await
    }
}

pub(crate) fn check_column(index: usize, count: usize) -> Result<(), MergeError> {
    if index >= count {
        return Err(MergeError::ColumnOutOfRange { index, count });
    }
    Ok(())
}

/// Best-effort release of shard cursors after a failure or on close. Close
/// errors are logged, never raised, so the original error is what the caller sees.
pub(crate) async fn release_all<'a, I>(query_results: I)
where
    I: IntoIterator<Item = &'a mut Box<dyn QueryResult>>,
{
    for query_result in query_results {
        if let Err(err) = query_result.close().await {
            warn!("Failed to release query result: {err}");
        }
    }
}

/// Result set fully held in memory, e.g. rows already fetched from a shard.
#[derive(Debug, Clone)]
pub struct MemoryQueryResult {
    column_count: usize,
    rows: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
    exhausted: bool,
}

impl MemoryQueryResult {
    pub fn new(column_count: usize, rows: Vec<Vec<Value>>) -> Self {
        Self {
            column_count,
            rows: rows.into(),
            current: None,
            exhausted: false,
        }
    }

    pub fn boxed(self) -> Box<dyn QueryResult> {
        Box::new(self)
    }
}

#[async_trait]
impl QueryResult for MemoryQueryResult {
    async fn next(&mut self) -> Result<bool, MergeError> {
        if self.exhausted {
            return Ok(false);
        }
        self.current = self.rows.pop_front();
        if self.current.is_none() {
            self.exhausted = true;
        }
        Ok(self.current.is_some())
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        check_column(column_index, self.column_count)?;
        let row = self.current.as_ref().ok_or(MergeError::NoCurrentRow)?;
        // Short rows read as NULL past their end.
        Ok(row.get(column_index).cloned().unwrap_or(Value::Null))
    }

    fn column_count(&self) -> usize {
        self.column_count
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        self.rows.clear();
        self.current = None;
        self.exhausted = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_query_result_is_terminal() {
        let mut result = MemoryQueryResult::new(1, vec![vec![Value::Int(1)]]);

        assert!(matches!(result.value(0), Err(MergeError::NoCurrentRow)));
        assert!(result.next().await.unwrap());
        assert_eq!(result.value(0).unwrap(), Value::Int(1));
        assert!(!result.next().await.unwrap());
        assert!(!result.next().await.unwrap());
        assert!(matches!(result.value(0), Err(MergeError::NoCurrentRow)));
    }

    #[tokio::test]
    async fn test_memory_query_result_column_range() {
        let mut result = MemoryQueryResult::new(2, vec![vec![Value::Int(1)]]);
        assert!(result.next().await.unwrap());
        assert_eq!(result.value(1).unwrap(), Value::Null);
        assert!(matches!(
            result.value(2),
            Err(MergeError::ColumnOutOfRange { index: 2, count: 2 })
        ));
    }
}
