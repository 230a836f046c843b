use crate::{cursor::QueryResult, error::MergeError};
use async_trait::async_trait;
use model::{core::value::Value, pagination::window::PaginationWindow};

/// Where a [`LimitDecoratorMergedResult`] is in its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    /// Discarding the first `offset` rows of the inner cursor.
    Skipping,
    /// Exposing rows while the row count allows.
    Emitting,
    /// Terminal: every further `next()` returns false.
    Exhausted,
}

/// Applies a global OFFSET/LIMIT window over any cursor.
///
/// Skipping happens lazily inside the first `next()`. The inner cursor is
/// advanced exactly `offset` times for discarded rows and at most `row_count`
/// more times for exposed rows; it is never advanced ahead of a call.
pub struct LimitDecoratorMergedResult<C> {
    inner: C,
    window: PaginationWindow,
    remaining_offset: u64,
    remaining_row_count: Option<u64>,
    state: PaginationState,
    positioned: bool,
}

impl<C: QueryResult> LimitDecoratorMergedResult<C> {
    pub fn new(inner: C, window: PaginationWindow) -> Self {
        let state = if window.offset() > 0 {
            PaginationState::Skipping
        } else {
            PaginationState::Emitting
        };
        Self {
            inner,
            window,
            remaining_offset: window.offset(),
            remaining_row_count: window.row_count(),
            state,
            positioned: false,
        }
    }

    pub fn window(&self) -> PaginationWindow {
        self.window
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn remaining_offset(&self) -> u64 {
        self.remaining_offset
    }

    /// `None` when the window is unbounded.
    pub fn remaining_row_count(&self) -> Option<u64> {
        self.remaining_row_count
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Discards rows until the offset is used up. Returns false if the inner
    /// cursor ran out first.
    async fn skip_offset(&mut self) -> Result<bool, MergeError> {
        while self.remaining_offset > 0 {
            if !self.inner.next().await? {
                return Ok(false);
            }
            self.remaining_offset -= 1;
        }
        Ok(true)
    }

    async fn advance(&mut self) -> Result<bool, MergeError> {
        if self.state == PaginationState::Skipping {
            if !self.skip_offset().await? {
                self.state = PaginationState::Exhausted;
                return Ok(false);
            }
            self.state = PaginationState::Emitting;
        }

        if self.state == PaginationState::Exhausted {
            return Ok(false);
        }

        if self.remaining_row_count == Some(0) {
            self.state = PaginationState::Exhausted;
            return Ok(false);
        }
        if !self.inner.next().await? {
            self.state = PaginationState::Exhausted;
            return Ok(false);
        }
        if let Some(remaining) = self.remaining_row_count.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                self.state = PaginationState::Exhausted;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl<C: QueryResult> QueryResult for LimitDecoratorMergedResult<C> {
    async fn next(&mut self) -> Result<bool, MergeError> {
        self.positioned = false;
        match self.advance().await {
            Ok(has_row) => {
                self.positioned = has_row;
                Ok(has_row)
            }
            Err(err) => {
                self.state = PaginationState::Exhausted;
                Err(err)
            }
        }
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        if !self.positioned {
            return Err(MergeError::NoCurrentRow);
        }
        self.inner.value(column_index)
    }

    fn column_count(&self) -> usize {
        self.inner.column_count()
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        self.state = PaginationState::Exhausted;
        self.positioned = false;
        self.inner.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::MemoryQueryResult;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    /// Counts how often the decorator advances the wrapped cursor.
    struct CountingQueryResult {
        inner: MemoryQueryResult,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl QueryResult for CountingQueryResult {
        async fn next(&mut self) -> Result<bool, MergeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.next().await
        }

        fn value(&self, column_index: usize) -> Result<Value, MergeError> {
            self.inner.value(column_index)
        }

        fn column_count(&self) -> usize {
            1
        }
    }

    fn counting(rows: i64) -> (CountingQueryResult, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = MemoryQueryResult::new(1, (0..rows).map(|v| vec![Value::Int(v)]).collect());
        (
            CountingQueryResult {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }

    async fn drain<C: QueryResult>(result: &mut LimitDecoratorMergedResult<C>) -> Vec<Value> {
        let mut values = Vec::new();
        while result.next().await.unwrap() {
            values.push(result.value(0).unwrap());
        }
        values
    }

    #[tokio::test]
    async fn test_offset_and_row_count() {
        let (inner, calls) = counting(8);
        let mut result = LimitDecoratorMergedResult::new(inner, PaginationWindow::new(2, Some(2)));

        assert_eq!(drain(&mut result).await, vec![Value::Int(2), Value::Int(3)]);
        // 2 skipped + 2 exposed; the bound stops the third read
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(result.state(), PaginationState::Exhausted);
    }

    #[tokio::test]
    async fn test_states_through_the_window() {
        let (inner, _) = counting(8);
        let mut result = LimitDecoratorMergedResult::new(inner, PaginationWindow::new(3, Some(1)));
        assert_eq!(result.state(), PaginationState::Skipping);
        assert_eq!(result.remaining_offset(), 3);

        assert!(result.next().await.unwrap());
        assert_eq!(result.state(), PaginationState::Exhausted);
        assert_eq!(result.remaining_offset(), 0);
        assert_eq!(result.remaining_row_count(), Some(0));
        // the last row of the window stays readable
        assert_eq!(result.value(0).unwrap(), Value::Int(3));

        assert!(!result.next().await.unwrap());
        assert_eq!(result.state(), PaginationState::Exhausted);
        assert!(matches!(result.value(0), Err(MergeError::NoCurrentRow)));
    }

    #[tokio::test]
    async fn test_emitting_until_the_last_row() {
        let (inner, calls) = counting(8);
        let mut result = LimitDecoratorMergedResult::new(inner, PaginationWindow::new(1, Some(2)));

        assert!(result.next().await.unwrap());
        assert_eq!(result.state(), PaginationState::Emitting);
        assert!(result.next().await.unwrap());
        assert_eq!(result.state(), PaginationState::Exhausted);
        assert_eq!(result.value(0).unwrap(), Value::Int(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_offset_beyond_rows() {
        let (inner, calls) = counting(8);
        let mut result =
            LimitDecoratorMergedResult::new(inner, PaginationWindow::offset_only(i32::MAX as u64));

        assert!(!result.next().await.unwrap());
        assert_eq!(result.state(), PaginationState::Exhausted);
        // 8 rows discarded plus the read that found the end
        assert_eq!(calls.load(Ordering::SeqCst), 9);

        assert!(!result.next().await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 9);
    }

    #[tokio::test]
    async fn test_unbounded_passes_through_after_offset() {
        let (inner, _) = counting(8);
        let mut result = LimitDecoratorMergedResult::new(inner, PaginationWindow::offset_only(2));

        assert_eq!(
            drain(&mut result).await,
            (2..8).map(Value::Int).collect::<Vec<_>>()
        );
        assert_eq!(result.remaining_row_count(), None);
    }

    #[tokio::test]
    async fn test_zero_row_count_never_reads_past_offset() {
        let (inner, calls) = counting(8);
        let mut result = LimitDecoratorMergedResult::new(inner, PaginationWindow::new(3, Some(0)));

        assert!(!result.next().await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!result.next().await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_offset_starts_emitting() {
        let (inner, calls) = counting(3);
        let mut result = LimitDecoratorMergedResult::new(inner, PaginationWindow::limit(5));
        assert_eq!(result.state(), PaginationState::Emitting);

        assert_eq!(drain(&mut result).await.len(), 3);
        // three rows plus the read that found the end
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(result.remaining_row_count(), Some(2));
    }

    #[tokio::test]
    async fn test_value_without_current_row() {
        let (inner, _) = counting(8);
        let mut result = LimitDecoratorMergedResult::new(inner, PaginationWindow::new(0, Some(1)));

        assert!(matches!(result.value(0), Err(MergeError::NoCurrentRow)));
        assert!(result.next().await.unwrap());
        assert!(!result.next().await.unwrap());
        assert!(matches!(result.value(0), Err(MergeError::NoCurrentRow)));
    }
}
