use async_trait::async_trait;
use merge_engine::{
    cursor::{MemoryQueryResult, QueryResult},
    error::MergeError,
};
use model::core::value::Value;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// Shared counters of an instrumented cursor, readable after the cursor has
/// moved into a merge tree.
#[derive(Debug, Clone, Default)]
pub struct CursorProbe {
    next_calls: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

impl CursorProbe {
    pub fn next_calls(&self) -> usize {
        self.next_calls.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Wraps an in-memory cursor and records `next()` and `close()` calls.
pub struct CountingQueryResult {
    inner: MemoryQueryResult,
    probe: CursorProbe,
}

impl CountingQueryResult {
    pub fn new(column_count: usize, rows: Vec<Vec<Value>>) -> (Box<dyn QueryResult>, CursorProbe) {
        let probe = CursorProbe::default();
        let cursor = Self {
            inner: MemoryQueryResult::new(column_count, rows),
            probe: probe.clone(),
        };
        (Box::new(cursor), probe)
    }

    pub fn ints(values: &[i64]) -> (Box<dyn QueryResult>, CursorProbe) {
        Self::new(1, values.iter().map(|v| vec![Value::Int(*v)]).collect())
    }
}

#[async_trait]
impl QueryResult for CountingQueryResult {
    async fn next(&mut self) -> Result<bool, MergeError> {
        self.probe.next_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.next().await
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        self.inner.value(column_index)
    }

    fn column_count(&self) -> usize {
        self.inner.column_count()
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        self.probe.closed.store(true, Ordering::SeqCst);
        self.inner.close().await
    }
}

/// Error a shard reports when its connection drops mid-stream.
#[derive(Debug)]
pub struct ShardUnavailable(pub usize);

impl fmt::Display for ShardUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shard {} unavailable", self.0)
    }
}

impl std::error::Error for ShardUnavailable {}

/// Yields `rows` and then fails the next advance with [`ShardUnavailable`].
pub struct FailingQueryResult {
    shard: usize,
    inner: MemoryQueryResult,
    remaining: usize,
    probe: CursorProbe,
}

impl FailingQueryResult {
    pub fn ints(shard: usize, values: &[i64]) -> (Box<dyn QueryResult>, CursorProbe) {
        let probe = CursorProbe::default();
        let cursor = Self {
            shard,
            inner: MemoryQueryResult::new(1, values.iter().map(|v| vec![Value::Int(*v)]).collect()),
            remaining: values.len(),
            probe: probe.clone(),
        };
        (Box::new(cursor), probe)
    }
}

#[async_trait]
impl QueryResult for FailingQueryResult {
    async fn next(&mut self) -> Result<bool, MergeError> {
        self.probe.next_calls.fetch_add(1, Ordering::SeqCst);
        if self.remaining == 0 {
            return Err(MergeError::source_read(ShardUnavailable(self.shard)));
        }
        self.remaining -= 1;
        self.inner.next().await
    }

    fn value(&self, column_index: usize) -> Result<Value, MergeError> {
        self.inner.value(column_index)
    }

    fn column_count(&self) -> usize {
        1
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        self.probe.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Reads every remaining row of `result` in full.
pub async fn drain<R: QueryResult + ?Sized>(result: &mut R) -> Vec<Vec<Value>> {
    let mut rows = Vec::new();
    while result.next().await.expect("advance merged result") {
        let row = (0..result.column_count())
            .map(|index| result.value(index).expect("read merged value"))
            .collect();
        rows.push(row);
    }
    rows
}

/// Reads column 0 of every remaining row as an integer.
pub async fn drain_ints<R: QueryResult + ?Sized>(result: &mut R) -> Vec<i64> {
    drain(result)
        .await
        .into_iter()
        .map(|row| match row.first() {
            Some(Value::Int(v)) => *v,
            other => panic!("expected integer in column 0, got {other:?}"),
        })
        .collect()
}
