#![allow(dead_code)]

use merge_engine::cursor::{MemoryQueryResult, QueryResult};
use model::core::value::Value;

pub mod engine;
pub mod utils;

/// Four shards of two rows each, every shard sorted ascending on column 0.
/// Merged ascending they read 1..=8.
fn sorted_shards() -> Vec<Box<dyn QueryResult>> {
    vec![
        int_shard(&[1, 5]),
        int_shard(&[2, 6]),
        int_shard(&[3, 7]),
        int_shard(&[4, 8]),
    ]
}

fn int_shard(values: &[i64]) -> Box<dyn QueryResult> {
    MemoryQueryResult::new(1, values.iter().map(|v| vec![Value::Int(*v)]).collect()).boxed()
}

/// Rows of `(name, amount)` for group-by scenarios.
fn named_shard(rows: &[(&str, i64)]) -> Box<dyn QueryResult> {
    MemoryQueryResult::new(
        2,
        rows.iter()
            .map(|(name, amount)| vec![Value::from(*name), Value::Int(*amount)])
            .collect(),
    )
    .boxed()
}
