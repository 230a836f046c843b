use crate::error::CliError;
use merge_engine::cursor::{MemoryQueryResult, QueryResult};
use model::{
    core::{database_type::DatabaseType, value::Value},
    statement::context::MergeContext,
};
use serde::Deserialize;

/// Shard result sets plus the statement metadata needed to merge them.
///
/// Cells are plain JSON scalars; objects and arrays are kept as JSON values.
#[derive(Debug, Deserialize)]
pub struct MergeFixture {
    #[serde(default)]
    pub database_type: DatabaseType,
    pub context: MergeContext,
    #[serde(default)]
    pub shards: Vec<Vec<Vec<serde_json::Value>>>,
}

impl MergeFixture {
    pub async fn load(path: &str) -> Result<Self, CliError> {
        let source = tokio::fs::read_to_string(path).await?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Self, CliError> {
        let fixture: MergeFixture = serde_json::from_str(source)?;
        let column_count = fixture.context.column_count;
        for (shard, rows) in fixture.shards.iter().enumerate() {
            if let Some((row, cells)) = rows
                .iter()
                .enumerate()
                .find(|(_, cells)| cells.len() > column_count)
            {
                return Err(CliError::InvalidFixture(format!(
                    "shard {shard} row {row} has {} cells, context projects {column_count} columns",
                    cells.len()
                )));
            }
        }
        Ok(fixture)
    }

    pub fn query_results(&self) -> Vec<Box<dyn QueryResult>> {
        self.shards
            .iter()
            .map(|rows| {
                let rows = rows
                    .iter()
                    .map(|cells| cells.iter().map(scalar).collect())
                    .collect();
                MemoryQueryResult::new(self.context.column_count, rows).boxed()
            })
            .collect()
    }
}

fn scalar(cell: &serde_json::Value) -> Value {
    match cell {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Boolean(*v),
        serde_json::Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Value::Int(v)
            } else if let Some(v) = n.as_u64() {
                Value::Uint(v)
            } else {
                n.as_f64().map(Value::Float).unwrap_or(Value::Null)
            }
        }
        serde_json::Value::String(v) => Value::String(v.clone()),
        other => Value::Json(other.clone()),
    }
}
