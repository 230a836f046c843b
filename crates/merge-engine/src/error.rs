use model::statement::context::ContextError;
use std::error::Error as StdError;
use thiserror::Error;

/// Errors raised while merging shard result sets into one logical cursor.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A shard cursor failed to advance or to decode a value. The shard's own
    /// error is kept as the source, unchanged.
    #[error("Source read error: {0}")]
    SourceRead(#[source] Box<dyn StdError + Send + Sync>),

    /// `value()` was called while no row is current: before the first
    /// successful `next()` or after `next()` returned false.
    #[error("No current row: the cursor is not positioned on a row")]
    NoCurrentRow,

    /// `value()` was called with a column the statement does not project.
    #[error("Column index {index} out of range for {count} projected columns")]
    ColumnOutOfRange { index: usize, count: usize },

    /// The statement metadata handed to the merger is inconsistent.
    #[error("Invalid merge context: {0}")]
    InvalidContext(#[from] ContextError),

    /// Aggregate inputs that cannot be combined, e.g. SUM over text.
    #[error("Aggregation error: {0}")]
    Aggregation(String),
}

impl MergeError {
    pub fn source_read<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        MergeError::SourceRead(err.into())
    }

    /// Caller-side programming errors, as opposed to failures of the data source.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            MergeError::NoCurrentRow | MergeError::ColumnOutOfRange { .. }
        )
    }
}
