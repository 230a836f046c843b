use crate::{cursor::QueryResult, error::MergeError};
use model::{core::value::Value, statement::order_by::OrderByItem};

/// Values of the GROUP BY columns of one row. Strings of case-insensitive
/// items are folded to lowercase so `'A'` and `'a'` land in one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct GroupKey(Vec<Value>);

impl GroupKey {
    pub fn read(query_result: &dyn QueryResult, items: &[OrderByItem]) -> Result<Self, MergeError> {
        items
            .iter()
            .map(|item| {
                let value = query_result.value(item.index)?;
                Ok(match value {
                    Value::String(s) if !item.case_sensitive => Value::String(s.to_lowercase()),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, MergeError>>()
            .map(GroupKey)
    }
}
