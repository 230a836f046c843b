//! Merges for statements with GROUP BY or bare aggregates.
//!
//! The stream variant runs when shards return rows sorted by the group key
//! (ORDER BY equals GROUP BY) and holds only the group being built. The
//! memory variant keeps one partial aggregate per distinct group.

mod aggregation;
mod key;
pub mod memory;
pub mod stream;

use crate::{cursor::QueryResult, error::MergeError};
use aggregation::AggregationUnit;
use model::{core::value::Value, statement::aggregation::AggregationProjection};

/// A group under construction: the first row seen for it plus one partial
/// aggregate per aggregation projection.
struct GroupRow {
    row: Vec<Value>,
    units: Vec<AggregationUnit>,
}

impl GroupRow {
    fn start(
        query_result: &dyn QueryResult,
        column_count: usize,
        aggregations: &[AggregationProjection],
    ) -> Result<Self, MergeError> {
        let row = (0..column_count)
            .map(|index| query_result.value(index))
            .collect::<Result<Vec<_>, _>>()?;
        let units = aggregations
            .iter()
            .map(AggregationUnit::for_projection)
            .collect();
        Ok(Self { row, units })
    }

    /// A group with no input rows: COUNT reads 0, everything else NULL.
    fn empty(column_count: usize, aggregations: &[AggregationProjection]) -> Self {
        Self {
            row: vec![Value::Null; column_count],
            units: aggregations
                .iter()
                .map(AggregationUnit::for_projection)
                .collect(),
        }
    }

    fn aggregate(
        &mut self,
        query_result: &dyn QueryResult,
        aggregations: &[AggregationProjection],
    ) -> Result<(), MergeError> {
        self.units
            .iter_mut()
            .zip(aggregations)
            .try_for_each(|(unit, projection)| {
                unit.merge(projection, |index| query_result.value(index))
            })
    }

    fn finish(mut self, aggregations: &[AggregationProjection]) -> Vec<Value> {
        for (unit, projection) in self.units.iter().zip(aggregations) {
            unit.apply(projection, &mut self.row);
        }
        self.row
    }
}
