use crate::{
    pagination::window::PaginationWindow,
    statement::{
        aggregation::{AggregationProjection, AggregationType},
        order_by::OrderByItem,
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("{clause} item references column {index}, but only {column_count} columns are projected")]
    ColumnOutOfRange {
        clause: &'static str,
        index: usize,
        column_count: usize,
    },

    #[error("AVG at column {0} has no derived COUNT/SUM columns")]
    MissingDerivedColumns(usize),

    #[error("Derived columns are only allowed on AVG, found on {aggregation} at column {index}")]
    UnexpectedDerivedColumns {
        aggregation: AggregationType,
        index: usize,
    },

    #[error("Column {0} is aggregated more than once")]
    DuplicateAggregation(usize),
}

/// Merge-relevant description of a SELECT, produced by statement analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeContext {
    /// Number of projected columns every shard result set carries.
    pub column_count: usize,
    #[serde(default)]
    pub order_by: Vec<OrderByItem>,
    #[serde(default)]
    pub group_by: Vec<OrderByItem>,
    #[serde(default)]
    pub aggregations: Vec<AggregationProjection>,
    #[serde(default)]
    pub pagination: Option<PaginationWindow>,
}

impl MergeContext {
    pub fn new(column_count: usize) -> Self {
        Self {
            column_count,
            ..Default::default()
        }
    }

    pub fn with_order_by(mut self, items: Vec<OrderByItem>) -> Self {
        self.order_by = items;
        self
    }

    pub fn with_group_by(mut self, items: Vec<OrderByItem>) -> Self {
        self.group_by = items;
        self
    }

    pub fn with_aggregations(mut self, aggregations: Vec<AggregationProjection>) -> Self {
        self.aggregations = aggregations;
        self
    }

    pub fn with_pagination(mut self, window: PaginationWindow) -> Self {
        self.pagination = Some(window);
        self
    }

    pub fn has_group_by(&self) -> bool {
        !self.group_by.is_empty()
    }

    pub fn has_order_by(&self) -> bool {
        !self.order_by.is_empty()
    }

    pub fn has_aggregations(&self) -> bool {
        !self.aggregations.is_empty()
    }

    /// Rows must be grouped when there is a GROUP BY or a bare aggregate
    /// (`SELECT COUNT(*) ...`), which forms one global group.
    pub fn requires_grouping(&self) -> bool {
        self.has_group_by() || self.has_aggregations()
    }

    /// ORDER BY lists exactly the GROUP BY items, so shard rows arrive sorted
    /// by the group key and groups can be merged as a stream.
    pub fn is_same_group_by_and_order_by(&self) -> bool {
        self.has_group_by()
            && self.group_by.len() == self.order_by.len()
            && self
                .group_by
                .iter()
                .zip(&self.order_by)
                .all(|(group, order)| group.same_sort_key(order))
    }

    pub fn validate(&self) -> Result<(), ContextError> {
        self.check_items("ORDER BY", &self.order_by)?;
        self.check_items("GROUP BY", &self.group_by)?;

        let mut seen = Vec::with_capacity(self.aggregations.len());
        for projection in &self.aggregations {
            match (projection.aggregation, &projection.derived) {
                (AggregationType::Avg, None) => {
                    return Err(ContextError::MissingDerivedColumns(projection.index));
                }
                (aggregation, Some(_)) if aggregation != AggregationType::Avg => {
                    return Err(ContextError::UnexpectedDerivedColumns {
                        aggregation,
                        index: projection.index,
                    });
                }
                _ => {}
            }

            for index in projection.indexes() {
                self.check_index("Aggregation", index)?;
            }

            if seen.contains(&projection.index) {
                return Err(ContextError::DuplicateAggregation(projection.index));
            }
            seen.push(projection.index);
        }

        Ok(())
    }

    fn check_items(&self, clause: &'static str, items: &[OrderByItem]) -> Result<(), ContextError> {
        items
            .iter()
            .try_for_each(|item| self.check_index(clause, item.index))
    }

    fn check_index(&self, clause: &'static str, index: usize) -> Result<(), ContextError> {
        if index >= self.column_count {
            return Err(ContextError::ColumnOutOfRange {
                clause,
                index,
                column_count: self.column_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_group_by_and_order_by() {
        let ctx = MergeContext::new(3)
            .with_group_by(vec![OrderByItem::asc(0), OrderByItem::desc(1)])
            .with_order_by(vec![OrderByItem::asc(0), OrderByItem::desc(1)]);
        assert!(ctx.is_same_group_by_and_order_by());

        let ctx = ctx.with_order_by(vec![OrderByItem::asc(0), OrderByItem::asc(1)]);
        assert!(!ctx.is_same_group_by_and_order_by());

        let ctx = MergeContext::new(3).with_group_by(vec![OrderByItem::asc(0)]);
        assert!(!ctx.is_same_group_by_and_order_by());
    }

    #[test]
    fn test_collation_must_match_for_same_group_by_and_order_by() {
        let ctx = MergeContext::new(2)
            .with_group_by(vec![OrderByItem::asc(0).case_insensitive()])
            .with_order_by(vec![OrderByItem::asc(0)]);
        assert!(!ctx.is_same_group_by_and_order_by());

        let ctx = ctx.with_order_by(vec![OrderByItem::asc(0).case_insensitive()]);
        assert!(ctx.is_same_group_by_and_order_by());
    }

    #[test]
    fn test_validate_rejects_out_of_range_items() {
        let ctx = MergeContext::new(2).with_order_by(vec![OrderByItem::asc(2)]);
        assert_eq!(
            ctx.validate(),
            Err(ContextError::ColumnOutOfRange {
                clause: "ORDER BY",
                index: 2,
                column_count: 2,
            })
        );
    }

    #[test]
    fn test_validate_avg_requires_derived_columns() {
        let ctx = MergeContext::new(4).with_aggregations(vec![AggregationProjection::new(
            AggregationType::Avg,
            1,
        )]);
        assert_eq!(ctx.validate(), Err(ContextError::MissingDerivedColumns(1)));

        let ctx = MergeContext::new(4).with_aggregations(vec![AggregationProjection::avg(1, 2, 3)]);
        assert!(ctx.validate().is_ok());

        let ctx = MergeContext::new(3).with_aggregations(vec![AggregationProjection::avg(1, 2, 3)]);
        assert!(matches!(
            ctx.validate(),
            Err(ContextError::ColumnOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let ctx: MergeContext = serde_json::from_str(
            r#"{
                "column_count": 2,
                "order_by": [{ "index": 1, "direction": "desc" }],
                "pagination": { "offset": 2 }
            }"#,
        )
        .unwrap();

        assert_eq!(ctx.order_by, vec![OrderByItem::desc(1)]);
        assert!(ctx.group_by.is_empty());
        assert_eq!(ctx.pagination, Some(PaginationWindow::offset_only(2)));
    }
}
