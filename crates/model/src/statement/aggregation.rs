use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregationType {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Display for AggregationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationType::Count => write!(f, "COUNT"),
            AggregationType::Sum => write!(f, "SUM"),
            AggregationType::Avg => write!(f, "AVG"),
            AggregationType::Min => write!(f, "MIN"),
            AggregationType::Max => write!(f, "MAX"),
        }
    }
}

/// Derived projections the rewriter appends behind an AVG so shards return
/// the parts of the average instead of a local average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerivedAvgColumns {
    pub count_index: usize,
    pub sum_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregationProjection {
    pub aggregation: AggregationType,
    pub index: usize,
    #[serde(default)]
    pub derived: Option<DerivedAvgColumns>,
}

impl AggregationProjection {
    pub fn new(aggregation: AggregationType, index: usize) -> Self {
        Self {
            aggregation,
            index,
            derived: None,
        }
    }

    pub fn count(index: usize) -> Self {
        Self::new(AggregationType::Count, index)
    }

    pub fn sum(index: usize) -> Self {
        Self::new(AggregationType::Sum, index)
    }

    pub fn min(index: usize) -> Self {
        Self::new(AggregationType::Min, index)
    }

    pub fn max(index: usize) -> Self {
        Self::new(AggregationType::Max, index)
    }

    pub fn avg(index: usize, count_index: usize, sum_index: usize) -> Self {
        Self {
            aggregation: AggregationType::Avg,
            index,
            derived: Some(DerivedAvgColumns {
                count_index,
                sum_index,
            }),
        }
    }

    /// Every column index this projection reads or writes.
    pub fn indexes(&self) -> Vec<usize> {
        let mut indexes = vec![self.index];
        if let Some(derived) = &self.derived {
            indexes.push(derived.count_index);
            indexes.push(derived.sum_index);
        }
        indexes
    }
}
