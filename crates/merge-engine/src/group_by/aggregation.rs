use crate::error::MergeError;
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use model::{
    core::value::Value,
    statement::aggregation::{AggregationProjection, AggregationType},
};
use std::cmp::Ordering;

/// Scale of a merged AVG result.
const AVG_SCALE: i64 = 4;

/// Partial aggregate of one projection within one group.
#[derive(Debug, Clone)]
pub(crate) enum AggregationUnit {
    /// MIN / MAX
    Comparable {
        keep: Ordering,
        result: Option<Value>,
    },
    /// SUM / COUNT
    Accumulation { result: Option<Value> },
    /// AVG over the derived COUNT and SUM columns
    Average {
        count: Option<Value>,
        sum: Option<Value>,
    },
}

impl AggregationUnit {
    pub fn for_projection(projection: &AggregationProjection) -> Self {
        match projection.aggregation {
            AggregationType::Min => AggregationUnit::Comparable {
                keep: Ordering::Less,
                result: None,
            },
            AggregationType::Max => AggregationUnit::Comparable {
                keep: Ordering::Greater,
                result: None,
            },
            AggregationType::Sum | AggregationType::Count => {
                AggregationUnit::Accumulation { result: None }
            }
            AggregationType::Avg => AggregationUnit::Average {
                count: None,
                sum: None,
            },
        }
    }

    /// Folds one shard row into the partial aggregate. `read` fetches a column
    /// of that row.
    pub fn merge<F>(&mut self, projection: &AggregationProjection, read: F) -> Result<(), MergeError>
    where
        F: Fn(usize) -> Result<Value, MergeError>,
    {
        match self {
            AggregationUnit::Comparable { keep, result } => {
                let value = read(projection.index)?;
                if value.is_null() {
                    return Ok(());
                }
                let replace = match result {
                    None => true,
                    Some(current) => {
                        let ordering = value.compare(current).ok_or_else(|| {
                            MergeError::Aggregation(format!(
                                "cannot compare {} with {} in {}",
                                value.type_name(),
                                current.type_name(),
                                projection.aggregation
                            ))
                        })?;
                        ordering == *keep
                    }
                };
                if replace {
                    *result = Some(value);
                }
            }
            AggregationUnit::Accumulation { result } => {
                let value = read(projection.index)?;
                accumulate(result, value)?;
            }
            AggregationUnit::Average { count, sum } => {
                let derived = projection.derived.ok_or_else(|| {
                    MergeError::Aggregation(format!(
                        "AVG at column {} has no derived columns",
                        projection.index
                    ))
                })?;
                accumulate(count, read(derived.count_index)?)?;
                accumulate(sum, read(derived.sum_index)?)?;
            }
        }
        Ok(())
    }

    /// Writes the merged aggregate (and the derived AVG columns) into `row`.
    pub fn apply(&self, projection: &AggregationProjection, row: &mut [Value]) {
        let mut set = |index: usize, value: Value| {
            if let Some(slot) = row.get_mut(index) {
                *slot = value;
            }
        };

        match self {
            AggregationUnit::Comparable { result, .. } => {
                set(projection.index, result.clone().unwrap_or(Value::Null));
            }
            AggregationUnit::Accumulation { result } => {
                let empty = match projection.aggregation {
                    AggregationType::Count => Value::Int(0),
                    _ => Value::Null,
                };
                set(projection.index, result.clone().unwrap_or(empty));
            }
            AggregationUnit::Average { count, sum } => {
                set(projection.index, average(count.as_ref(), sum.as_ref()));
                if let Some(derived) = projection.derived {
                    set(derived.count_index, count.clone().unwrap_or(Value::Int(0)));
                    set(derived.sum_index, sum.clone().unwrap_or(Value::Null));
                }
            }
        }
    }
}

fn accumulate(result: &mut Option<Value>, value: Value) -> Result<(), MergeError> {
    if value.is_null() {
        return Ok(());
    }
    let next = match result.take() {
        None => {
            if !value.is_numeric() {
                return Err(MergeError::Aggregation(format!(
                    "cannot accumulate {} value",
                    value.type_name()
                )));
            }
            value
        }
        Some(current) => add(&current, &value)?,
    };
    *result = Some(next);
    Ok(())
}

/// Numeric addition that keeps integers exact and widens to DECIMAL on overflow.
pub(crate) fn add(left: &Value, right: &Value) -> Result<Value, MergeError> {
    use Value::*;
    let sum = match (left, right) {
        (Int(a), Int(b)) => a
            .checked_add(*b)
            .map(Int)
            .unwrap_or_else(|| Decimal(BigDecimal::from(*a) + BigDecimal::from(*b))),
        (Uint(a), Uint(b)) => a
            .checked_add(*b)
            .map(Uint)
            .unwrap_or_else(|| Decimal(BigDecimal::from(*a) + BigDecimal::from(*b))),
        (Int(_), Uint(_)) | (Uint(_), Int(_)) => {
            let total = to_i128(left) + to_i128(right);
            i64::try_from(total)
                .map(Int)
                .unwrap_or_else(|_| Decimal(BigDecimal::from(total)))
        }
        (Float(_), _) | (_, Float(_)) if left.is_numeric() && right.is_numeric() => {
            let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
                return Err(non_numeric(left, right));
            };
            Float(a + b)
        }
        _ => match (left.to_decimal(), right.to_decimal()) {
            (Some(a), Some(b)) => Decimal(a + b),
            _ => return Err(non_numeric(left, right)),
        },
    };
    Ok(sum)
}

fn to_i128(value: &Value) -> i128 {
    match value {
        Value::Int(v) => i128::from(*v),
        Value::Uint(v) => i128::from(*v),
        _ => 0,
    }
}

fn non_numeric(left: &Value, right: &Value) -> MergeError {
    MergeError::Aggregation(format!(
        "cannot add {} and {}",
        left.type_name(),
        right.type_name()
    ))
}

fn average(count: Option<&Value>, sum: Option<&Value>) -> Value {
    let (Some(count), Some(sum)) = (
        count.and_then(Value::to_decimal),
        sum.and_then(Value::to_decimal),
    ) else {
        return Value::Null;
    };
    if count.is_zero() {
        return Value::Null;
    }
    Value::Decimal((sum / count).with_scale_round(AVG_SCALE, RoundingMode::HalfUp))
}
