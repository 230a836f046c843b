use model::{
    core::{database_type::DatabaseType, value::Value},
    statement::order_by::{NullsOrder, OrderByItem, OrderDirection},
};
use std::cmp::Ordering;

/// Orders two values under one ORDER BY item.
///
/// NULL placement is absolute (NULLS FIRST stays first under DESC); when the
/// item does not specify it, the database's default for the direction applies.
/// Values with no defined comparison fall back to a stable per-type rank so
/// the ordering stays total.
pub fn compare_values(
    left: &Value,
    right: &Value,
    item: &OrderByItem,
    database_type: DatabaseType,
) -> Ordering {
    let nulls = item
        .nulls
        .unwrap_or_else(|| database_type.default_nulls_order(item.direction));

    match (left.is_null(), right.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => {
            return match nulls {
                NullsOrder::First => Ordering::Less,
                NullsOrder::Last => Ordering::Greater,
            };
        }
        (false, true) => {
            return match nulls {
                NullsOrder::First => Ordering::Greater,
                NullsOrder::Last => Ordering::Less,
            };
        }
        (false, false) => {}
    }

    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) if !item.case_sensitive => {
            a.to_lowercase().cmp(&b.to_lowercase())
        }
        _ => left
            .compare(right)
            .unwrap_or_else(|| left.type_rank().cmp(&right.type_rank())),
    };

    match item.direction {
        OrderDirection::Asc => ordering,
        OrderDirection::Desc => ordering.reverse(),
    }
}

/// Lexicographic comparison of two key tuples, item by item.
pub fn compare_keys(
    left: &[Value],
    right: &[Value],
    items: &[OrderByItem],
    database_type: DatabaseType,
) -> Ordering {
    items
        .iter()
        .zip(left.iter().zip(right))
        .map(|(item, (l, r))| compare_values(l, r, item, database_type))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Compares two full rows on the columns the items point at.
pub fn compare_rows(
    left: &[Value],
    right: &[Value],
    items: &[OrderByItem],
    database_type: DatabaseType,
) -> Ordering {
    items
        .iter()
        .map(|item| {
            let l = left.get(item.index).unwrap_or(&Value::Null);
            let r = right.get(item.index).unwrap_or(&Value::Null);
            compare_values(l, r, item, database_type)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
