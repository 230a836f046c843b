#[cfg(test)]
mod tests {
    use crate::{
        named_shard,
        utils::{CountingQueryResult, FailingQueryResult, ShardUnavailable, drain},
    };
    use bigdecimal::BigDecimal;
    use merge_engine::{cursor::QueryResult, error::MergeError, merger::ShardingResultMerger};
    use model::{
        core::{database_type::DatabaseType, value::Value},
        pagination::window::PaginationWindow,
        statement::{
            aggregation::AggregationProjection, context::MergeContext, order_by::OrderByItem,
        },
    };
    use std::{error::Error, str::FromStr};
    use tracing_test::traced_test;

    fn merger() -> ShardingResultMerger {
        ShardingResultMerger::new(DatabaseType::MySql)
    }

    fn failed_shard(err: &MergeError) -> Option<usize> {
        err.source()?
            .downcast_ref::<ShardUnavailable>()
            .map(|unavailable| unavailable.0)
    }

    // Scenario: the first shard fails after one row under concatenation.
    // Expected Outcome: the shard error reaches the caller unchanged and every
    // shard is released.
    #[traced_test]
    #[tokio::test]
    async fn tc01() {
        let (failing, failing_probe) = FailingQueryResult::ints(0, &[1]);
        let (healthy, healthy_probe) = CountingQueryResult::ints(&[2, 3]);
        let mut result = merger()
            .merge(vec![failing, healthy], &MergeContext::new(1))
            .await
            .unwrap();

        assert!(result.next().await.unwrap());
        let err = result.next().await.unwrap_err();

        assert!(matches!(err, MergeError::SourceRead(_)));
        assert_eq!(failed_shard(&err), Some(0));
        assert!(failing_probe.closed());
        assert!(healthy_probe.closed());
    }

    // Scenario: a shard fails mid-stream during an ordered merge.
    // Expected Outcome: the error propagates and all shards are released.
    #[traced_test]
    #[tokio::test]
    async fn tc02() {
        let (healthy, healthy_probe) = CountingQueryResult::ints(&[2, 3]);
        let (failing, failing_probe) = FailingQueryResult::ints(1, &[1]);
        let context = MergeContext::new(1).with_order_by(vec![OrderByItem::asc(0)]);
        let mut result = merger()
            .merge(vec![healthy, failing], &context)
            .await
            .unwrap();

        assert!(result.next().await.unwrap());
        assert_eq!(result.value(0).unwrap(), Value::Int(1));
        let err = result.next().await.unwrap_err();

        assert_eq!(failed_shard(&err), Some(1));
        assert!(healthy_probe.closed());
        assert!(failing_probe.closed());
    }

    // Scenario: a shard fails while memory group-by drains the shards.
    // Expected Outcome: merge() itself fails and releases every shard.
    #[traced_test]
    #[tokio::test]
    async fn tc03() {
        let (healthy, healthy_probe) = CountingQueryResult::ints(&[1, 2]);
        let (failing, failing_probe) = FailingQueryResult::ints(1, &[3]);
        let context = MergeContext::new(1).with_group_by(vec![OrderByItem::asc(0)]);

        let err = merger()
            .merge(vec![healthy, failing], &context)
            .await
            .err()
            .expect("merge should fail");

        assert_eq!(failed_shard(&err), Some(1));
        assert!(healthy_probe.closed());
        assert!(failing_probe.closed());
    }

    // Scenario: a shard fails while the pagination decorator is skipping.
    // Expected Outcome: the error propagates once, then the cursor is exhausted.
    #[traced_test]
    #[tokio::test]
    async fn tc04() {
        let (failing, probe) = FailingQueryResult::ints(0, &[1, 2]);
        let context = MergeContext::new(1).with_pagination(PaginationWindow::new(5, Some(1)));
        let mut result = merger().merge(vec![failing], &context).await.unwrap();

        let err = result.next().await.unwrap_err();
        assert_eq!(failed_shard(&err), Some(0));
        assert!(probe.closed());

        assert!(!result.next().await.unwrap());
        assert!(matches!(result.value(0), Err(MergeError::NoCurrentRow)));
    }

    // Scenario: reads outside the cursor contract.
    // Expected Outcome: contract violations, never silent NULLs.
    #[traced_test]
    #[tokio::test]
    async fn tc05() {
        let context = MergeContext::new(1).with_order_by(vec![OrderByItem::asc(0)]);
        let (shard, _) = CountingQueryResult::ints(&[1]);
        let mut result = merger().merge(vec![shard], &context).await.unwrap();

        let before = result.value(0).unwrap_err();
        assert!(before.is_contract_violation());

        assert!(result.next().await.unwrap());
        let out_of_range = result.value(1).unwrap_err();
        assert!(matches!(out_of_range, MergeError::ColumnOutOfRange { index: 1, count: 1 }));

        assert!(!result.next().await.unwrap());
        assert!(result.value(0).unwrap_err().is_contract_violation());
    }

    // Scenario: GROUP BY name ORDER BY name with SUM and a derived AVG, shards
    // sorted by name, paginated past the first group.
    // Expected Outcome: stream grouping with merged SUM and AVG per group.
    #[traced_test]
    #[tokio::test]
    async fn tc06() {
        // (name, sum, avg, avg_count, avg_sum)
        let shard = |rows: &[(&str, i64, i64, i64)]| {
            let rows = rows
                .iter()
                .map(|(name, sum, count, total)| {
                    vec![
                        Value::from(*name),
                        Value::Int(*sum),
                        Value::Null,
                        Value::Int(*count),
                        Value::Int(*total),
                    ]
                })
                .collect();
            CountingQueryResult::new(5, rows).0
        };
        let context = MergeContext::new(5)
            .with_group_by(vec![OrderByItem::asc(0)])
            .with_order_by(vec![OrderByItem::asc(0)])
            .with_aggregations(vec![
                AggregationProjection::sum(1),
                AggregationProjection::avg(2, 3, 4),
            ])
            .with_pagination(PaginationWindow::offset_only(1));
        let shards = vec![
            shard(&[("apple", 1, 1, 1), ("kiwi", 4, 2, 4)]),
            shard(&[("kiwi", 6, 1, 6), ("pear", 2, 3, 2)]),
        ];

        let mut result = merger().merge(shards, &context).await.unwrap();
        assert_eq!(result.kind(), "limit(group_by_stream)");

        let rows = drain(&mut result).await;
        let decimal = |text: &str| Value::Decimal(BigDecimal::from_str(text).unwrap());
        assert_eq!(
            rows,
            vec![
                vec![
                    Value::from("kiwi"),
                    Value::Int(10),
                    decimal("3.3333"),
                    Value::Int(3),
                    Value::Int(10),
                ],
                vec![
                    Value::from("pear"),
                    Value::Int(2),
                    decimal("0.6667"),
                    Value::Int(3),
                    Value::Int(2),
                ],
            ]
        );
    }

    // Scenario: PostgreSQL sorts NULL as the highest value; MySQL as the lowest.
    // Expected Outcome: NULL rows come last on PostgreSQL and first on MySQL
    // for the same ascending ORDER BY.
    #[traced_test]
    #[tokio::test]
    async fn tc07() {
        let shards = || {
            vec![
                named_shard(&[("a", 1)]),
                CountingQueryResult::new(2, vec![vec![Value::Null, Value::Int(0)]]).0,
                named_shard(&[("b", 2)]),
            ]
        };
        let context = MergeContext::new(2).with_order_by(vec![OrderByItem::asc(0)]);

        let mut postgres = ShardingResultMerger::new(DatabaseType::PostgreSql)
            .merge(shards(), &context)
            .await
            .unwrap();
        let mut mysql = ShardingResultMerger::new(DatabaseType::MySql)
            .merge(shards(), &context)
            .await
            .unwrap();

        let amounts = |rows: Vec<Vec<Value>>| {
            rows.into_iter()
                .map(|row| row[1].clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            amounts(drain(&mut postgres).await),
            vec![Value::Int(1), Value::Int(2), Value::Int(0)]
        );
        assert_eq!(
            amounts(drain(&mut mysql).await),
            vec![Value::Int(0), Value::Int(1), Value::Int(2)]
        );
    }

    // Scenario: a shard fails while stream group-by reads ahead for the end of
    // the first group.
    // Expected Outcome: next() returns the shard error, every shard is
    // released and the cursor then reports no more rows.
    #[traced_test]
    #[tokio::test]
    async fn tc08() {
        let (healthy, healthy_probe) = CountingQueryResult::ints(&[1, 2]);
        let (failing, failing_probe) = FailingQueryResult::ints(1, &[1]);
        let context = MergeContext::new(1)
            .with_group_by(vec![OrderByItem::asc(0)])
            .with_order_by(vec![OrderByItem::asc(0)]);
        let mut result = merger()
            .merge(vec![healthy, failing], &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), "group_by_stream");

        let err = result.next().await.unwrap_err();

        assert!(matches!(err, MergeError::SourceRead(_)));
        assert_eq!(failed_shard(&err), Some(1));
        assert!(healthy_probe.closed());
        assert!(failing_probe.closed());
        assert!(!result.next().await.unwrap());
    }

    // Scenario: stream group-by sums a column that holds text on one shard.
    // Expected Outcome: an aggregation error, with every shard released
    // including the one whose rows were never reached.
    #[traced_test]
    #[tokio::test]
    async fn tc09() {
        let (text, text_probe) =
            CountingQueryResult::new(2, vec![vec![Value::from("a"), Value::from("x")]]);
        let (numeric, numeric_probe) =
            CountingQueryResult::new(2, vec![vec![Value::from("b"), Value::Int(3)]]);
        let context = MergeContext::new(2)
            .with_group_by(vec![OrderByItem::asc(0)])
            .with_order_by(vec![OrderByItem::asc(0)])
            .with_aggregations(vec![AggregationProjection::sum(1)]);
        let mut result = merger()
            .merge(vec![text, numeric], &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), "group_by_stream");

        let err = result.next().await.unwrap_err();

        assert!(matches!(err, MergeError::Aggregation(_)));
        assert!(text_probe.closed());
        assert!(numeric_probe.closed());
        assert!(!result.next().await.unwrap());
    }
}
