use crate::error::CliError;
use merge_engine::{cursor::QueryResult, error::MergeError};
use model::core::value::Value;
use serde::Serialize;

/// Every row a merged cursor produced, with the strategy that produced them.
#[derive(Debug, Serialize)]
pub struct MergeReport {
    pub strategy: String,
    pub column_count: usize,
    pub rows: Vec<Vec<Value>>,
}

impl MergeReport {
    pub async fn collect<R: QueryResult + ?Sized>(
        strategy: String,
        result: &mut R,
    ) -> Result<Self, MergeError> {
        let column_count = result.column_count();
        let mut rows = Vec::new();
        while result.next().await? {
            let row = (0..column_count)
                .map(|index| result.value(index))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        result.close().await?;

        Ok(Self {
            strategy,
            column_count,
            rows,
        })
    }
}

pub fn print_json(report: &MergeReport) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(report).map_err(CliError::JsonSerialize)?;
    println!("{json}");
    Ok(())
}

pub fn print_table(report: &MergeReport) {
    println!("Strategy: {}", report.strategy);
    println!("-----------------------------");
    for row in &report.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|value| format!("{:<16}", value.to_string()))
            .collect();
        println!("{}", cells.join(" ").trim_end());
    }
    println!("-----------------------------");
    println!("{} rows", report.rows.len());
}
