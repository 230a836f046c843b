use crate::statement::order_by::{NullsOrder, OrderDirection};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Backend database family the shards run on. Decides how NULLs sort when a
/// statement does not say so explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    MySql,
    PostgreSql,
    Oracle,
    SqlServer,
    H2,
}

impl DatabaseType {
    /// Whether NULL is treated as the lowest value of any type.
    pub fn nulls_are_lowest(&self) -> bool {
        match self {
            DatabaseType::MySql | DatabaseType::SqlServer | DatabaseType::H2 => true,
            DatabaseType::PostgreSql | DatabaseType::Oracle => false,
        }
    }

    /// Default NULL placement for a sort direction when no NULLS FIRST/LAST is given.
    pub fn default_nulls_order(&self, direction: OrderDirection) -> NullsOrder {
        match (self.nulls_are_lowest(), direction) {
            (true, OrderDirection::Asc) | (false, OrderDirection::Desc) => NullsOrder::First,
            (true, OrderDirection::Desc) | (false, OrderDirection::Asc) => NullsOrder::Last,
        }
    }
}

impl FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(DatabaseType::MySql),
            "postgresql" | "postgres" | "pg" => Ok(DatabaseType::PostgreSql),
            "oracle" => Ok(DatabaseType::Oracle),
            "sqlserver" | "mssql" => Ok(DatabaseType::SqlServer),
            "h2" => Ok(DatabaseType::H2),
            other => Err(format!("Unknown database type: {other}")),
        }
    }
}

impl Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseType::MySql => write!(f, "MySQL"),
            DatabaseType::PostgreSql => write!(f, "PostgreSQL"),
            DatabaseType::Oracle => write!(f, "Oracle"),
            DatabaseType::SqlServer => write!(f, "SQLServer"),
            DatabaseType::H2 => write!(f, "H2"),
        }
    }
}
