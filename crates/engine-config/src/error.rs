use thiserror::Error;

/// Errors raised while loading or checking middleware configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The same table is configured more than once for one rule.
    #[error("Duplicate {rule_type} rule tables {tables:?} in database `{database_name}`")]
    DuplicateRule {
        rule_type: String,
        database_name: String,
        tables: Vec<String>,
    },

    /// A column references an algorithm name that is not configured.
    #[error(
        "{rule_type} algorithm `{algorithm}` not found on column `{table}.{column}` in database `{database_name}`"
    )]
    AlgorithmNotFoundOnColumn {
        rule_type: String,
        algorithm: String,
        database_name: String,
        table: String,
        column: String,
    },

    /// The algorithm type is not one of the known implementations.
    #[error("Unknown algorithm type: {0}")]
    UnknownAlgorithmType(String),

    /// A required property is missing or malformed.
    #[error("Invalid property `{key}` for algorithm `{algorithm_type}`: {reason}")]
    InvalidAlgorithmProperty {
        algorithm_type: String,
        key: String,
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
