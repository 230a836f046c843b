use engine_config::error::ConfigurationError;
use merge_engine::error::MergeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read the fixture file: {0}")]
    FixtureRead(#[from] std::io::Error),

    #[error("Failed to parse the fixture file as JSON: {0}")]
    FixtureParse(#[from] serde_json::Error),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("Failed to merge shard results: {0}")]
    Merge(#[from] MergeError),

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),
}
