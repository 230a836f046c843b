use crate::{error::CliError, fixture::MergeFixture, output::MergeReport};
use clap::Parser;
use commands::Commands;
use engine_config::settings::load_config;
use merge_engine::merger::ShardingResultMerger;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod fixture;
mod output;

#[derive(Parser)]
#[command(
    name = "shardmerge",
    version = "0.0.1",
    about = "Merges sharded SQL result sets into one logical result"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Merge { input, json } => {
            let fixture = MergeFixture::load(&input).await?;
            info!(
                "Merging {} shards from {} ({})",
                fixture.shards.len(),
                input,
                fixture.database_type
            );

            let merger = ShardingResultMerger::new(fixture.database_type);
            let mut result = merger
                .merge(fixture.query_results(), &fixture.context)
                .await?;
            let report = MergeReport::collect(result.kind(), &mut result).await?;

            if json {
                output::print_json(&report)?;
            } else {
                output::print_table(&report);
            }
        }
        Commands::CheckConfig { config } => {
            let loaded = load_config(&config)?;
            let rules = loaded
                .mask
                .as_ref()
                .map(|mask| mask.tables.len())
                .unwrap_or_default();
            println!(
                "Configuration for database '{}' is valid ({} masked tables)",
                loaded.database_name, rules
            );
        }
    }

    Ok(())
}
