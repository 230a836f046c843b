use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the shard result sets of a fixture file and print the logical result
    Merge {
        #[arg(long, help = "Fixture file path")]
        input: String,

        #[arg(
            long,
            help = "If set, prints the merged rows as JSON instead of a table"
        )]
        json: bool,
    },
    /// Load a middleware configuration and run its rule checkers
    CheckConfig {
        #[arg(long, help = "Config file path")]
        config: String,
    },
}
