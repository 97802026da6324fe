//! Generate the statistics summary and chart images from the record store.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin wiki-report -- --output-prefix web/static/plots
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use wiki_history::charts::Visualizer;
use wiki_history::outbound::persistence::DEFAULT_DATABASE_PATH;
use wiki_history::reporting::{DEFAULT_OUTPUT_PREFIX, ReportRequest, ReportSummary, run_report};

/// `wiki-report` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wiki-report",
    about = "Print snapshot statistics and write content and views charts",
    version
)]
struct CliArgs {
    /// SQLite database holding the `wiki_history` table.
    #[arg(long, value_name = "path", default_value = DEFAULT_DATABASE_PATH)]
    database: String,
    /// Output prefix; charts are written to `{prefix}_1.png` and `{prefix}_2.png`.
    #[arg(long = "output-prefix", value_name = "prefix", default_value = DEFAULT_OUTPUT_PREFIX)]
    output_prefix: PathBuf,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> io::Result<()> {
    let request = ReportRequest {
        database_path: args.database,
        output_prefix: args.output_prefix,
    };
    let summary = run_report(&request, Visualizer::default())
        .await
        .map_err(io::Error::other)?;

    match summary {
        ReportSummary::Empty => println!("The database is empty."),
        ReportSummary::Written { stats, files } => {
            println!("Basic statistics:");
            println!("Total entries: {}", stats.total_entries);
            println!("Average article size: {} characters", stats.average_char_count);
            println!("Total views: {}", stats.total_views);
            println!("Last update: {}", stats.last_update);
            for path in files {
                println!("Saved {}", path.display());
            }
        }
    }
    Ok(())
}
