//! Heapgraph Studio CLI
//!
//! Retained-size aggregation for heap snapshot object graphs.
//! Writes JSON reports and answers filtered/sorted queries over them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use heapgraph_studio::commands::{
    display_schema, display_version, execute_analyze, execute_query, validate_args,
    AnalyzeArgs, QueryArgs, View,
};
use heapgraph_studio::output::{format_bytes, read_report};

/// Heapgraph Studio - retained-size aggregation for heap graphs
#[derive(Parser, Debug)]
#[command(name = "heapgraph")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a graph and write an aggregate report
    Analyze {
        /// Path to the JSON object graph
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "artifacts/report.json")]
        output: PathBuf,

        /// Engine configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of prototype buckets to keep in the report
        #[arg(long, default_value = "50")]
        top: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Run a filtered, sorted, limited query over one view
    Query {
        /// Path to the JSON object graph
        #[arg(short, long)]
        input: PathBuf,

        /// Collection to query
        #[arg(long, value_enum, default_value = "types")]
        view: View,

        /// Equality filter, `field=value`
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort key, `field` or `field:asc|desc`
        #[arg(long)]
        order_by: Option<String>,

        /// Keep at most N results
        #[arg(long, allow_negative_numbers = true)]
        first: Option<i64>,

        /// Engine configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full report structure
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            config,
            top,
            summary,
        } => {
            let args = AnalyzeArgs {
                input,
                output: Some(output),
                config,
                top_prototypes: top,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Query {
            input,
            view,
            filter,
            order_by,
            first,
            config,
        } => {
            let args = QueryArgs {
                input,
                config,
                view,
                filter,
                order_by,
                first,
            };

            println!("{}", execute_query(args)?);
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a report JSON file
///
/// **Private** - internal command implementation
fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Nodes: {}", report.node_count);
    println!("  Total Shallow Size: {}", format_bytes(report.total_shallow_size));
    println!("  Type Buckets: {}", report.types.len());
    println!("  Prototype Buckets: {}", report.prototypes.len());

    Ok(())
}
