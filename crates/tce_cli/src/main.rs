mod commands;
mod output;
mod table_io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tce")]
#[command(version, about = "Tabular Contracts Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a contract's structural consistency without touching data
    Check {
        /// Path to the contract file (YAML or TOML)
        contract: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate a dataset against a contract
    Validate {
        /// Path to the contract file (YAML or TOML)
        contract: String,

        /// Path to the dataset (CSV or JSON)
        data: String,

        /// Path to the foreign key reference dataset (CSV or JSON)
        #[arg(long)]
        fk_data: Option<String>,

        /// CSV delimiter override
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Apply the contract's remediation pipeline to a dataset
    Remediate {
        /// Path to the contract file (YAML or TOML)
        contract: String,

        /// Path to the dataset (CSV or JSON)
        data: String,

        /// Write the cleaned dataset to this CSV path
        #[arg(short, long)]
        output: Option<String>,

        /// Validate afterwards and apply failure handling policies
        /// (drop/quarantine rows, null failing cells)
        #[arg(long)]
        handle_failures: bool,

        /// CSV delimiter override
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Check { contract, format } => commands::check::execute(&contract, &format),

        Commands::Validate {
            contract,
            data,
            fk_data,
            delimiter,
            format,
        } => commands::validate::execute(&contract, &data, fk_data.as_deref(), delimiter, &format),

        Commands::Remediate {
            contract,
            data,
            output,
            handle_failures,
            delimiter,
            format,
        } => commands::remediate::execute(
            &contract,
            &data,
            output.as_deref(),
            handle_failures,
            delimiter,
            &format,
        ),
    }
}
