use anyhow::Result;
use banks_etl::config::Config;
use banks_etl::db::BankStore;
use banks_etl::{logging, pipeline};
use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser)]
#[command(name = "banks_etl")]
#[command(about = "Largest-banks market cap ETL: scrape, convert currencies, load CSV + SQLite")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults apply when absent)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full extract-transform-load pass
    Run,
    /// Execute an ad-hoc read query against the store
    Query {
        /// SQL statement, e.g. "SELECT Name FROM Largest_banks LIMIT 5"
        sql: String,
    },
}

fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => {
            if let Err(e) = pipeline::run(&config) {
                error!("ETL run failed: {}", e);
                return Err(e.into());
            }
            println!("ETL run complete");
        }
        Commands::Query { sql } => {
            let store = BankStore::open(&config.db_path)?;
            let output = store.query(&sql)?;
            println!("{sql}");
            println!("{output}");
            store.close()?;
        }
    }
    Ok(())
}
