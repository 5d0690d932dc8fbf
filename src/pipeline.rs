use crate::config::Config;
use crate::db::BankStore;
use crate::error::Result;
use crate::extract::{extract, EXPECTED_ROW_CELLS};
use crate::load::write_csv;
use crate::logging::RunLog;
use crate::transform::{transform, ExchangeRates};
use reqwest::blocking::Client;
use tracing::{info, instrument};

/// Run the full pipeline once: extract, transform, write CSV, load the store,
/// report the fixed queries. Strictly sequential; the first failing stage
/// aborts the run, so the milestone log shows exactly how far it got and no
/// sink is written after a failed transform.
#[instrument(skip(config))]
pub fn run(config: &Config) -> Result<()> {
    let run_log = RunLog::new(&config.log_path);
    run_log.record("Preliminaries complete. Initiating ETL process")?;

    let client = Client::new();
    let records = extract(&client, &config.source_url, EXPECTED_ROW_CELLS)?;
    run_log.record("Data extraction complete. Initiating Transformation process")?;

    let rates = ExchangeRates::from_csv_path(&config.exchange_rate_path)?;
    let enriched = transform(&records, &rates)?;
    run_log.record("Data transformation complete. Initiating Loading process")?;

    write_csv(&enriched, &config.output_csv_path)?;
    run_log.record("Data saved to CSV file")?;

    let mut store = BankStore::open(&config.db_path)?;
    run_log.record("SQL Connection initiated")?;

    store.load_table(&config.table_name, &enriched)?;
    run_log.record("Data loaded to Database as a table, Executing queries")?;

    for sql in report_queries(&config.table_name) {
        println!("{sql}");
        let output = store.query(&sql)?;
        println!("{output}");
    }
    run_log.record("Process Complete")?;

    store.close()?;
    run_log.record("Server Connection closed")?;

    info!("ETL run finished: {} banks loaded", enriched.len());
    Ok(())
}

/// The three read queries issued after every load.
pub fn report_queries(table_name: &str) -> [String; 3] {
    [
        format!("SELECT * FROM {table_name}"),
        format!("SELECT AVG(MC_GBP_Billion) FROM {table_name}"),
        format!("SELECT Name FROM {table_name} LIMIT 5"),
    ]
}
