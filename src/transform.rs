use crate::error::{EtlError, Result};
use crate::types::{BankRecord, EnrichedBankRecord};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// The derived columns, in their fixed order.
const TARGET_CURRENCIES: [&str; 3] = ["GBP", "EUR", "INR"];

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// Currency code -> multiplier against USD, loaded whole from a CSV with
/// header `Currency,Rate`.
#[derive(Debug, Clone)]
pub struct ExchangeRates {
    rates: HashMap<String, f64>,
}

impl ExchangeRates {
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            EtlError::RateTable(format!("failed to open '{}': {e}", path.display()))
        })?;

        let mut rates = HashMap::new();
        for row in reader.deserialize() {
            let row: RateRow = row.map_err(|e| {
                EtlError::RateTable(format!("bad row in '{}': {e}", path.display()))
            })?;
            rates.insert(row.currency, row.rate);
        }
        info!("Loaded {} exchange rates from {}", rates.len(), path.display());
        Ok(Self { rates })
    }

    pub fn from_map(rates: HashMap<String, f64>) -> Self {
        Self { rates }
    }

    fn get(&self, currency: &str) -> Result<f64> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| EtlError::MissingRate(currency.to_string()))
    }
}

/// Round to 2 decimal places with ties going to the even digit, matching the
/// rounding the derived columns were originally computed with.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Append the GBP/EUR/INR market-cap columns to every record. Pure: the input
/// slice is left untouched and a fresh table comes back, in the same order.
pub fn transform(records: &[BankRecord], rates: &ExchangeRates) -> Result<Vec<EnrichedBankRecord>> {
    // fail before producing any output if a needed rate is absent
    let [gbp, eur, inr] = TARGET_CURRENCIES.map(|code| rates.get(code));
    let (gbp, eur, inr) = (gbp?, eur?, inr?);

    let enriched = records
        .iter()
        .map(|record| EnrichedBankRecord {
            name: record.name.clone(),
            mc_usd_billion: record.mc_usd_billion,
            mc_gbp_billion: round2(record.mc_usd_billion * gbp),
            mc_eur_billion: round2(record.mc_usd_billion * eur),
            mc_inr_billion: round2(record.mc_usd_billion * inr),
        })
        .collect();
    Ok(enriched)
}
