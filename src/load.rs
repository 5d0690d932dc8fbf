use crate::error::{EtlError, Result};
use crate::types::EnrichedBankRecord;
use std::path::Path;
use tracing::info;

/// Serialize the enriched table to a CSV file, replacing any existing file at
/// `path`. The serde field renames on `EnrichedBankRecord` produce the fixed
/// header `Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion`.
pub fn write_csv(records: &[EnrichedBankRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| EtlError::FileWrite(format!("failed to create '{}': {e}", path.display())))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| EtlError::FileWrite(format!("failed to write row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| EtlError::FileWrite(format!("failed to flush '{}': {e}", path.display())))?;

    info!("Saved {} rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TABLE_COLUMNS;

    fn sample() -> Vec<EnrichedBankRecord> {
        vec![
            EnrichedBankRecord {
                name: "Bank A".to_string(),
                mc_usd_billion: 100.0,
                mc_gbp_billion: 80.0,
                mc_eur_billion: 93.0,
                mc_inr_billion: 8200.0,
            },
            EnrichedBankRecord {
                name: "Bank B".to_string(),
                mc_usd_billion: 50.5,
                mc_gbp_billion: 40.4,
                mc_eur_billion: 46.97,
                mc_inr_billion: 4141.0,
            },
        ]
    }

    #[test]
    fn round_trips_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.csv");
        let records = sample();
        write_csv(&records, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(header, TABLE_COLUMNS);

        let read_back: Vec<EnrichedBankRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(read_back, records);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.csv");
        write_csv(&sample(), &path).unwrap();
        write_csv(&sample()[..1], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.deserialize::<EnrichedBankRecord>().count(), 1);
    }
}
