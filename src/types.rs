use serde::{Deserialize, Serialize};

/// Column headers for the CSV file and the store table, in their fixed order.
pub const TABLE_COLUMNS: [&str; 5] = [
    "Name",
    "MC_USD_Billion",
    "MC_GBP_Billion",
    "MC_EUR_Billion",
    "MC_INR_Billion",
];

/// One bank as extracted from the source page: rank order is implicit in the
/// position within the extracted vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRecord {
    pub name: String,
    pub mc_usd_billion: f64,
}

/// A bank record with the derived currency columns appended. Field order here
/// drives the CSV column order, so it must match `TABLE_COLUMNS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBankRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MC_USD_Billion")]
    pub mc_usd_billion: f64,
    #[serde(rename = "MC_GBP_Billion")]
    pub mc_gbp_billion: f64,
    #[serde(rename = "MC_EUR_Billion")]
    pub mc_eur_billion: f64,
    #[serde(rename = "MC_INR_Billion")]
    pub mc_inr_billion: f64,
}
