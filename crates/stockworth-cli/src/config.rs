use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockworth_core::grants::GrantBook;
use stockworth_core::Granularity;

/// On-disk configuration: the ticker, optional quote settings, the walk-away
/// targets, and every RSU / option vesting event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockworthConfig {
    #[serde(default)]
    pub symbol: Option<String>,
    /// Alpha Vantage API key; falls back to `ALPHAVANTAGE_API_KEY`
    #[serde(default, skip_serializing)]
    pub apikey: Option<String>,
    /// Fixed share price; skips the live quote when present
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub granularity: Option<Granularity>,
    #[serde(default)]
    pub thresholds: Vec<Decimal>,
    #[serde(flatten)]
    pub grants: GrantBook,
}
