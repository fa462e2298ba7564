use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Alpha Vantage quote endpoint
/// <https://www.alphavantage.co/documentation/#latestprice>
const QUOTE_URL: &str = "https://www.alphavantage.co/query";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
}

/// Latest traded price for `symbol`.
pub fn fetch_latest_price(symbol: &str, api_key: &str) -> Result<Decimal, Box<dyn std::error::Error>> {
    tracing::info!(symbol, "fetching latest quote");
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let response: QuoteResponse = client
        .get(QUOTE_URL)
        .query(&[
            ("function", "GLOBAL_QUOTE"),
            ("symbol", symbol),
            ("apikey", api_key),
        ])
        .send()?
        .error_for_status()?
        .json()?;
    parse_quote(symbol, response)
}

fn parse_quote(symbol: &str, response: QuoteResponse) -> Result<Decimal, Box<dyn std::error::Error>> {
    if let Some(message) = response
        .error_message
        .or(response.note)
        .or(response.information)
    {
        return Err(format!("Quote lookup for {symbol} failed: {message}").into());
    }

    let raw = response
        .global_quote
        .and_then(|q| q.price)
        .ok_or_else(|| format!("No quote returned for symbol '{symbol}'"))?;
    let price = Decimal::from_str(raw.trim())
        .map_err(|e| format!("Unparseable price '{raw}' for {symbol}: {e}"))?;
    tracing::debug!(symbol, %price, "quote received");
    Ok(price)
}
