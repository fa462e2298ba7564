use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use stockworth_core::report::{compute_equity_report, EquityReport, EquityReportInput};
use stockworth_core::{ComputationOutput, Granularity};

use crate::config::StockworthConfig;
use crate::input;
use crate::quote;

/// Flags shared by every equity command
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to a JSON or YAML config file (default: ./config.json if present, else piped stdin)
    #[arg(long, short = 'f', alias = "file")]
    pub input: Option<String>,

    /// Share price to value grants at (skips the live quote)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Flat tax haircut applied to every grant (e.g. 0.35 for 35%)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Alpha Vantage API key (overrides config `apikey` and ALPHAVANTAGE_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Monthly,
    Yearly,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Monthly => Granularity::Monthly,
            GranularityArg::Yearly => Granularity::Yearly,
        }
    }
}

/// Arguments for the full report
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Vesting calendar bucket size
    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,

    /// Threshold amount; repeat to override the config's list
    #[arg(long = "amount", allow_hyphen_values = true)]
    pub amounts: Vec<Decimal>,
}

/// Arguments for the vesting calendar
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Vesting calendar bucket size
    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,
}

/// Arguments for threshold resolution
#[derive(Args, Debug)]
pub struct ThresholdArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Threshold amount; repeat to override the config's list
    #[arg(long = "amount", allow_hyphen_values = true)]
    pub amounts: Vec<Decimal>,
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = input::load_config(args.common.input.as_deref())?;
    let thresholds = pick_thresholds(args.amounts, &config);
    let report_input = build_input(&args.common, &config, args.granularity, thresholds)?;
    let output = run(&report_input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_value(args: CommonArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = input::load_config(args.input.as_deref())?;
    let report_input = build_input(&args, &config, None, Vec::new())?;
    let output = run(&report_input)?;
    narrow(output, &["schedule", "thresholds", "granularity"])
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = input::load_config(args.common.input.as_deref())?;
    let report_input = build_input(&args.common, &config, args.granularity, Vec::new())?;
    let output = run(&report_input)?;
    narrow(output, &["thresholds"])
}

pub fn run_thresholds(args: ThresholdArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = input::load_config(args.common.input.as_deref())?;
    let thresholds = pick_thresholds(args.amounts, &config);
    if thresholds.is_empty() {
        return Err("no threshold amounts: pass --amount or add \"thresholds\" to the config".into());
    }
    let report_input = build_input(&args.common, &config, None, thresholds)?;
    let output = run(&report_input)?;
    narrow(output, &["schedule", "granularity"])
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn run(
    report_input: &EquityReportInput,
) -> Result<ComputationOutput<EquityReport>, Box<dyn std::error::Error>> {
    let output = compute_equity_report(report_input)?;
    tracing::debug!(
        units = output.result.unit_count,
        total = %output.result.total_value,
        unvested = %output.result.unvested_value,
        elapsed_us = output.metadata.computation_time_us,
        "equity report computed"
    );
    for warning in &output.warnings {
        tracing::warn!("{warning}");
    }
    Ok(output)
}

fn pick_thresholds(amounts: Vec<Decimal>, config: &StockworthConfig) -> Vec<Decimal> {
    if amounts.is_empty() {
        config.thresholds.clone()
    } else {
        amounts
    }
}

fn build_input(
    args: &CommonArgs,
    config: &StockworthConfig,
    granularity: Option<GranularityArg>,
    thresholds: Vec<Decimal>,
) -> Result<EquityReportInput, Box<dyn std::error::Error>> {
    let current_price = resolve_price(args, config)?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let granularity = granularity
        .map(Granularity::from)
        .or(config.granularity)
        .unwrap_or_default();
    tracing::debug!(
        %as_of,
        %granularity,
        grants = config.grants.len(),
        "building report input"
    );

    Ok(EquityReportInput {
        symbol: config.symbol.clone(),
        current_price,
        as_of,
        tax_rate: args.tax_rate.or(config.tax_rate),
        granularity,
        thresholds,
        grants: config.grants.clone(),
    })
}

/// `--price`, then the config's fixed price, then a live quote.
fn resolve_price(
    args: &CommonArgs,
    config: &StockworthConfig,
) -> Result<Decimal, Box<dyn std::error::Error>> {
    if let Some(price) = args.price {
        tracing::debug!(%price, "using price from command line");
        return Ok(price);
    }
    if let Some(price) = config.price {
        tracing::debug!(%price, "using price from config");
        return Ok(price);
    }

    let symbol = config
        .symbol
        .as_deref()
        .ok_or("config has no \"symbol\" to look up; set one or pass --price")?;
    let api_key = resolve_api_key(args.api_key.clone(), config.apikey.clone())?;
    quote::fetch_latest_price(symbol, &api_key)
}

/// `--api-key`, then the config's `apikey`, then the environment.
fn resolve_api_key(
    flag: Option<String>,
    configured: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    flag.or(configured)
        .or_else(|| std::env::var(quote::API_KEY_ENV).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            format!(
                "Could not find an API key: set \"apikey\" in the config, {} or pass --price",
                quote::API_KEY_ENV
            )
            .into()
        })
}

/// Serialize the report and drop the result sections a command does not show.
fn narrow(
    output: ComputationOutput<EquityReport>,
    drop: &[&str],
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = serde_json::to_value(output)?;
    if let Some(Value::Object(result)) = value.get_mut("result") {
        for key in drop {
            result.remove(*key);
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockworth_core::report::ThresholdReport;

    fn common(price: Option<Decimal>) -> CommonArgs {
        CommonArgs {
            input: None,
            price,
            as_of: NaiveDate::from_ymd_opt(2026, 10, 16),
            tax_rate: None,
            api_key: None,
        }
    }

    fn config() -> StockworthConfig {
        serde_json::from_str(
            r#"{
                "symbol": "ACME",
                "price": 20,
                "granularity": "yearly",
                "thresholds": [1000],
                "rsus": [
                    {"qty": 100, "vest_date": "2026-01-15"},
                    {"qty": 100, "vest_date": "2027-01-15"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_flag_price_beats_config() {
        let input = build_input(&common(Some(dec!(30))), &config(), None, vec![]).unwrap();
        assert_eq!(input.current_price, dec!(30));
        let input = build_input(&common(None), &config(), None, vec![]).unwrap();
        assert_eq!(input.current_price, dec!(20));
    }

    #[test]
    fn test_granularity_precedence() {
        let input = build_input(&common(None), &config(), None, vec![]).unwrap();
        assert_eq!(input.granularity, Granularity::Yearly);
        let input =
            build_input(&common(None), &config(), Some(GranularityArg::Monthly), vec![]).unwrap();
        assert_eq!(input.granularity, Granularity::Monthly);
    }

    #[test]
    fn test_pick_thresholds() {
        assert_eq!(pick_thresholds(vec![], &config()), vec![dec!(1000)]);
        assert_eq!(pick_thresholds(vec![dec!(5)], &config()), vec![dec!(5)]);
    }

    #[test]
    fn test_api_key_precedence() {
        let key = resolve_api_key(Some("flag".into()), Some("config".into())).unwrap();
        assert_eq!(key, "flag");
        let key = resolve_api_key(None, Some("config".into())).unwrap();
        assert_eq!(key, "config");
    }

    #[test]
    fn test_narrow_drops_sections() {
        let input = build_input(&common(None), &config(), None, vec![dec!(1000)]).unwrap();
        let output = run(&input).unwrap();
        let thresholds: &Vec<ThresholdReport> = &output.result.thresholds;
        assert_eq!(thresholds.len(), 1);

        let value = narrow(output, &["schedule"]).unwrap();
        let result = value.get("result").unwrap();
        assert!(result.get("schedule").is_none());
        assert!(result.get("thresholds").is_some());
        assert!(result.get("unvested_value").is_some());
    }
}
