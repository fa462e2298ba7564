use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::collection::EquityCollection;
use crate::equity::EquityUnit;
use crate::error::StockworthError;
use crate::types::{Money, Rate, Shares};
use crate::StockworthResult;

/// One vesting event of a restricted stock unit grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsuGrant {
    /// Number of shares vesting
    #[serde(rename = "qty", alias = "quantity")]
    pub quantity: Shares,
    /// ISO-8601 vest date (`YYYY-MM-DD`)
    pub vest_date: String,
}

/// One vesting event of a stock option grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionGrant {
    /// Number of options vesting
    #[serde(rename = "qty", alias = "quantity")]
    pub quantity: Shares,
    /// ISO-8601 vest date (`YYYY-MM-DD`)
    pub vest_date: String,
    /// Exercise (strike) price per share
    #[serde(rename = "price", alias = "strike_price")]
    pub strike_price: Money,
}

impl RsuGrant {
    pub fn to_unit(&self, current_price: Money, tax_rate: Rate) -> StockworthResult<EquityUnit> {
        EquityUnit::from_rsu(current_price, self.quantity, &self.vest_date, tax_rate)
    }
}

impl OptionGrant {
    pub fn to_unit(&self, current_price: Money, tax_rate: Rate) -> StockworthResult<EquityUnit> {
        EquityUnit::from_option(
            current_price,
            self.quantity,
            &self.vest_date,
            self.strike_price,
            tax_rate,
        )
    }

    /// True when exercising at `current_price` would not make money.
    pub fn is_underwater(&self, current_price: Money) -> bool {
        current_price <= self.strike_price
    }
}

/// Every RSU and option vesting event for one person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantBook {
    #[serde(default)]
    pub rsus: Vec<RsuGrant>,
    #[serde(default)]
    pub options: Vec<OptionGrant>,
}

impl GrantBook {
    pub fn len(&self) -> usize {
        self.rsus.len() + self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsus.is_empty() && self.options.is_empty()
    }

    /// Value every grant at `current_price`.
    ///
    /// The first malformed vest date aborts the whole conversion, and the
    /// error names the grant it came from (e.g. `options[1].vest_date`).
    pub fn to_collection(
        &self,
        current_price: Money,
        tax_rate: Rate,
    ) -> StockworthResult<EquityCollection> {
        let mut units = Vec::with_capacity(self.len());
        for (i, grant) in self.rsus.iter().enumerate() {
            let unit = grant
                .to_unit(current_price, tax_rate)
                .map_err(|e| name_grant(e, &format!("rsus[{i}]")))?;
            units.push(unit);
        }
        for (i, grant) in self.options.iter().enumerate() {
            let unit = grant
                .to_unit(current_price, tax_rate)
                .map_err(|e| name_grant(e, &format!("options[{i}]")))?;
            units.push(unit);
        }
        Ok(EquityCollection::new(units))
    }

    pub fn underwater_options(&self, current_price: Money) -> Vec<&OptionGrant> {
        self.options
            .iter()
            .filter(|g| g.is_underwater(current_price))
            .collect()
    }
}

fn name_grant(err: StockworthError, grant: &str) -> StockworthError {
    match err {
        StockworthError::DateParse { value, reason } => StockworthError::DateParse {
            value,
            reason: format!("{grant}.vest_date: {reason}"),
        },
        other => other,
    }
}

/// Reject inputs that only produce nonsensical valuations.
///
/// Zero quantities and prices are allowed. Negative quantities, prices and
/// strikes are rejected with `InvalidAmount`; a tax rate outside `[0, 1)` is
/// rejected with `InvalidInput`.
pub fn validate_grant_book(
    book: &GrantBook,
    current_price: Money,
    tax_rate: Rate,
) -> StockworthResult<()> {
    if current_price < Decimal::ZERO {
        return Err(StockworthError::InvalidAmount {
            field: "current_price".into(),
            reason: format!("Share price cannot be negative, got {current_price}"),
        });
    }
    if tax_rate < Decimal::ZERO || tax_rate >= Decimal::ONE {
        return Err(StockworthError::InvalidInput {
            field: "tax_rate".into(),
            reason: format!("Tax rate must be in [0, 1), got {tax_rate}"),
        });
    }
    for (i, grant) in book.rsus.iter().enumerate() {
        if grant.quantity < Decimal::ZERO {
            return Err(StockworthError::InvalidAmount {
                field: format!("rsus[{i}].qty"),
                reason: format!("Quantity cannot be negative, got {}", grant.quantity),
            });
        }
    }
    for (i, grant) in book.options.iter().enumerate() {
        if grant.quantity < Decimal::ZERO {
            return Err(StockworthError::InvalidAmount {
                field: format!("options[{i}].qty"),
                reason: format!("Quantity cannot be negative, got {}", grant.quantity),
            });
        }
        if grant.strike_price < Decimal::ZERO {
            return Err(StockworthError::InvalidAmount {
                field: format!("options[{i}].price"),
                reason: format!("Strike price cannot be negative, got {}", grant.strike_price),
            });
        }
    }
    Ok(())
}
