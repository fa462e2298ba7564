use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Print the report as a short narrative, the way a person would say it.
pub fn print_text(value: &Value) {
    print!("{}", render_text(value));
}

pub fn render_text(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    let mut lines: Vec<String> = Vec::new();

    if let (Some(price), Some(total)) = (money(result, "current_price"), money(result, "total_value")) {
        let symbol = result
            .get("symbol")
            .and_then(Value::as_str)
            .unwrap_or("The stock");
        lines.push(format!(
            "{} last closed at {}. At that price, your total equity is worth {}.",
            symbol,
            format_price(price),
            format_currency(total)
        ));
    }

    if let Some(Value::Array(bins)) = result.get("schedule") {
        lines.push("Your vesting schedule is".to_string());
        for bin in bins {
            let label = bin.get("label").and_then(Value::as_str).unwrap_or("?");
            let amount = money(bin, "value").unwrap_or_default();
            lines.push(format!("\t{}: {}", label, format_currency(amount)));
        }
    }

    if let Some(unvested) = money(result, "unvested_value") {
        lines.push(format!(
            "If you quit today, you will be walking away from {}.",
            format_currency(unvested)
        ));
    }

    if let Some(Value::Array(thresholds)) = result.get("thresholds") {
        for t in thresholds {
            let amount = money(t, "amount").unwrap_or_default();
            let remaining = t.get("time_remaining");
            let part = |key: &str| {
                remaining
                    .and_then(|r| r.get(key))
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
            };
            lines.push(format!(
                "\tOnly {} years, {} months, and {} days until that's less than {}.",
                part("years"),
                part("months"),
                part("days"),
                format_currency(amount)
            ));
        }
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for w in warnings.iter().filter_map(Value::as_str) {
            lines.push(format!("Note: {}", w));
        }
    }

    lines.push("Hang in there!".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn money(value: &Value, key: &str) -> Option<Decimal> {
    match value.get(key)? {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// `$1,234`: dollar sign, thousands separators, no cents.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(0);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}", sign, group_thousands(&rounded.abs().trunc().to_string()))
}

/// `1,234.50`: thousands separators, rounded half-to-even to two decimal places.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp(2);
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, group_thousands(whole), cents)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
