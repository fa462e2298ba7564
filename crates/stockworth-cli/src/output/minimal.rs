use serde_json::Value;

use super::format_cell;

/// Print just the key answer from the output.
///
/// Threshold results print one `amount date` line each; otherwise the first
/// present field in priority order is printed, falling back to the first
/// field of the result object.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(value) {
        println!("{}", line);
    }
}

fn minimal_lines(value: &Value) -> Vec<String> {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["unvested_value", "vested_value", "total_value"];

    let Value::Object(map) = result_obj else {
        return vec![format_cell(result_obj)];
    };

    if let Some(Value::Array(thresholds)) = map.get("thresholds") {
        if !thresholds.is_empty() {
            return thresholds
                .iter()
                .map(|t| {
                    format!(
                        "{} {}",
                        t.get("amount").map(format_cell).unwrap_or_default(),
                        t.get("date").map(format_cell).unwrap_or_default()
                    )
                })
                .collect();
        }
    }

    for key in &priority_keys {
        if let Some(val) = map.get(*key) {
            if !val.is_null() {
                return vec![format_cell(val)];
            }
        }
    }

    match map.iter().next() {
        Some((key, val)) => vec![format!("{}: {}", key, format_cell(val))],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unvested_first() {
        let value = json!({"result": {"total_value": "10", "unvested_value": "4"}});
        assert_eq!(minimal_lines(&value), vec!["4"]);
    }

    #[test]
    fn test_thresholds_listed() {
        let value = json!({"result": {
            "unvested_value": "4",
            "thresholds": [
                {"amount": "3", "date": "2027-01-01"},
                {"amount": "1", "date": "2027-06-01"}
            ]
        }});
        assert_eq!(minimal_lines(&value), vec!["3 2027-01-01", "1 2027-06-01"]);
    }
}
