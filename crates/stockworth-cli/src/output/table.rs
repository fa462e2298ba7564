use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_cell;

/// Format output as tables using the tabled crate: one Field/Value table for
/// the scalar results, then one table per list (vesting calendar, thresholds).
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_tables(result, map);
            } else {
                print_field_table(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_tables(result: &Value, envelope: &Map<String, Value>) {
    let Value::Object(res_map) = result else {
        print_field_table(envelope);
        return;
    };

    print_field_table(res_map);

    for (key, val) in res_map {
        if let Value::Array(rows) = val {
            println!("\n{}:", section_title(key));
            print_array_table(rows);
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }
}

/// Field/Value table of every non-list entry.
fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if !val.is_array() {
            builder.push_record([key.as_str(), &format_cell(val)]);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Union of keys in first-seen order; the vested bucket has no period_start
    let mut headers: Vec<String> = Vec::new();
    for item in arr {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    if headers.is_empty() {
        for item in arr {
            println!("{}", format_cell(item));
        }
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn section_title(key: &str) -> String {
    match key {
        "schedule" => "Vesting schedule".to_string(),
        "thresholds" => "Thresholds".to_string(),
        other => other.replace('_', " "),
    }
}
