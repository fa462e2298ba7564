use serde_json::{Map, Value};
use std::io::{self, Write};

use super::format_cell;

/// Write output as CSV to stdout.
///
/// Scalar results come first as `field,value` rows; each list in the result
/// (schedule, thresholds) follows as its own block with a header row.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let _ = write_csv(stdout.lock(), value);
}

fn write_csv<W: Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);

    match value {
        Value::Object(map) => {
            let result = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            write_result(&mut wtr, result)?;
        }
        Value::Array(arr) => write_rows(&mut wtr, arr)?,
        _ => wtr.write_record([format_cell(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_result<W: Write>(wtr: &mut csv::Writer<W>, result: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in result {
        if !val.is_array() {
            wtr.write_record([key.as_str(), &format_cell(val)])?;
        }
    }
    for (key, val) in result {
        if let Value::Array(rows) = val {
            wtr.write_record([key.as_str()])?;
            write_rows(wtr, rows)?;
        }
    }
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let mut headers: Vec<&str> = Vec::new();
    for item in arr {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !headers.contains(&key.as_str()) {
                    headers.push(key.as_str());
                }
            }
        }
    }

    if headers.is_empty() {
        for item in arr {
            wtr.write_record([format_cell(item)])?;
        }
        return Ok(());
    }

    wtr.write_record(&headers)?;
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_cell).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}
