use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print the full computation envelope to stdout.
pub fn print_json(value: &Value) {
    let rendered = match serde_json::to_string_pretty(value) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("JSON serialization error: {}", e);
            return;
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // A closed pipe (e.g. `| head`) is not worth reporting
    let _ = writeln!(handle, "{}", rendered);
}
