use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print the full envelope as JSON to stdout.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let written = serde_json::to_writer_pretty(&mut handle, value)
        .map_err(io::Error::from)
        .and_then(|_| writeln!(handle));
    if let Err(e) = written {
        eprintln!("JSON output error: {}", e);
    }
}
