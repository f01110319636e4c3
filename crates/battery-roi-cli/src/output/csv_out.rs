use serde_json::Value;
use std::io;

use super::{flatten_rows, format_cell};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) if map.contains_key("matrix") => write_grid_csv(&mut wtr, map),
        Value::Object(map) => {
            // Two-column CSV: field, value
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten_rows(map) {
                let _ = wtr.write_record([key, val]);
            }
        }
        _ => {
            let _ = wtr.write_record([format_cell(result)]);
        }
    }

    let _ = wtr.flush();
}

/// One row per variable_1 value, one column per variable_2 value.
fn write_grid_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    map: &serde_json::Map<String, Value>,
) {
    let as_cells = |key: &str| -> Vec<String> {
        match map.get(key) {
            Some(Value::Array(arr)) => arr.iter().map(format_cell).collect(),
            _ => Vec::new(),
        }
    };

    let mut header = vec![map.get("variable_1").map(format_cell).unwrap_or_default()];
    header.extend(as_cells("variable_2_values"));
    let _ = wtr.write_record(&header);

    let rows = as_cells("variable_1_values");
    if let Some(Value::Array(matrix)) = map.get("matrix") {
        for (label, row) in rows.iter().zip(matrix) {
            let mut record = vec![label.clone()];
            if let Value::Array(cells) = row {
                record.extend(cells.iter().map(format_cell));
            }
            let _ = wtr.write_record(&record);
        }
    }
}
