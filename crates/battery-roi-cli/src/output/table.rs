use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_rows, format_cell};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) if result.contains_key("matrix") => print_grid(result),
        Some(Value::Object(result)) => print_field_table(result),
        _ => print_field_table(envelope),
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

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_rows(map) {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

/// Sensitivity output: variable_1 down the side, variable_2 across the top.
fn print_grid(result: &Map<String, Value>) {
    let label = |key: &str| result.get(key).map(format_cell).unwrap_or_default();
    let values = |key: &str| -> Vec<String> {
        match result.get(key) {
            Some(Value::Array(arr)) => arr.iter().map(format_cell).collect(),
            _ => Vec::new(),
        }
    };

    let rows = values("variable_1_values");
    let cols = values("variable_2_values");

    let mut builder = Builder::default();
    let mut header = vec![format!("{} \\ {}", label("variable_1"), label("variable_2"))];
    header.extend(cols);
    builder.push_record(header);

    if let Some(Value::Array(matrix)) = result.get("matrix") {
        for (row_label, row) in rows.iter().zip(matrix) {
            let mut record = vec![row_label.clone()];
            if let Value::Array(cells) = row {
                record.extend(cells.iter().map(format_cell));
            }
            builder.push_record(record);
        }
    }

    println!("Metric: {}", label("output_metric"));
    println!("{}", Table::from(builder));
    println!("Base case: {}", label("base_case_value"));
}
