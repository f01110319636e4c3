pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a scalar or sentinel for a single cell.
///
/// `{"years": "2.7"}` and `{"rate": "0.34"}` collapse to their number;
/// `"unattainable"` / `"indeterminate"` pass through as text.
pub(crate) fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Object(map) if map.len() == 1 => {
            map.values().next().map(format_cell).unwrap_or_default()
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_cell).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Flatten nested breakdown objects into `parent.child` rows.
pub(crate) fn flatten_rows(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for (key, val) in map {
        match val {
            Value::Object(inner) if inner.len() > 1 => {
                for (sub, sub_val) in inner {
                    rows.push((format!("{key}.{sub}"), format_cell(sub_val)));
                }
            }
            _ => rows.push((key.clone(), format_cell(val))),
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sentinel_cells() {
        assert_eq!(format_cell(&json!({"years": "2.7"})), "2.7");
        assert_eq!(format_cell(&json!("unattainable")), "unattainable");
        assert_eq!(format_cell(&Value::Null), "-");
    }

    #[test]
    fn test_breakdown_flattened() {
        let value = json!({
            "npv": "100",
            "details": {"pv_savings": "1", "o_and_m": "2"}
        });
        let rows = flatten_rows(value.as_object().unwrap());
        assert!(rows.contains(&("details.pv_savings".to_string(), "1".to_string())));
        assert!(rows.contains(&("npv".to_string(), "100".to_string())));
    }
}
