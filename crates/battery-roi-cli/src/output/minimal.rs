use serde_json::Value;

use super::format_cell;

/// Print just the key answer value from the output.
///
/// Looks for the headline field of each command in order of priority,
/// then falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // roi → npv; sanity-check → ok; sensitivity → base case
    let priority_keys = ["npv", "ok", "base_case_value", "payback", "annual_net_sek"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                println!("{}", format_cell(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_cell(val));
            return;
        }
    }

    println!("{}", format_cell(result_obj));
}
