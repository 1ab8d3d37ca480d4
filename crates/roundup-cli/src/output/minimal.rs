use serde_json::Value;

use super::format_cell;

/// Fields that best summarize each command, in order of priority.
const PRIORITY_KEYS: [&str; 4] = ["totalRemanent", "totalTransactionAmount", "taxBenefit", "tax"];

/// Print just the key answer value from the output.
///
/// Falls back to `valid/invalid` counts for classification results, then
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_cell(val));
                return;
            }
        }

        if let (Some(Value::Array(valid)), Some(Value::Array(invalid))) = (map.get("valid"), map.get("invalid")) {
            println!("valid: {}, invalid: {}", valid.len(), invalid.len());
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_cell(val));
            return;
        }
    }

    println!("{}", format_cell(result_obj));
}
