use serde_json::{Map, Value};

use super::format_cell;

/// Headline figures, in the order they are looked for.
const PRIORITY_KEYS: [&str; 9] = [
    "gain_loss",
    "total_gain_loss",
    "adjusted_basis",
    "total_depreciation",
    "ending_balance",
    "total_macrs_first_year",
    "total_section_179",
    "invalid",
    "final_nbv",
];

/// Print just the key answer value from the output.
///
/// Looks for a headline field in the result, then in its `totals` object,
/// then falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        let totals = map.get("totals").and_then(Value::as_object);
        if let Some(val) = headline(map).or_else(|| totals.and_then(headline)) {
            println!("{}", format_minimal(val));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn headline(map: &Map<String, Value>) -> Option<&Value> {
    PRIORITY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|val| !val.is_null())
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        _ => format_cell(value),
    }
}
