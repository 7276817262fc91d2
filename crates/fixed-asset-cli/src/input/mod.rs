pub mod file;
pub mod stdin;

use serde_json::Value;

/// Input JSON from `--input <file.json>`, else from piped stdin.
pub fn read_input(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json_value(path);
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(value),
        None => Err(format!("--input <file.json> or stdin required for {}", what).into()),
    }
}

/// Portfolio inputs accept either `{"assets": [...], ...}` or a bare array.
pub fn wrap_assets(value: Value) -> Value {
    match value {
        Value::Array(assets) => serde_json::json!({ "assets": assets }),
        other => other,
    }
}
