use clap::Args;
use serde::Serialize;
use serde_json::{json, Value};

use fixed_asset_core::asset::validation::validate_asset;
use fixed_asset_core::asset::Asset;
use fixed_asset_core::FixedAssetError;

use crate::input;

/// Arguments for asset validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON input file: `{"assets": [...]}` or an array of assets
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Serialize)]
struct AssetCheck {
    asset_id: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Check every asset independently; one bad record does not stop the rest.
pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::wrap_assets(input::read_input(args.input.as_deref(), "validate")?);
    let records = match value.get("assets") {
        Some(Value::Array(records)) => records.clone(),
        _ => return Err("validate input must be an array of assets or {\"assets\": [...]}".into()),
    };

    let checks: Vec<AssetCheck> = records.into_iter().enumerate().map(check_record).collect();
    let invalid = checks.iter().filter(|c| !c.valid).count();
    if invalid > 0 {
        tracing::warn!(invalid, checked = checks.len(), "assets failed validation");
    }

    Ok(json!({
        "result": {
            "checked": checks.len(),
            "valid": checks.len() - invalid,
            "invalid": invalid,
            "assets": checks,
        },
        "methodology": "Asset, schedule, basis and disposal checks",
        "warnings": [],
    }))
}

fn check_record((index, record): (usize, Value)) -> AssetCheck {
    let asset_id = record
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", index));

    let outcome = serde_json::from_value::<Asset>(record)
        .map_err(FixedAssetError::from)
        .and_then(|asset| validate_asset(&asset));

    match outcome {
        Ok(()) => AssetCheck {
            asset_id,
            valid: true,
            field: None,
            error: None,
        },
        Err(e) => AssetCheck {
            asset_id,
            valid: false,
            field: e.field().map(str::to_string),
            error: Some(e.to_string()),
        },
    }
}
