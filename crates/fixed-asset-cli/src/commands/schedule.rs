use clap::Args;
use serde_json::Value;

use fixed_asset_core::asset::{Asset, BookType};
use fixed_asset_core::depreciation::schedule::{self, ScheduleRequest};

use crate::input;

/// Arguments for a single-book depreciation schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file: a schedule request `{"asset": {...}}` or a
    /// bare asset
    #[arg(long)]
    pub input: Option<String>,

    /// Book to build (GAAP or Tax)
    #[arg(long)]
    pub book: Option<BookType>,

    /// Depreciate cost less elected basis reductions instead of cost
    #[arg(long)]
    pub apply_basis_adjustments: bool,
}

/// Arguments for the all-books depreciation report
#[derive(Args)]
pub struct DepreciationReportArgs {
    /// Path to JSON input file with one asset
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::read_input(args.input.as_deref(), "schedule")?;
    let mut request: ScheduleRequest = if value.get("asset").is_some() {
        serde_json::from_value(value)?
    } else {
        ScheduleRequest {
            asset: serde_json::from_value(value)?,
            book: BookType::Gaap,
            apply_basis_adjustments: false,
        }
    };
    if let Some(book) = args.book {
        request.book = book;
    }
    if args.apply_basis_adjustments {
        request.apply_basis_adjustments = true;
    }

    let result = schedule::calculate_schedule(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_depreciation_report(
    args: DepreciationReportArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::read_input(args.input.as_deref(), "depreciation report")?;
    let asset: Asset = match value {
        Value::Object(mut map) if map.contains_key("asset") => {
            serde_json::from_value(map.remove("asset").unwrap_or_default())?
        }
        other => serde_json::from_value(other)?,
    };
    let result = schedule::depreciation_report(&asset)?;
    Ok(serde_json::to_value(result)?)
}
