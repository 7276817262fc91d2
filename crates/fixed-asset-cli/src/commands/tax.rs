use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fixed_asset_core::asset::BasisAdjustment;
use fixed_asset_core::tax::basis::{self, BasisInput};
use fixed_asset_core::tax::form4562::{self, Form4562Input};

use crate::input;

/// Arguments for an adjusted tax basis
#[derive(Args)]
pub struct AdjustedBasisArgs {
    /// Original cost
    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Section 179 expense election
    #[arg(long, default_value = "0")]
    pub section_179: Decimal,

    /// Section 168(k) bonus depreciation
    #[arg(long, default_value = "0")]
    pub section_168k: Decimal,

    /// Special depreciation allowance
    #[arg(long, default_value = "0")]
    pub special_depreciation: Decimal,

    /// Other basis reductions
    #[arg(long, default_value = "0")]
    pub other_adjustments: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the Form 4562 working summary
#[derive(Args)]
pub struct Form4562Args {
    /// Path to JSON input file: `{"assets": [...], "tax_year": 2024}` or an
    /// array of assets
    #[arg(long)]
    pub input: Option<String>,

    /// Tax year (overrides the input)
    #[arg(long)]
    pub tax_year: Option<i32>,

    /// Section 179 deduction limit (overrides the input)
    #[arg(long)]
    pub section_179_limit: Option<Decimal>,
}

pub fn run_adjusted_basis(args: AdjustedBasisArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let basis_input: BasisInput = if let Some(ref path) = args.input {
        serde_json::from_value(input::file::read_json_value(path)?)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        BasisInput {
            cost: args.cost.ok_or("--cost is required (or provide --input)")?,
            adjustments: BasisAdjustment {
                section_179: args.section_179,
                section_168k: args.section_168k,
                special_depreciation: args.special_depreciation,
                other_adjustments: args.other_adjustments,
                notes: None,
            },
        }
    };
    let result = basis::calculate_adjusted_basis(&basis_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_form4562(args: Form4562Args) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = input::wrap_assets(input::read_input(args.input.as_deref(), "form4562")?);
    if let Value::Object(map) = &mut value {
        if let Some(year) = args.tax_year {
            map.insert("tax_year".into(), year.into());
        }
        if let Some(limit) = args.section_179_limit {
            map.insert("section_179_limit".into(), serde_json::to_value(limit)?);
        }
    }
    let form_input: Form4562Input = serde_json::from_value(value)
        .map_err(|e| format!("Invalid form4562 input ({}); --tax-year may be missing", e))?;
    let result = form4562::prepare_form_4562(&form_input)?;
    Ok(serde_json::to_value(result)?)
}
