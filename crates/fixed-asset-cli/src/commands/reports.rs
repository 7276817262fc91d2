use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use fixed_asset_core::reports::disposal::{self, DisposalReportInput};
use fixed_asset_core::reports::rollforward::{self, RollforwardInput};
use fixed_asset_core::reports::waterfall::{self, WaterfallInput};

use super::PortfolioReportArgs;
use crate::input;

/// Arguments for a gain/loss on a single disposal
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct GainLossArgs {
    /// Disposal proceeds
    #[arg(long)]
    pub proceeds: Option<Decimal>,

    /// Net book value at the disposal date
    #[arg(long, alias = "nbv")]
    pub net_book_value: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct GainLossInput {
    proceeds: Decimal,
    net_book_value: Decimal,
}

pub fn run_rollforward(args: PortfolioReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut rollforward_input: RollforwardInput = args.load("rollforward")?;
    rollforward_input.assets = args.filter.apply(rollforward_input.assets);
    let result = rollforward::calculate_rollforward(&rollforward_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_disposal_report(args: PortfolioReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut disposal_input: DisposalReportInput = args.load("disposal report")?;
    disposal_input.assets = args.filter.apply(disposal_input.assets);
    let result = disposal::disposal_report(&disposal_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_waterfall(args: PortfolioReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut waterfall_input: WaterfallInput = args.load("waterfall")?;
    waterfall_input.assets = args.filter.apply(waterfall_input.assets);
    let result = waterfall::calculate_waterfall(&waterfall_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_gain_loss(args: GainLossArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let gl_input: GainLossInput = if let Some(ref path) = args.input {
        serde_json::from_value(input::file::read_json_value(path)?)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        GainLossInput {
            proceeds: args
                .proceeds
                .ok_or("--proceeds is required (or provide --input)")?,
            net_book_value: args
                .net_book_value
                .ok_or("--net-book-value is required (or provide --input)")?,
        }
    };

    let gain_loss = disposal::gain_loss(gl_input.proceeds, gl_input.net_book_value);
    Ok(json!({
        "result": {
            "proceeds": gl_input.proceeds.to_string(),
            "net_book_value": gl_input.net_book_value.to_string(),
            "gain_loss": gain_loss.to_string(),
        },
        "methodology": "Gain/(loss) = proceeds - net book value",
        "warnings": [],
    }))
}
