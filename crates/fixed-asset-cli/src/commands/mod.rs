pub mod reports;
pub mod schedule;
pub mod tax;
pub mod validate;

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use fixed_asset_core::asset::filter::AssetFilter;
use fixed_asset_core::asset::{Asset, AssetStatus};
use fixed_asset_core::ReportingPeriod;

use crate::input;

/// Reporting period flags. When given they replace any `period` in the input.
#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// Calendar year to report on (January 1 through December 31)
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub year: Option<i32>,

    /// Period start date, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "end")]
    pub start: Option<NaiveDate>,

    /// Period end date, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    pub end: Option<NaiveDate>,
}

impl PeriodArgs {
    fn period(&self) -> Result<Option<ReportingPeriod>, Box<dyn std::error::Error>> {
        Ok(match (self.year, self.start, self.end) {
            (Some(year), _, _) => Some(ReportingPeriod::calendar_year(year)?),
            (None, Some(start), Some(end)) => Some(ReportingPeriod::new(start, end)?),
            _ => None,
        })
    }
}

/// Asset selection flags, applied before the report runs.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Only assets in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only assets in this department
    #[arg(long)]
    pub department: Option<String>,

    /// Only assets with this status (active, inactive, disposed)
    #[arg(long)]
    pub status: Option<AssetStatus>,

    /// Minimum cost, inclusive
    #[arg(long)]
    pub min_cost: Option<Decimal>,

    /// Maximum cost, inclusive
    #[arg(long)]
    pub max_cost: Option<Decimal>,
}

impl FilterArgs {
    fn to_filter(&self) -> AssetFilter {
        AssetFilter {
            category: self.category.clone(),
            department: self.department.clone(),
            status: self.status,
            min_cost: self.min_cost,
            max_cost: self.max_cost,
        }
    }

    /// Keep the assets matching the flags. Activity within the period is
    /// left to the report itself, so the same portfolio aggregates the same
    /// way with or without flags.
    pub fn apply(&self, assets: Vec<Asset>) -> Vec<Asset> {
        let filter = self.to_filter();
        let before = assets.len();
        let selected: Vec<Asset> = assets.into_iter().filter(|a| filter.matches(a)).collect();
        tracing::debug!(before, after = selected.len(), "applied asset filter");
        selected
    }
}

/// Arguments shared by the period reports (rollforward, disposals, waterfall)
#[derive(Args)]
pub struct PortfolioReportArgs {
    /// Path to JSON input file: `{"assets": [...], "period": {...}}` or an
    /// array of assets
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub period: PeriodArgs,

    #[command(flatten)]
    pub filter: FilterArgs,
}

impl PortfolioReportArgs {
    /// Read the portfolio input, with period flags taking precedence.
    pub fn load<T: DeserializeOwned>(&self, what: &str) -> Result<T, Box<dyn std::error::Error>> {
        let mut value = input::wrap_assets(input::read_input(self.input.as_deref(), what)?);
        let Value::Object(map) = &mut value else {
            return Err(
                format!("{} input must be a JSON object or an array of assets", what).into(),
            );
        };
        if let Some(period) = self.period.period()? {
            map.insert("period".into(), serde_json::to_value(period)?);
        }
        if !map.contains_key("period") {
            return Err(format!(
                "{} needs a reporting period: pass --year or --start/--end, \
                 or include \"period\" in the input",
                what
            )
            .into());
        }
        Ok(serde_json::from_value(value)?)
    }
}
