use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FixedAssetError;
use crate::FixedAssetResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and factors expressed as decimals (0.4 = 40%). Never as percentages.
pub type Rate = Decimal;

/// Useful life in whole years.
pub type Years = u32;

/// Inclusive reporting window. Every period-dependent report takes one of
/// these explicitly; nothing in the engine reads the system clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> FixedAssetResult<Self> {
        let period = ReportingPeriod { start, end };
        period.validate()?;
        Ok(period)
    }

    /// The calendar year `year`, January 1 through December 31.
    pub fn calendar_year(year: i32) -> FixedAssetResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| FixedAssetError::DateError(format!("Year {year} out of range")))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| FixedAssetError::DateError(format!("Year {year} out of range")))?;
        Ok(ReportingPeriod { start, end })
    }

    pub fn validate(&self) -> FixedAssetResult<()> {
        if self.end < self.start {
            return Err(FixedAssetError::InvalidInput {
                field: "period".into(),
                reason: format!(
                    "Period end {} is before period start {}",
                    self.end, self.start
                ),
            });
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
