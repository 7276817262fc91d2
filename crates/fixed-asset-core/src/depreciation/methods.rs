//! Periodic depreciation amounts before any first-period convention.
//!
//! Every method works on whole years and a 1-based period index. Amounts are
//! raw: nothing here floors at salvage value, that is the schedule builder's
//! job.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FixedAssetError;
use crate::types::{Money, Rate, Years};
use crate::FixedAssetResult;

/// 200% declining balance.
const DECLINING_BALANCE_MULTIPLIER: Decimal = dec!(2);

/// Depreciation method of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepreciationMethod {
    StraightLine,
    DecliningBalance,
    SumOfYearsDigits,
    /// No units-produced figure is tracked, so this falls back to straight-line.
    UnitsOfProduction,
}

impl DepreciationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            DepreciationMethod::StraightLine => "straight-line",
            DepreciationMethod::DecliningBalance => "declining-balance",
            DepreciationMethod::SumOfYearsDigits => "sum-of-years-digits",
            DepreciationMethod::UnitsOfProduction => "units-of-production",
        }
    }
}

impl fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DepreciationMethod {
    type Err = FixedAssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "straight-line" => Ok(DepreciationMethod::StraightLine),
            "declining-balance" => Ok(DepreciationMethod::DecliningBalance),
            "sum-of-years-digits" => Ok(DepreciationMethod::SumOfYearsDigits),
            "units-of-production" => Ok(DepreciationMethod::UnitsOfProduction),
            other => Err(FixedAssetError::configuration(
                "input",
                "method",
                format!("Unsupported depreciation method '{other}'"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Raw depreciation for `period` (1 = first depreciation year).
///
/// - straight-line / units-of-production: (cost - salvage) / life
/// - declining-balance: 200% DB on the undepreciated cost, ignoring salvage
///   and never switching to straight-line
/// - sum-of-years-digits: (cost - salvage) * (life - p + 1) / (life(life+1)/2)
///
/// Periods past the end of the life depreciate nothing.
pub fn depreciation_amount(
    cost: Money,
    salvage: Money,
    life: Years,
    method: DepreciationMethod,
    period: u32,
) -> FixedAssetResult<Money> {
    if life == 0 {
        return Err(FixedAssetError::configuration(
            "depreciation_amount",
            "life",
            "Useful life must be at least one year",
        ));
    }
    if period == 0 {
        return Err(FixedAssetError::configuration(
            "depreciation_amount",
            "period",
            "Period index is 1-based",
        ));
    }
    if period > life {
        return Ok(Decimal::ZERO);
    }

    let life_d = Decimal::from(life);
    let amount = match method {
        DepreciationMethod::StraightLine | DepreciationMethod::UnitsOfProduction => {
            (cost - salvage) / life_d
        }
        DepreciationMethod::DecliningBalance => {
            let rate = declining_balance_rate(life);
            let remaining = cost - accumulated_declining_balance(cost, rate, period - 1);
            remaining * rate
        }
        DepreciationMethod::SumOfYearsDigits => {
            let remaining_factor = Decimal::from(life - period + 1);
            (cost - salvage) * remaining_factor / sum_of_years_digits(life)
        }
    };
    Ok(amount)
}

/// Annual rate for 200% declining balance: 2 / life.
pub fn declining_balance_rate(life: Years) -> Rate {
    DECLINING_BALANCE_MULTIPLIER / Decimal::from(life.max(1))
}

/// life * (life + 1) / 2
pub fn sum_of_years_digits(life: Years) -> Decimal {
    let life = Decimal::from(life);
    life * (life + Decimal::ONE) / dec!(2)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Declining-balance depreciation taken over the first `periods` periods,
/// compounding the shrinking balance period by period.
fn accumulated_declining_balance(cost: Money, rate: Rate, periods: u32) -> Money {
    let mut remaining = cost;
    for _ in 0..periods {
        remaining -= remaining * rate;
    }
    cost - remaining
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
