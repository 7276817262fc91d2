//! First-period timing conventions.
//!
//! Only the first depreciation period is prorated. Mid-quarter uses a single
//! averaged factor rather than one per placed-in-service quarter.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FixedAssetError;
use crate::types::{Money, Rate};

const HALF_YEAR_FACTOR: Decimal = dec!(0.5);
const MID_QUARTER_FACTOR: Decimal = dec!(0.625);

/// First-period placement convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Convention {
    HalfYear,
    MidQuarter,
    MidMonth,
    FullMonth,
}

impl Convention {
    pub fn label(&self) -> &'static str {
        match self {
            Convention::HalfYear => "half-year",
            Convention::MidQuarter => "mid-quarter",
            Convention::MidMonth => "mid-month",
            Convention::FullMonth => "full-month",
        }
    }

    /// Multiplier applied to the first period's raw amount.
    pub fn first_period_factor(&self) -> Rate {
        match self {
            Convention::HalfYear => HALF_YEAR_FACTOR,
            Convention::MidQuarter => MID_QUARTER_FACTOR,
            Convention::MidMonth => dec!(11.5) / dec!(12),
            Convention::FullMonth => Decimal::ONE,
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Convention {
    type Err = FixedAssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "half-year" => Ok(Convention::HalfYear),
            "mid-quarter" => Ok(Convention::MidQuarter),
            "mid-month" => Ok(Convention::MidMonth),
            "full-month" => Ok(Convention::FullMonth),
            other => Err(FixedAssetError::configuration(
                "input",
                "convention",
                format!("Unsupported convention '{other}'"),
            )),
        }
    }
}

/// Apply `convention` to a raw period amount. A no-op for every period but
/// the first.
pub fn adjust_for_convention(raw: Money, convention: Convention, is_first_period: bool) -> Money {
    if !is_first_period {
        return raw;
    }
    match convention {
        Convention::FullMonth => raw,
        other => raw * other.first_period_factor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Convention; 4] = [
        Convention::HalfYear,
        Convention::MidQuarter,
        Convention::MidMonth,
        Convention::FullMonth,
    ];

    #[test]
    fn test_half_year_halves_first_period() {
        assert_eq!(
            adjust_for_convention(dec!(40000), Convention::HalfYear, true),
            dec!(20000)
        );
    }

    #[test]
    fn test_mid_quarter_factor() {
        assert_eq!(
            adjust_for_convention(dec!(8000), Convention::MidQuarter, true),
            dec!(5000)
        );
    }

    #[test]
    fn test_mid_month_factor() {
        let adjusted = adjust_for_convention(dec!(12000), Convention::MidMonth, true);
        assert!(
            (adjusted - dec!(11500)).abs() < dec!(0.0000001),
            "Expected 11500, got {}",
            adjusted
        );
    }

    #[test]
    fn test_full_month_unchanged() {
        assert_eq!(
            adjust_for_convention(dec!(1234.56), Convention::FullMonth, true),
            dec!(1234.56)
        );
    }

    #[test]
    fn test_no_adjustment_after_first_period() {
        for convention in ALL {
            assert_eq!(
                adjust_for_convention(dec!(9999.99), convention, false),
                dec!(9999.99),
                "{} must not adjust later periods",
                convention
            );
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for convention in ALL {
            assert_eq!(convention.label().parse::<Convention>().unwrap(), convention);
        }
        assert!("mid-year".parse::<Convention>().is_err());
    }
}
