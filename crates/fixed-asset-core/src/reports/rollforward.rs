//! Fixed asset rollforward: beginning balance, additions, disposals,
//! pro-rata depreciation and ending balance per category.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{annual_gaap_depreciation, DAYS_IN_YEAR};
use crate::asset::filter::was_active_during;
use crate::asset::model::Asset;
use crate::asset::validation::validate_asset;
use crate::types::{with_metadata, ComputationOutput, Money, ReportingPeriod};
use crate::FixedAssetResult;

const TOTAL_LABEL: &str = "Total";

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollforwardInput {
    pub assets: Vec<Asset>,
    pub period: ReportingPeriod,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One category's reconciliation for the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollforwardRow {
    pub category: String,
    pub beginning_balance: Money,
    pub additions: Money,
    pub disposals: Money,
    pub depreciation: Money,
    pub ending_balance: Money,
    pub asset_count: usize,
}

impl RollforwardRow {
    fn empty(category: &str) -> Self {
        RollforwardRow {
            category: category.to_string(),
            beginning_balance: Decimal::ZERO,
            additions: Decimal::ZERO,
            disposals: Decimal::ZERO,
            depreciation: Decimal::ZERO,
            ending_balance: Decimal::ZERO,
            asset_count: 0,
        }
    }

    fn has_activity(&self) -> bool {
        !(self.beginning_balance.is_zero()
            && self.additions.is_zero()
            && self.disposals.is_zero()
            && self.depreciation.is_zero())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollforwardOutput {
    pub period: ReportingPeriod,
    /// Categories with activity, in order of first appearance
    pub rows: Vec<RollforwardRow>,
    /// Grand total across `rows`
    pub totals: RollforwardRow,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Per-category rollforward rows for `period`, over the assets active at
/// some point in it. Categories with no beginning balance, additions,
/// disposals or depreciation are dropped.
pub fn rollforward_rows(
    assets: &[Asset],
    period: &ReportingPeriod,
) -> FixedAssetResult<Vec<RollforwardRow>> {
    let mut warnings = Vec::new();
    build_rows(assets, period, &mut warnings)
}

/// Validate inputs, aggregate by category and append a grand total.
pub fn calculate_rollforward(
    input: &RollforwardInput,
) -> FixedAssetResult<ComputationOutput<RollforwardOutput>> {
    let start = Instant::now();
    input.period.validate()?;
    for asset in &input.assets {
        validate_asset(asset)?;
    }

    let mut warnings = Vec::new();
    let rows = build_rows(&input.assets, &input.period, &mut warnings)?;
    let totals = total_row(&rows);

    tracing::debug!(
        assets = input.assets.len(),
        categories = rows.len(),
        start = %input.period.start,
        end = %input.period.end,
        "aggregated rollforward"
    );

    let output = RollforwardOutput {
        period: input.period,
        rows,
        totals,
    };

    Ok(with_metadata(
        "Category rollforward with pro-rata GAAP depreciation (actual days / 365)",
        &serde_json::json!({
            "period": input.period,
            "asset_count": input.assets.len(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}

/// Annual depreciation scaled by the days the asset was in service within
/// the period.
pub fn pro_rata_depreciation(asset: &Asset, annual: Money, period: &ReportingPeriod) -> Money {
    if !was_active_during(asset, period) {
        return Decimal::ZERO;
    }
    let from = asset.in_service_date.max(period.start);
    let to = asset
        .disposal_date()
        .map_or(period.end, |d| d.min(period.end));
    let days = (to - from).num_days().max(0);
    annual * Decimal::from(days) / DAYS_IN_YEAR
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_rows(
    assets: &[Asset],
    period: &ReportingPeriod,
    warnings: &mut Vec<String>,
) -> FixedAssetResult<Vec<RollforwardRow>> {
    let mut rows: Vec<RollforwardRow> = Vec::new();

    // Assets disposed before the period or placed in service after it have
    // no place in this period's balances.
    for asset in assets.iter().filter(|a| was_active_during(a, period)) {
        let idx = match rows.iter().position(|r| r.category == asset.category) {
            Some(i) => i,
            None => {
                rows.push(RollforwardRow::empty(&asset.category));
                rows.len() - 1
            }
        };

        let annual = annual_gaap_depreciation(asset, period.start.year(), warnings)?;
        let depreciation = pro_rata_depreciation(asset, annual, period);

        let row = &mut rows[idx];
        row.asset_count += 1;
        if asset.in_service_date < period.start {
            row.beginning_balance += asset.cost;
        }
        if period.contains(asset.in_service_date) {
            row.additions += asset.cost;
        }
        if asset.disposal_date().is_some_and(|d| period.contains(d)) {
            row.disposals += asset.cost;
        }
        row.depreciation += depreciation;
    }

    for row in &mut rows {
        row.ending_balance =
            row.beginning_balance + row.additions - row.disposals - row.depreciation;
    }
    rows.retain(RollforwardRow::has_activity);
    Ok(rows)
}

fn total_row(rows: &[RollforwardRow]) -> RollforwardRow {
    rows.iter()
        .fold(RollforwardRow::empty(TOTAL_LABEL), |mut acc, r| {
            acc.beginning_balance += r.beginning_balance;
            acc.additions += r.additions;
            acc.disposals += r.disposals;
            acc.depreciation += r.depreciation;
            acc.ending_balance += r.ending_balance;
            acc.asset_count += r.asset_count;
            acc
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::model::{
        AssetStatus, BookType, DepreciationSchedule, DisposalInfo, DisposalMethod,
    };
    use crate::depreciation::conventions::Convention;
    use crate::depreciation::methods::DepreciationMethod;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn asset(id: &str, category: &str, cost: Money, in_service: NaiveDate) -> Asset {
        Asset {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            acquisition_date: in_service,
            in_service_date: in_service,
            cost,
            location: String::new(),
            department: String::new(),
            serial_number: None,
            status: AssetStatus::Active,
            category: category.into(),
            sub_category: None,
            depreciation_schedules: Vec::new(),
            last_depreciation_date: None,
            accumulated_depreciation: Decimal::ZERO,
            net_book_value: cost,
            disposal_info: None,
            basis_adjustments: None,
        }
    }

    fn with_stored_gaap(mut a: Asset, annual: Money) -> Asset {
        a.depreciation_schedules.push(DepreciationSchedule {
            id: format!("{}-GAAP", a.id),
            method: DepreciationMethod::StraightLine,
            life: 10,
            salvage_value: Decimal::ZERO,
            convention: Convention::FullMonth,
            book: BookType::Gaap,
            tax_code: None,
            depreciation: Some(annual),
        });
        a
    }

    fn h1_2024() -> ReportingPeriod {
        ReportingPeriod::new(d(2024, 1, 1), d(2024, 6, 30)).unwrap()
    }

    #[test]
    fn test_single_addition_mid_period() {
        let assets = vec![asset("A", "IT", dec!(10000), d(2024, 3, 15))];
        let rows = rollforward_rows(&assets, &h1_2024()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.additions, dec!(10000));
        assert_eq!(row.beginning_balance, Decimal::ZERO);
        assert_eq!(row.ending_balance, dec!(10000) - row.depreciation);
    }

    #[test]
    fn test_pro_rata_by_days() {
        // 2024-01-01 .. 2024-06-30 is 181 days apart
        let a = with_stored_gaap(asset("A", "IT", dec!(36500), d(2020, 1, 1)), dec!(3650));
        let rows = rollforward_rows(&[a], &h1_2024()).unwrap();
        assert_eq!(rows[0].depreciation, dec!(1810));
        assert_eq!(rows[0].beginning_balance, dec!(36500));
        assert_eq!(rows[0].ending_balance, dec!(34690));
    }

    #[test]
    fn test_disposal_within_period() {
        let mut a =
            with_stored_gaap(asset("A", "Vehicles", dec!(20000), d(2019, 1, 1)), dec!(3650));
        a.status = AssetStatus::Disposed;
        a.disposal_info = Some(DisposalInfo {
            date: d(2024, 1, 11),
            proceeds: dec!(4000),
            method: DisposalMethod::Sale,
            reason: "Fleet renewal".into(),
            notes: None,
        });
        let rows = rollforward_rows(&[a], &h1_2024()).unwrap();
        assert_eq!(rows[0].disposals, dec!(20000));
        // 10 days in service during the period
        assert_eq!(rows[0].depreciation, dec!(100));
        assert_eq!(rows[0].ending_balance, dec!(-100));
    }

    #[test]
    fn test_inactive_category_dropped() {
        let assets = vec![
            asset("A", "IT", dec!(5000), d(2024, 2, 1)),
            asset("F", "Furniture", dec!(900), d(2024, 9, 1)),
        ];
        let rows = rollforward_rows(&assets, &h1_2024()).unwrap();
        let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["IT"]);
    }

    #[test]
    fn test_categories_keep_first_appearance_order() {
        let assets = vec![
            asset("B", "Vehicles", dec!(100), d(2023, 2, 1)),
            asset("A", "IT", dec!(100), d(2023, 2, 1)),
            asset("C", "Vehicles", dec!(100), d(2023, 2, 1)),
        ];
        let rows = rollforward_rows(&assets, &h1_2024()).unwrap();
        assert_eq!(rows[0].category, "Vehicles");
        assert_eq!(rows[0].asset_count, 2);
        assert_eq!(rows[1].category, "IT");
    }

    #[test]
    fn test_total_row_and_missing_gaap_warning() {
        let input = RollforwardInput {
            assets: vec![
                asset("A", "IT", dec!(1000), d(2023, 5, 1)),
                asset("B", "Vehicles", dec!(2500), d(2024, 4, 1)),
            ],
            period: h1_2024(),
        };
        let out = calculate_rollforward(&input).unwrap();
        let totals = &out.result.totals;
        assert_eq!(totals.category, "Total");
        assert_eq!(totals.beginning_balance, dec!(1000));
        assert_eq!(totals.additions, dec!(2500));
        assert_eq!(totals.ending_balance, dec!(3500));
        assert_eq!(totals.asset_count, 2);
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_asset_disposed_before_period_is_excluded() {
        let mut scrapped =
            with_stored_gaap(asset("S", "IT", dec!(10000), d(2019, 1, 1)), dec!(1000));
        scrapped.status = AssetStatus::Disposed;
        scrapped.disposal_info = Some(DisposalInfo {
            date: d(2022, 3, 1),
            proceeds: Decimal::ZERO,
            method: DisposalMethod::Scrapped,
            reason: "Obsolete".into(),
            notes: None,
        });
        let kept = asset("K", "IT", dec!(2000), d(2023, 5, 1));

        let rows = rollforward_rows(&[scrapped.clone()], &h1_2024()).unwrap();
        assert!(rows.is_empty(), "Expected no rows, got {:?}", rows);

        let rows = rollforward_rows(&[scrapped, kept], &h1_2024()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].beginning_balance, dec!(2000));
        assert_eq!(rows[0].ending_balance, dec!(2000));
        assert_eq!(rows[0].asset_count, 1);
    }

    #[test]
    fn test_inverted_period_rejected() {
        let input = RollforwardInput {
            assets: Vec::new(),
            period: ReportingPeriod {
                start: d(2024, 6, 30),
                end: d(2024, 1, 1),
            },
        };
        assert!(calculate_rollforward(&input).is_err());
    }

    #[test]
    fn test_derived_annual_amount_when_not_stored() {
        let mut a = asset("A", "Machinery", dec!(10000), d(2022, 7, 1));
        a.depreciation_schedules.push(DepreciationSchedule {
            id: "S".into(),
            method: DepreciationMethod::StraightLine,
            life: 5,
            salvage_value: Decimal::ZERO,
            convention: Convention::HalfYear,
            book: BookType::Gaap,
            tax_code: None,
            depreciation: None,
        });
        let full_2024 = ReportingPeriod::calendar_year(2024).unwrap();
        let rows = rollforward_rows(&[a], &full_2024).unwrap();
        // 2024 row is 2000; 365 of 365 days
        assert_eq!(rows[0].depreciation, dec!(2000));
    }
}
