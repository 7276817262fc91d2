//! Gain or loss on disposal, measured against NBV as of the disposal date.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::DAYS_IN_YEAR;
use crate::asset::model::{Asset, AssetStatus, DisposalMethod};
use crate::asset::validation::validate_asset;
use crate::depreciation::schedule::build_schedule;
use crate::error::FixedAssetError;
use crate::types::{with_metadata, ComputationOutput, Money, ReportingPeriod};
use crate::FixedAssetResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalReportInput {
    pub assets: Vec<Asset>,
    pub period: ReportingPeriod,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Where a line's NBV came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NbvSource {
    /// Derived from the GAAP schedule as of the disposal date
    GaapSchedule,
    /// The NBV recorded on the asset
    Recorded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalLine {
    pub asset_id: String,
    pub asset_name: String,
    pub category: String,
    pub disposal_date: NaiveDate,
    pub method: DisposalMethod,
    pub cost: Money,
    pub accumulated_depreciation: Money,
    pub net_book_value: Money,
    pub nbv_source: NbvSource,
    pub proceeds: Money,
    /// Positive = gain, negative = loss
    pub gain_loss: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalReportOutput {
    pub period: ReportingPeriod,
    pub disposals: Vec<DisposalLine>,
    pub total_cost: Money,
    pub total_net_book_value: Money,
    pub total_proceeds: Money,
    pub total_gain_loss: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// proceeds - net book value. Positive is a gain, negative a loss.
pub fn gain_loss(proceeds: Money, net_book_value: Money) -> Money {
    proceeds - net_book_value
}

/// GAAP net book value of `asset` on `date`, or `None` when the asset has
/// no GAAP schedule.
///
/// Uses the schedule row for the date's calendar year, depreciating that
/// row's amount by the share of the year elapsed (days / 365), counted from
/// the in-service date in the first year. Dates before
/// the first row return cost; dates after the last row return the final NBV.
pub fn net_book_value_at(asset: &Asset, date: NaiveDate) -> FixedAssetResult<Option<Money>> {
    let Some(schedule) = asset.gaap_schedule() else {
        return Ok(None);
    };
    let built = build_schedule(asset, schedule)?;

    let (Some(first), Some(last)) = (built.rows.first(), built.rows.last()) else {
        return Ok(Some(asset.cost));
    };
    if date.year() < first.year {
        return Ok(Some(built.basis));
    }
    if date.year() > last.year {
        return Ok(Some(built.final_nbv));
    }

    let nbv = built
        .rows
        .iter()
        .find(|r| r.year == date.year())
        .map(|row| {
            let fraction = year_elapsed_fraction(date, asset.in_service_date);
            (row.beginning_nbv - row.depreciation * fraction).max(built.salvage_value)
        })
        .unwrap_or(built.final_nbv);
    Ok(Some(nbv))
}

/// Evaluate one disposed asset.
pub fn evaluate_disposal(
    asset: &Asset,
    warnings: &mut Vec<String>,
) -> FixedAssetResult<DisposalLine> {
    let disposal = asset
        .disposal_info
        .as_ref()
        .ok_or_else(|| FixedAssetError::InvalidInput {
            field: "disposal_info".into(),
            reason: format!("Asset {} has no disposal details", asset.id),
        })?;

    let (net_book_value, nbv_source) = match net_book_value_at(asset, disposal.date)? {
        Some(nbv) => (nbv, NbvSource::GaapSchedule),
        None => {
            tracing::warn!(
                asset_id = %asset.id,
                "no GAAP schedule; using recorded NBV for disposal"
            );
            warnings.push(format!(
                "Asset {} has no GAAP schedule; recorded NBV {} used for disposal",
                asset.id, asset.net_book_value
            ));
            (asset.net_book_value, NbvSource::Recorded)
        }
    };

    Ok(DisposalLine {
        asset_id: asset.id.clone(),
        asset_name: asset.name.clone(),
        category: asset.category.clone(),
        disposal_date: disposal.date,
        method: disposal.method,
        cost: asset.cost,
        accumulated_depreciation: asset.cost - net_book_value,
        net_book_value,
        nbv_source,
        proceeds: disposal.proceeds,
        gain_loss: gain_loss(disposal.proceeds, net_book_value),
    })
}

/// Disposed assets whose disposal date falls within the period, with totals.
pub fn disposal_report(
    input: &DisposalReportInput,
) -> FixedAssetResult<ComputationOutput<DisposalReportOutput>> {
    let start = Instant::now();
    input.period.validate()?;

    let mut warnings = Vec::new();
    let mut disposals = Vec::new();
    for asset in input
        .assets
        .iter()
        .filter(|a| a.status == AssetStatus::Disposed)
    {
        validate_asset(asset)?;
        match asset.disposal_date() {
            Some(date) if input.period.contains(date) => {
                disposals.push(evaluate_disposal(asset, &mut warnings)?);
            }
            Some(_) => {}
            None => warnings.push(format!(
                "Asset {} is marked disposed but has no disposal details; skipped",
                asset.id
            )),
        }
    }

    let total_cost = disposals.iter().map(|l| l.cost).sum();
    let total_net_book_value = disposals.iter().map(|l| l.net_book_value).sum();
    let total_proceeds = disposals.iter().map(|l| l.proceeds).sum();
    let total_gain_loss = disposals.iter().map(|l| l.gain_loss).sum();

    tracing::debug!(disposals = disposals.len(), "evaluated disposals");

    let output = DisposalReportOutput {
        period: input.period,
        disposals,
        total_cost,
        total_net_book_value,
        total_proceeds,
        total_gain_loss,
    };

    Ok(with_metadata(
        "Gain/(loss) = proceeds - GAAP NBV at disposal date",
        &serde_json::json!({
            "period": input.period,
            "asset_count": input.assets.len(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Days from January 1 of the date's year, or from the in-service date when
/// later, over 365. Clamped to [0, 1].
fn year_elapsed_fraction(date: NaiveDate, in_service: NaiveDate) -> Decimal {
    let year_start = date - chrono::Days::new(u64::from(date.ordinal0()));
    let from = year_start.max(in_service);
    let elapsed = Decimal::from((date - from).num_days().max(0));
    (elapsed / DAYS_IN_YEAR).min(Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::model::{BookType, DepreciationSchedule, DisposalInfo};
    use crate::depreciation::conventions::Convention;
    use crate::depreciation::methods::DepreciationMethod;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Straight-line, 5 years, full-month: 2000 per year from 2020.
    fn disposed_truck(date: NaiveDate, proceeds: Money) -> Asset {
        Asset {
            id: "T-9".into(),
            name: "Box truck".into(),
            description: String::new(),
            acquisition_date: d(2020, 1, 1),
            in_service_date: d(2020, 1, 1),
            cost: dec!(10000),
            location: String::new(),
            department: String::new(),
            serial_number: None,
            status: AssetStatus::Disposed,
            category: "Vehicles".into(),
            sub_category: None,
            depreciation_schedules: vec![DepreciationSchedule {
                id: "T-9-GAAP".into(),
                method: DepreciationMethod::StraightLine,
                life: 5,
                salvage_value: Decimal::ZERO,
                convention: Convention::FullMonth,
                book: BookType::Gaap,
                tax_code: None,
                depreciation: Some(dec!(2000)),
            }],
            last_depreciation_date: None,
            accumulated_depreciation: dec!(6000),
            net_book_value: dec!(4000),
            disposal_info: Some(DisposalInfo {
                date,
                proceeds,
                method: DisposalMethod::Sale,
                reason: "Replaced".into(),
                notes: None,
            }),
            basis_adjustments: None,
        }
    }

    #[test]
    fn test_gain_loss_sign() {
        assert_eq!(gain_loss(dec!(5000), dec!(7000)), dec!(-2000));
        assert_eq!(gain_loss(dec!(7000), dec!(5000)), dec!(2000));
    }

    #[test]
    fn test_nbv_at_start_of_year() {
        // Jan 1 2023: three full years taken
        let asset = disposed_truck(d(2023, 1, 1), dec!(0));
        let nbv = net_book_value_at(&asset, d(2023, 1, 1)).unwrap().unwrap();
        assert_eq!(nbv, dec!(4000));
    }

    #[test]
    fn test_nbv_prorated_within_year() {
        let asset = disposed_truck(d(2023, 1, 1), dec!(0));
        // 2023-07-02 has ordinal0 182 => 2000 * 182 / 365
        let nbv = net_book_value_at(&asset, d(2023, 7, 2)).unwrap().unwrap();
        let expected = dec!(4000) - dec!(2000) * dec!(182) / dec!(365);
        assert!(
            (nbv - expected).abs() < dec!(0.000001),
            "Expected ~{}, got {}",
            expected,
            nbv
        );
    }

    #[test]
    fn test_nbv_in_service_year_counts_from_in_service_date() {
        let mut asset = disposed_truck(d(2023, 7, 2), dec!(0));
        asset.acquisition_date = d(2023, 7, 1);
        asset.in_service_date = d(2023, 7, 1);
        // first row is 2023; one day in service
        let nbv = net_book_value_at(&asset, d(2023, 7, 2)).unwrap().unwrap();
        let expected = dec!(10000) - dec!(2000) * dec!(1) / dec!(365);
        assert!(
            (nbv - expected).abs() < dec!(0.000001),
            "Expected ~{}, got {}",
            expected,
            nbv
        );
        assert_eq!(
            net_book_value_at(&asset, d(2023, 7, 1)).unwrap(),
            Some(dec!(10000))
        );
    }

    #[test]
    fn test_nbv_outside_schedule() {
        let asset = disposed_truck(d(2023, 1, 1), dec!(0));
        assert_eq!(
            net_book_value_at(&asset, d(2019, 6, 1)).unwrap(),
            Some(dec!(10000))
        );
        assert_eq!(
            net_book_value_at(&asset, d(2030, 6, 1)).unwrap(),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_report_filters_by_period() {
        let input = DisposalReportInput {
            assets: vec![
                disposed_truck(d(2023, 1, 1), dec!(5000)),
                disposed_truck(d(2022, 1, 1), dec!(5000)),
            ],
            period: ReportingPeriod::calendar_year(2023).unwrap(),
        };
        let out = disposal_report(&input).unwrap().result;
        assert_eq!(out.disposals.len(), 1);
        assert_eq!(out.total_cost, dec!(10000));
        assert_eq!(out.total_net_book_value, dec!(4000));
        assert_eq!(out.total_gain_loss, dec!(1000));
        assert_eq!(out.disposals[0].accumulated_depreciation, dec!(6000));
    }

    #[test]
    fn test_recorded_nbv_fallback() {
        let mut asset = disposed_truck(d(2023, 1, 1), dec!(1500));
        asset.depreciation_schedules.clear();
        let mut warnings = Vec::new();
        let line = evaluate_disposal(&asset, &mut warnings).unwrap();
        assert_eq!(line.nbv_source, NbvSource::Recorded);
        assert_eq!(line.gain_loss, dec!(-2500));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_disposed_without_details_is_warned() {
        let mut asset = disposed_truck(d(2023, 1, 1), dec!(0));
        asset.disposal_info = None;
        let input = DisposalReportInput {
            assets: vec![asset],
            period: ReportingPeriod::calendar_year(2023).unwrap(),
        };
        let out = disposal_report(&input).unwrap();
        assert!(out.result.disposals.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }
}
