//! Year-by-year depreciation schedules.
//!
//! Walks an asset's life one whole year at a time, pricing each period with
//! [`depreciation_amount`] and prorating the first with
//! [`adjust_for_convention`]. Ending NBV is floored at salvage value; the
//! depreciation column shows the uncapped amount.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::conventions::{adjust_for_convention, Convention};
use super::methods::{depreciation_amount, DepreciationMethod};
use crate::asset::model::{Asset, BookType, DepreciationSchedule};
use crate::asset::validation::{validate_asset, validate_schedule, validate_schedule_parameters};
use crate::error::FixedAssetError;
use crate::tax::basis::adjusted_basis;
use crate::types::{with_metadata, ComputationOutput, Money, Years};
use crate::FixedAssetResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Request for a single book's schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub asset: Asset,
    /// Which book to build
    #[serde(default = "default_book")]
    pub book: BookType,
    /// Depreciate the adjusted basis (cost less elected reductions) instead
    /// of cost. Only meaningful for the Tax book.
    #[serde(default)]
    pub apply_basis_adjustments: bool,
}

fn default_book() -> BookType {
    BookType::Gaap
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One year of a schedule. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    /// Depreciation period (1-indexed)
    pub period: u32,
    /// Calendar year label
    pub year: i32,
    pub beginning_nbv: Money,
    /// Convention-adjusted amount, before the salvage floor
    pub depreciation: Money,
    /// max(beginning - depreciation, salvage)
    pub ending_nbv: Money,
}

/// A fully built schedule for one book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub asset_id: String,
    pub schedule_id: String,
    pub book: BookType,
    pub method: DepreciationMethod,
    pub convention: Convention,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
    pub life: Years,
    /// Amount depreciated from: cost, or adjusted basis when requested
    pub basis: Money,
    pub salvage_value: Money,
    pub rows: Vec<YearRow>,
    /// Sum of the depreciation column
    pub total_depreciation: Money,
    /// basis - total_depreciation
    pub remaining_value: Money,
    /// Ending NBV of the final year
    pub final_nbv: Money,
}

/// Per-book summary line of the asset report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookTotal {
    pub book: BookType,
    pub total_depreciation: Money,
    pub remaining_value: Money,
}

/// Every schedule of one asset, built independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDepreciationReport {
    pub asset_id: String,
    pub asset_name: String,
    pub cost: Money,
    pub in_service_date: NaiveDate,
    /// Longest life across the asset's schedules
    pub years: Years,
    pub schedules: Vec<ScheduleOutput>,
    pub totals: Vec<BookTotal>,
    /// Cost less elected basis reductions, shown beside the Tax schedule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_adjusted_basis: Option<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the year rows for `schedule` on the asset's cost.
pub fn build_schedule(
    asset: &Asset,
    schedule: &DepreciationSchedule,
) -> FixedAssetResult<ScheduleOutput> {
    validate_schedule(asset, schedule)?;
    build_on_basis(asset, schedule, asset.cost)
}

/// Build the year rows for `schedule` on an explicit depreciable basis.
pub fn build_schedule_on_basis(
    asset: &Asset,
    schedule: &DepreciationSchedule,
    basis: Money,
) -> FixedAssetResult<ScheduleOutput> {
    validate_schedule_parameters(basis, schedule, &asset.schedule_context(schedule))?;
    build_on_basis(asset, schedule, basis)
}

/// Build `schedule` on a basis reduced by tax elections. When the reductions
/// leave less than the salvage value, salvage is held at the adjusted basis
/// and a warning is recorded instead of rejecting the schedule.
pub fn build_schedule_on_adjusted_basis(
    asset: &Asset,
    schedule: &DepreciationSchedule,
    basis: Money,
    warnings: &mut Vec<String>,
) -> FixedAssetResult<ScheduleOutput> {
    if schedule.salvage_value <= basis {
        return build_schedule_on_basis(asset, schedule, basis);
    }

    tracing::warn!(
        asset_id = %asset.id,
        schedule_id = %schedule.id,
        salvage = %schedule.salvage_value,
        basis = %basis,
        "salvage above adjusted basis; capping salvage"
    );
    warnings.push(format!(
        "Asset {} schedule {}: salvage value {} exceeds adjusted basis {}; salvage held at {}",
        asset.id, schedule.id, schedule.salvage_value, basis, basis
    ));
    let capped = DepreciationSchedule {
        salvage_value: basis,
        ..schedule.clone()
    };
    build_schedule_on_basis(asset, &capped, basis)
}

/// Year rows for a schedule, starting at `first_year`.
///
/// Beginning NBV of period 1 is `basis`; each later period starts from the
/// prior period's ending NBV.
pub fn year_rows(
    basis: Money,
    salvage: Money,
    life: Years,
    method: DepreciationMethod,
    convention: Convention,
    first_year: i32,
) -> FixedAssetResult<Vec<YearRow>> {
    let mut rows = Vec::with_capacity(life as usize);
    let mut beginning_nbv = basis;

    for period in 1..=life {
        let raw = depreciation_amount(basis, salvage, life, method, period)?;
        let depreciation = adjust_for_convention(raw, convention, period == 1);
        let ending_nbv = (beginning_nbv - depreciation).max(salvage);

        rows.push(YearRow {
            period,
            year: first_year + (period - 1) as i32,
            beginning_nbv,
            depreciation,
            ending_nbv,
        });
        beginning_nbv = ending_nbv;
    }

    Ok(rows)
}

/// Build the requested book's schedule, wrapped with methodology metadata.
pub fn calculate_schedule(
    request: &ScheduleRequest,
) -> FixedAssetResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let asset = &request.asset;
    validate_asset(asset)?;

    let schedule = asset.schedule(request.book).ok_or_else(|| {
        FixedAssetError::configuration(
            asset.context(),
            "book_type",
            format!("Asset has no {} schedule", request.book),
        )
    })?;

    let basis = if request.apply_basis_adjustments {
        asset
            .basis_adjustments
            .as_ref()
            .map_or(asset.cost, |a| adjusted_basis(asset.cost, a))
    } else {
        asset.cost
    };
    let mut warnings = Vec::new();
    let output = build_schedule_on_adjusted_basis(asset, schedule, basis, &mut warnings)?;
    warnings.extend(schedule_warnings(&output));

    let methodology = format!(
        "{} {} schedule, {} convention",
        output.book, output.method, output.convention
    );
    Ok(with_metadata(
        &methodology,
        request,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}

/// Build every schedule an asset carries. GAAP and Tax are computed
/// independently on cost.
pub fn depreciation_report(
    asset: &Asset,
) -> FixedAssetResult<ComputationOutput<AssetDepreciationReport>> {
    let start = Instant::now();
    validate_asset(asset)?;

    let mut warnings = Vec::new();
    let mut schedules = Vec::with_capacity(asset.depreciation_schedules.len());
    for schedule in &asset.depreciation_schedules {
        let output = build_on_basis(asset, schedule, asset.cost)?;
        warnings.extend(schedule_warnings(&output));
        schedules.push(output);
    }
    if schedules.is_empty() {
        warnings.push(format!("Asset {} has no depreciation schedules", asset.id));
    }

    let totals = schedules
        .iter()
        .map(|s| BookTotal {
            book: s.book,
            total_depreciation: s.total_depreciation,
            remaining_value: s.remaining_value,
        })
        .collect();

    let tax_adjusted_basis = match (&asset.basis_adjustments, asset.tax_schedule()) {
        (Some(adjustments), Some(_)) => Some(adjusted_basis(asset.cost, adjustments)),
        _ => None,
    };

    let report = AssetDepreciationReport {
        asset_id: asset.id.clone(),
        asset_name: asset.name.clone(),
        cost: asset.cost,
        in_service_date: asset.in_service_date,
        years: asset
            .depreciation_schedules
            .iter()
            .map(|s| s.life)
            .max()
            .unwrap_or(0),
        schedules,
        totals,
        tax_adjusted_basis,
    };

    Ok(with_metadata(
        "Per-book depreciation schedules from the in-service year",
        asset,
        warnings,
        start.elapsed().as_micros() as u64,
        report,
    ))
}

/// Depreciation the schedule assigns to calendar `year`, zero outside its life.
pub fn depreciation_for_year(output: &ScheduleOutput, year: i32) -> Money {
    output
        .rows
        .iter()
        .find(|r| r.year == year)
        .map(|r| r.depreciation)
        .unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_on_basis(
    asset: &Asset,
    schedule: &DepreciationSchedule,
    basis: Money,
) -> FixedAssetResult<ScheduleOutput> {
    let rows = year_rows(
        basis,
        schedule.salvage_value,
        schedule.life,
        schedule.method,
        schedule.convention,
        asset.in_service_date.year(),
    )?;

    let total_depreciation: Money = rows.iter().map(|r| r.depreciation).sum();
    let final_nbv = rows.last().map(|r| r.ending_nbv).unwrap_or(basis);

    tracing::debug!(
        asset_id = %asset.id,
        schedule_id = %schedule.id,
        book = %schedule.book,
        method = %schedule.method,
        rows = rows.len(),
        "built depreciation schedule"
    );

    Ok(ScheduleOutput {
        asset_id: asset.id.clone(),
        schedule_id: schedule.id.clone(),
        book: schedule.book,
        method: schedule.method,
        convention: schedule.convention,
        tax_code: schedule.tax_code.clone(),
        life: schedule.life,
        basis,
        salvage_value: schedule.salvage_value,
        rows,
        total_depreciation,
        remaining_value: basis - total_depreciation,
        final_nbv,
    })
}

fn schedule_warnings(output: &ScheduleOutput) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(row) = output
        .rows
        .iter()
        .find(|r| r.beginning_nbv - r.depreciation < output.salvage_value)
    {
        warnings.push(format!(
            "{} schedule {}: year {} depreciation {} exceeds the amount above salvage; \
             ending NBV held at {}",
            output.book, output.schedule_id, row.year, row.depreciation, output.salvage_value
        ));
    }

    if output.method == DepreciationMethod::DecliningBalance
        && output.final_nbv > output.salvage_value
    {
        warnings.push(format!(
            "{} schedule {}: declining balance leaves {} above salvage at end of life \
             (no straight-line switch)",
            output.book,
            output.schedule_id,
            output.final_nbv - output.salvage_value
        ));
    }

    if output.method == DepreciationMethod::UnitsOfProduction {
        warnings.push(format!(
            "{} schedule {}: units-of-production computed as straight-line (no usage data)",
            output.book, output.schedule_id
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
