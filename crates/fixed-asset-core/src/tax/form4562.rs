//! Form 4562 (Depreciation and Amortization) working summary.
//!
//! Part I lists Section 179 candidates placed in the tax year with their
//! elected reductions and adjusted basis; Part III lists MACRS property with
//! its first-year deduction on adjusted basis.

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::basis::adjusted_basis;
use crate::asset::model::{Asset, BasisAdjustment};
use crate::asset::validation::validate_asset;
use crate::depreciation::conventions::Convention;
use crate::depreciation::methods::DepreciationMethod;
use crate::depreciation::schedule::build_schedule_on_adjusted_basis;
use crate::types::{with_metadata, ComputationOutput, Money, Years};
use crate::FixedAssetResult;

const DEFAULT_SECTION_179_LIMIT: Decimal = dec!(1000000);
const MACRS_PREFIX: &str = "MACRS";

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form4562Input {
    pub assets: Vec<Asset>,
    pub tax_year: i32,
    /// Maximum Section 179 deduction for the year
    #[serde(default = "default_section_179_limit")]
    pub section_179_limit: Money,
}

fn default_section_179_limit() -> Money {
    DEFAULT_SECTION_179_LIMIT
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Part I line: one Section 179 candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section179Line {
    pub asset_id: String,
    pub asset_name: String,
    pub cost: Money,
    pub section_179: Money,
    pub section_168k: Money,
    pub special_depreciation: Money,
    pub other_adjustments: Money,
    pub adjusted_basis: Money,
}

/// Part III line: MACRS property placed in service in the tax year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacrsLine {
    pub asset_id: String,
    pub asset_name: String,
    pub tax_code: String,
    pub method: DepreciationMethod,
    pub convention: Convention,
    pub life: Years,
    pub adjusted_basis: Money,
    pub first_year_deduction: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form4562Output {
    pub tax_year: i32,
    pub section_179_limit: Money,
    pub section_179_property: Vec<Section179Line>,
    pub total_section_179: Money,
    pub total_section_168k: Money,
    pub total_special_depreciation: Money,
    pub macrs_property: Vec<MacrsLine>,
    pub total_macrs_first_year: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn prepare_form_4562(
    input: &Form4562Input,
) -> FixedAssetResult<ComputationOutput<Form4562Output>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for asset in &input.assets {
        validate_asset(asset)?;
    }

    let placed_this_year = |a: &&Asset| a.acquisition_date.year() == input.tax_year;

    // --- Part I: Section 179 candidates ---
    let no_reductions = BasisAdjustment::default();
    let section_179_property: Vec<Section179Line> = input
        .assets
        .iter()
        .filter(placed_this_year)
        .filter(|a| a.cost <= input.section_179_limit)
        .map(|a| {
            let adj = a.basis_adjustments.as_ref().unwrap_or(&no_reductions);
            Section179Line {
                asset_id: a.id.clone(),
                asset_name: a.name.clone(),
                cost: a.cost,
                section_179: adj.section_179,
                section_168k: adj.section_168k,
                special_depreciation: adj.special_depreciation,
                other_adjustments: adj.other_adjustments,
                adjusted_basis: adjusted_basis(a.cost, adj),
            }
        })
        .collect();

    let total_section_179: Money = section_179_property.iter().map(|l| l.section_179).sum();
    let total_section_168k: Money = section_179_property.iter().map(|l| l.section_168k).sum();
    let total_special_depreciation: Money = section_179_property
        .iter()
        .map(|l| l.special_depreciation)
        .sum();

    if total_section_179 > input.section_179_limit {
        warnings.push(format!(
            "Section 179 elections of {} exceed the {} limit for {}",
            total_section_179, input.section_179_limit, input.tax_year
        ));
    }

    // --- Part III: MACRS property ---
    let mut macrs_property = Vec::new();
    for asset in input.assets.iter().filter(placed_this_year) {
        let Some(schedule) = asset.tax_schedule() else {
            continue;
        };
        let Some(tax_code) = schedule
            .tax_code
            .as_deref()
            .filter(|c| c.starts_with(MACRS_PREFIX))
        else {
            continue;
        };

        let basis = asset
            .basis_adjustments
            .as_ref()
            .map_or(asset.cost, |a| adjusted_basis(asset.cost, a));
        let built = build_schedule_on_adjusted_basis(asset, schedule, basis, &mut warnings)?;
        let first_year_deduction = built
            .rows
            .first()
            .map(|r| r.depreciation)
            .unwrap_or(Decimal::ZERO);

        macrs_property.push(MacrsLine {
            asset_id: asset.id.clone(),
            asset_name: asset.name.clone(),
            tax_code: tax_code.to_string(),
            method: schedule.method,
            convention: schedule.convention,
            life: schedule.life,
            adjusted_basis: basis,
            first_year_deduction,
        });
    }

    if macrs_property
        .iter()
        .any(|l| l.convention == Convention::MidQuarter)
    {
        warnings.push(
            "Mid-quarter property uses a single averaged first-year factor, \
             not the quarter-specific table"
                .into(),
        );
    }

    let total_macrs_first_year = macrs_property.iter().map(|l| l.first_year_deduction).sum();

    tracing::debug!(
        tax_year = input.tax_year,
        section_179_lines = section_179_property.len(),
        macrs_lines = macrs_property.len(),
        "prepared form 4562 summary"
    );

    let output = Form4562Output {
        tax_year: input.tax_year,
        section_179_limit: input.section_179_limit,
        section_179_property,
        total_section_179,
        total_section_168k,
        total_special_depreciation,
        macrs_property,
        total_macrs_first_year,
    };

    Ok(with_metadata(
        "Form 4562 Part I (Section 179) and Part III (MACRS) working summary",
        &serde_json::json!({
            "tax_year": input.tax_year,
            "section_179_limit": input.section_179_limit,
            "asset_count": input.assets.len(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
