//! Depreciation waterfall: how the book value moved over a period, and
//! where it sits by category at the end.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::annual_gaap_depreciation;
use crate::asset::filter::was_active_during;
use crate::asset::model::Asset;
use crate::asset::validation::validate_asset;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, ReportingPeriod};
use crate::FixedAssetResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallInput {
    pub assets: Vec<Asset>,
    pub period: ReportingPeriod,
}

/// Share of ending NBV held by one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryComposition {
    pub category: String,
    pub net_book_value: Money,
    pub share: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallOutput {
    pub period: ReportingPeriod,
    /// ending + depreciation + disposals - additions
    pub beginning_balance: Money,
    /// Cost of assets acquired in the period
    pub additions: Money,
    /// Annual GAAP depreciation of assets active in the period
    pub depreciation: Money,
    /// Recorded NBV of assets disposed in the period
    pub disposals: Money,
    /// Recorded NBV of assets still on the books at period end
    pub ending_balance: Money,
    pub composition: Vec<CategoryComposition>,
}

pub fn calculate_waterfall(
    input: &WaterfallInput,
) -> FixedAssetResult<ComputationOutput<WaterfallOutput>> {
    let start = Instant::now();
    let period = &input.period;
    period.validate()?;

    let mut warnings = Vec::new();
    let mut additions = Decimal::ZERO;
    let mut depreciation = Decimal::ZERO;
    let mut disposals = Decimal::ZERO;
    let mut composition: Vec<CategoryComposition> = Vec::new();

    for asset in &input.assets {
        validate_asset(asset)?;
        if asset.acquisition_date > period.end {
            continue;
        }

        if period.contains(asset.acquisition_date) {
            additions += asset.cost;
        }
        if was_active_during(asset, period) {
            depreciation += annual_gaap_depreciation(asset, period.start.year(), &mut warnings)?;
        }

        let disposed_by_end = asset.disposal_date().filter(|d| *d <= period.end);
        match disposed_by_end {
            Some(date) => {
                if date >= period.start {
                    disposals += asset.net_book_value;
                }
            }
            None => match composition.iter_mut().find(|c| c.category == asset.category) {
                Some(entry) => entry.net_book_value += asset.net_book_value,
                None => composition.push(CategoryComposition {
                    category: asset.category.clone(),
                    net_book_value: asset.net_book_value,
                    share: Decimal::ZERO,
                }),
            },
        }
    }

    let ending_balance: Money = composition.iter().map(|c| c.net_book_value).sum();
    if !ending_balance.is_zero() {
        for entry in &mut composition {
            entry.share = entry.net_book_value / ending_balance;
        }
    }

    let output = WaterfallOutput {
        period: *period,
        beginning_balance: ending_balance + depreciation + disposals - additions,
        additions,
        depreciation,
        disposals,
        ending_balance,
        composition,
    };

    Ok(with_metadata(
        "Waterfall: beginning + additions - depreciation - disposals = ending NBV",
        &serde_json::json!({
            "period": input.period,
            "asset_count": input.assets.len(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}
