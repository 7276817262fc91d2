//! Input-boundary checks. Everything the calculators assume is verified
//! here, once, before any period loop runs.

use rust_decimal::Decimal;

use super::model::{Asset, AssetStatus, BasisAdjustment, DepreciationSchedule};
use crate::error::FixedAssetError;
use crate::types::Money;
use crate::FixedAssetResult;

/// Validate a whole asset record: cost, every schedule, basis reductions
/// and disposal details.
pub fn validate_asset(asset: &Asset) -> FixedAssetResult<()> {
    validate_cost(asset)?;

    for (i, schedule) in asset.depreciation_schedules.iter().enumerate() {
        if asset.depreciation_schedules[..i]
            .iter()
            .any(|s| s.book == schedule.book)
        {
            return Err(FixedAssetError::configuration(
                asset.schedule_context(schedule),
                "book_type",
                format!("Asset already has a {} schedule", schedule.book),
            ));
        }
        validate_schedule_parameters(asset.cost, schedule, &asset.schedule_context(schedule))?;
    }

    if let Some(adjustments) = &asset.basis_adjustments {
        validate_basis_adjustment(asset.cost, adjustments, &asset.context())?;
    }

    if let Some(disposal) = &asset.disposal_info {
        if disposal.proceeds < Decimal::ZERO {
            return Err(FixedAssetError::input_range(
                asset.context(),
                "disposal_info.proceeds",
                "Disposal proceeds cannot be negative",
            ));
        }
        if asset.status != AssetStatus::Disposed {
            return Err(FixedAssetError::InvalidInput {
                field: "disposal_info".into(),
                reason: format!(
                    "Asset {} carries disposal details but its status is '{}'",
                    asset.id, asset.status
                ),
            });
        }
    }

    Ok(())
}

/// Validate the asset-level inputs a single schedule depends on.
pub fn validate_schedule(asset: &Asset, schedule: &DepreciationSchedule) -> FixedAssetResult<()> {
    validate_cost(asset)?;
    validate_schedule_parameters(asset.cost, schedule, &asset.schedule_context(schedule))
}

/// Life, salvage and basis checks for building a schedule on `basis`.
pub fn validate_schedule_parameters(
    basis: Money,
    schedule: &DepreciationSchedule,
    context: &str,
) -> FixedAssetResult<()> {
    if schedule.life == 0 {
        return Err(FixedAssetError::configuration(
            context,
            "life",
            "Useful life must be at least one year",
        ));
    }
    if schedule.salvage_value < Decimal::ZERO {
        return Err(FixedAssetError::configuration(
            context,
            "salvage_value",
            "Salvage value cannot be negative",
        ));
    }
    if schedule.salvage_value > basis {
        return Err(FixedAssetError::configuration(
            context,
            "salvage_value",
            format!(
                "Salvage value {} exceeds depreciable basis {}",
                schedule.salvage_value, basis
            ),
        ));
    }
    Ok(())
}

/// Each reduction must be non-negative and no larger than the basis left
/// after the reductions applied before it (179, 168(k), special, other).
pub fn validate_basis_adjustment(
    cost: Money,
    adjustments: &BasisAdjustment,
    context: &str,
) -> FixedAssetResult<()> {
    if cost < Decimal::ZERO {
        return Err(FixedAssetError::input_range(
            context,
            "cost",
            "Cost cannot be negative",
        ));
    }
    let mut remaining = cost;
    for (field, amount) in adjustments.ordered() {
        if amount < Decimal::ZERO {
            return Err(FixedAssetError::input_range(
                context,
                field,
                "Basis reduction cannot be negative",
            ));
        }
        if amount > remaining {
            return Err(FixedAssetError::input_range(
                context,
                field,
                format!("Reduction {amount} exceeds remaining basis {remaining}"),
            ));
        }
        remaining -= amount;
    }
    Ok(())
}

fn validate_cost(asset: &Asset) -> FixedAssetResult<()> {
    if asset.cost <= Decimal::ZERO {
        return Err(FixedAssetError::input_range(
            asset.context(),
            "cost",
            "Asset cost must be positive",
        ));
    }
    Ok(())
}
