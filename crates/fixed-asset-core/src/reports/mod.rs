//! Period-bounded aggregates over many assets.

pub mod disposal;
pub mod rollforward;
pub mod waterfall;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::asset::model::Asset;
use crate::depreciation::schedule::{build_schedule, depreciation_for_year};
use crate::types::Money;
use crate::FixedAssetResult;

/// Days per year used for pro-rata depreciation.
pub const DAYS_IN_YEAR: Decimal = dec!(365);

/// Annual GAAP depreciation of `asset` for calendar `year`.
///
/// Prefers the amount stored on the GAAP schedule by the record collaborator;
/// when none is stored the schedule is built and the row for `year` is used.
/// An asset without a GAAP schedule contributes zero and a warning.
pub(crate) fn annual_gaap_depreciation(
    asset: &Asset,
    year: i32,
    warnings: &mut Vec<String>,
) -> FixedAssetResult<Money> {
    let Some(schedule) = asset.gaap_schedule() else {
        tracing::warn!(asset_id = %asset.id, "no GAAP schedule; depreciation treated as zero");
        warnings.push(format!(
            "Asset {} has no GAAP schedule; depreciation treated as zero",
            asset.id
        ));
        return Ok(Decimal::ZERO);
    };

    if let Some(stored) = schedule.depreciation {
        return Ok(stored);
    }

    let built = build_schedule(asset, schedule)?;
    Ok(depreciation_for_year(&built, year))
}
