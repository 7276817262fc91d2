use serde::{Deserialize, Serialize};

use super::model::{Asset, AssetStatus};
use crate::types::{Money, ReportingPeriod};

/// Caller-side selection applied before handing assets to a report.
/// Every criterion left as `None` matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AssetStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<Money>,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        self.category.as_ref().map_or(true, |c| &asset.category == c)
            && self.department.as_ref().map_or(true, |d| &asset.department == d)
            && self.status.map_or(true, |s| asset.status == s)
            && self.min_cost.map_or(true, |min| asset.cost >= min)
            && self.max_cost.map_or(true, |max| asset.cost <= max)
    }
}

/// In service on or before the period end and not disposed before it began.
pub fn was_active_during(asset: &Asset, period: &ReportingPeriod) -> bool {
    asset.in_service_date <= period.end
        && asset.disposal_date().map_or(true, |d| d >= period.start)
}

/// Assets matching `filter` that were active at some point in `period`.
pub fn select_assets<'a>(
    assets: &'a [Asset],
    filter: &AssetFilter,
    period: &ReportingPeriod,
) -> Vec<&'a Asset> {
    assets
        .iter()
        .filter(|a| filter.matches(a) && was_active_during(a, period))
        .collect()
}
