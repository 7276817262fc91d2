use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::depreciation::conventions::Convention;
use crate::depreciation::methods::DepreciationMethod;
use crate::error::FixedAssetError;
use crate::types::{Money, Years};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of an asset record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Active,
    Inactive,
    Disposed,
}

/// Accounting book a schedule belongs to. GAAP and Tax never share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookType {
    #[serde(rename = "GAAP", alias = "gaap")]
    Gaap,
    #[serde(rename = "Tax", alias = "tax")]
    Tax,
}

/// How an asset left the books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisposalMethod {
    Sale,
    Scrapped,
    Donated,
    TradedIn,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetStatus::Active => "active",
            AssetStatus::Inactive => "inactive",
            AssetStatus::Disposed => "disposed",
        })
    }
}

impl FromStr for AssetStatus {
    type Err = FixedAssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AssetStatus::Active),
            "inactive" => Ok(AssetStatus::Inactive),
            "disposed" => Ok(AssetStatus::Disposed),
            other => Err(FixedAssetError::configuration(
                "input",
                "status",
                format!("Unsupported asset status '{other}'"),
            )),
        }
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookType::Gaap => "GAAP",
            BookType::Tax => "Tax",
        })
    }
}

impl FromStr for BookType {
    type Err = FixedAssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaap" => Ok(BookType::Gaap),
            "tax" => Ok(BookType::Tax),
            other => Err(FixedAssetError::configuration(
                "input",
                "book_type",
                format!("Unsupported book type '{other}' (expected GAAP or Tax)"),
            )),
        }
    }
}

impl fmt::Display for DisposalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisposalMethod::Sale => "sale",
            DisposalMethod::Scrapped => "scrapped",
            DisposalMethod::Donated => "donated",
            DisposalMethod::TradedIn => "traded-in",
        })
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One depreciation schedule for one book of one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub id: String,
    pub method: DepreciationMethod,
    /// Useful life in whole years (>= 1)
    pub life: Years,
    /// Floor the net book value may not depreciate below
    #[serde(default)]
    pub salvage_value: Money,
    pub convention: Convention,
    #[serde(rename = "book_type", alias = "type")]
    pub book: BookType,
    /// Tax class label, e.g. "MACRS 5-year"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
    /// Annual amount already computed and stored by the record collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation: Option<Money>,
}

/// Basis reductions elected for tax purposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasisAdjustment {
    #[serde(default)]
    pub section_179: Money,
    #[serde(default)]
    pub section_168k: Money,
    #[serde(default)]
    pub special_depreciation: Money,
    #[serde(default)]
    pub other_adjustments: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BasisAdjustment {
    pub fn total(&self) -> Money {
        self.section_179 + self.section_168k + self.special_depreciation + self.other_adjustments
    }

    /// Reductions in the order they are applied against basis.
    pub fn ordered(&self) -> [(&'static str, Money); 4] {
        [
            ("section_179", self.section_179),
            ("section_168k", self.section_168k),
            ("special_depreciation", self.special_depreciation),
            ("other_adjustments", self.other_adjustments),
        ]
    }
}

/// Attached exactly once, when an asset is disposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisposalInfo {
    pub date: NaiveDate,
    #[serde(default)]
    pub proceeds: Money,
    pub method: DisposalMethod,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A fixed asset record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub acquisition_date: NaiveDate,
    pub in_service_date: NaiveDate,
    pub cost: Money,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub status: AssetStatus,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub depreciation_schedules: Vec<DepreciationSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_depreciation_date: Option<NaiveDate>,
    #[serde(default)]
    pub accumulated_depreciation: Money,
    pub net_book_value: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposal_info: Option<DisposalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis_adjustments: Option<BasisAdjustment>,
}

impl Asset {
    pub fn schedule(&self, book: BookType) -> Option<&DepreciationSchedule> {
        self.depreciation_schedules.iter().find(|s| s.book == book)
    }

    pub fn gaap_schedule(&self) -> Option<&DepreciationSchedule> {
        self.schedule(BookType::Gaap)
    }

    pub fn tax_schedule(&self) -> Option<&DepreciationSchedule> {
        self.schedule(BookType::Tax)
    }

    pub fn disposal_date(&self) -> Option<NaiveDate> {
        self.disposal_info.as_ref().map(|d| d.date)
    }

    /// Sum of elected basis reductions, zero when none are recorded.
    pub fn basis_reduction_total(&self) -> Money {
        self.basis_adjustments
            .as_ref()
            .map(BasisAdjustment::total)
            .unwrap_or(Decimal::ZERO)
    }

    /// Error context naming this asset.
    pub fn context(&self) -> String {
        format!("asset {}", self.id)
    }

    /// Error context naming this asset and one of its schedules.
    pub fn schedule_context(&self, schedule: &DepreciationSchedule) -> String {
        format!("asset {} / schedule {}", self.id, schedule.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ASSET_JSON: &str = r#"{
        "id": "A-100",
        "name": "CNC Mill",
        "acquisition_date": "2023-02-10",
        "in_service_date": "2023-03-01",
        "cost": "250000",
        "status": "active",
        "category": "Machinery",
        "depreciation_schedules": [
            {
                "id": "S-1",
                "method": "straight-line",
                "life": 7,
                "salvage_value": "25000",
                "convention": "half-year",
                "type": "GAAP"
            },
            {
                "id": "S-2",
                "method": "declining-balance",
                "life": 7,
                "convention": "mid-quarter",
                "book_type": "Tax",
                "tax_code": "MACRS 7-year"
            }
        ],
        "net_book_value": "250000",
        "basis_adjustments": { "section_179": "20000", "section_168k": "10000" }
    }"#;

    #[test]
    fn test_deserialize_asset_wire_format() {
        let asset: Asset = serde_json::from_str(ASSET_JSON).unwrap();
        assert_eq!(asset.cost, dec!(250000));
        assert_eq!(asset.status, AssetStatus::Active);
        assert_eq!(asset.depreciation_schedules.len(), 2);

        let gaap = asset.gaap_schedule().unwrap();
        assert_eq!(gaap.method, DepreciationMethod::StraightLine);
        assert_eq!(gaap.convention, Convention::HalfYear);

        let tax = asset.tax_schedule().unwrap();
        assert_eq!(tax.salvage_value, Decimal::ZERO);
        assert_eq!(tax.tax_code.as_deref(), Some("MACRS 7-year"));
        assert_eq!(asset.basis_reduction_total(), dec!(30000));
    }

    #[test]
    fn test_unknown_method_fails_to_deserialize() {
        let bad = ASSET_JSON.replace("straight-line", "double-straight");
        let result: Result<Asset, _> = serde_json::from_str(&bad);
        assert!(result.is_err(), "Unknown method must not deserialize");
    }

    #[test]
    fn test_book_type_from_str() {
        assert_eq!("GAAP".parse::<BookType>().unwrap(), BookType::Gaap);
        assert_eq!("tax".parse::<BookType>().unwrap(), BookType::Tax);
        match "ifrs".parse::<BookType>().unwrap_err() {
            FixedAssetError::Configuration { field, .. } => assert_eq!(field, "book_type"),
            other => panic!("Expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_status_round_trips_through_display() {
        for status in [AssetStatus::Active, AssetStatus::Inactive, AssetStatus::Disposed] {
            assert_eq!(status.to_string().parse::<AssetStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_schedule_context() {
        let asset: Asset = serde_json::from_str(ASSET_JSON).unwrap();
        let tax = asset.tax_schedule().unwrap();
        assert_eq!(asset.schedule_context(tax), "asset A-100 / schedule S-2");
    }
}
