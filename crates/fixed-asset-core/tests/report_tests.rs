use chrono::NaiveDate;
use fixed_asset_core::asset::filter::{select_assets, AssetFilter};
use fixed_asset_core::asset::{
    Asset, AssetStatus, BasisAdjustment, BookType, DepreciationSchedule, DisposalInfo,
    DisposalMethod,
};
use fixed_asset_core::depreciation::{Convention, DepreciationMethod};
use fixed_asset_core::reports::disposal::{self, DisposalReportInput};
use fixed_asset_core::reports::rollforward::{self, RollforwardInput};
use fixed_asset_core::reports::waterfall::{self, WaterfallInput};
use fixed_asset_core::tax::basis::{self, BasisInput};
use fixed_asset_core::ReportingPeriod;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn gaap(annual: Option<Decimal>) -> DepreciationSchedule {
    DepreciationSchedule {
        id: "GAAP".into(),
        method: DepreciationMethod::StraightLine,
        life: 5,
        salvage_value: Decimal::ZERO,
        convention: Convention::FullMonth,
        book: BookType::Gaap,
        tax_code: None,
        depreciation: annual,
    }
}

fn asset(
    id: &str,
    category: &str,
    department: &str,
    cost: Decimal,
    in_service: NaiveDate,
) -> Asset {
    Asset {
        id: id.into(),
        name: format!("{category} {id}"),
        description: String::new(),
        acquisition_date: in_service,
        in_service_date: in_service,
        cost,
        location: "HQ".into(),
        department: department.into(),
        serial_number: None,
        status: AssetStatus::Active,
        category: category.into(),
        sub_category: None,
        depreciation_schedules: vec![gaap(None)],
        last_depreciation_date: None,
        accumulated_depreciation: Decimal::ZERO,
        net_book_value: cost,
        disposal_info: None,
        basis_adjustments: None,
    }
}

fn portfolio() -> Vec<Asset> {
    let mut sold = asset("V-1", "Vehicles", "Sales", dec!(30000), d(2021, 1, 1));
    sold.status = AssetStatus::Disposed;
    sold.net_book_value = dec!(12000);
    sold.disposal_info = Some(DisposalInfo {
        date: d(2024, 1, 1),
        proceeds: dec!(15000),
        method: DisposalMethod::TradedIn,
        reason: "Fleet renewal".into(),
        notes: None,
    });

    vec![
        asset("IT-1", "IT", "Ops", dec!(10000), d(2024, 3, 1)),
        asset("IT-2", "IT", "Finance", dec!(5000), d(2022, 1, 1)),
        asset("M-1", "Machinery", "Ops", dec!(50000), d(2023, 1, 1)),
        sold,
    ]
}

// ===========================================================================
// Rollforward
// ===========================================================================

#[test]
fn test_rollforward_totals_reconcile() {
    let input = RollforwardInput {
        assets: portfolio(),
        period: ReportingPeriod::calendar_year(2024).unwrap(),
    };
    let out = rollforward::calculate_rollforward(&input).unwrap().result;

    let categories: Vec<&str> = out.rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["IT", "Machinery", "Vehicles"]);

    let sum_ending: Decimal = out.rows.iter().map(|r| r.ending_balance).sum();
    assert_eq!(out.totals.ending_balance, sum_ending);
    assert_eq!(
        out.totals.ending_balance,
        out.totals.beginning_balance + out.totals.additions
            - out.totals.disposals
            - out.totals.depreciation
    );

    let vehicles = &out.rows[2];
    assert_eq!(vehicles.disposals, dec!(30000));
    // disposed on the first day: zero days active
    assert_eq!(vehicles.depreciation, Decimal::ZERO);
}

#[test]
fn test_rollforward_is_idempotent() {
    let assets = portfolio();
    let period = ReportingPeriod::calendar_year(2024).unwrap();
    let first = rollforward::rollforward_rows(&assets, &period).unwrap();
    let second = rollforward::rollforward_rows(&assets, &period).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_filter_then_aggregate() {
    let assets = portfolio();
    let period = ReportingPeriod::calendar_year(2024).unwrap();
    let filter = AssetFilter {
        department: Some("Ops".into()),
        ..Default::default()
    };
    let selected: Vec<Asset> = select_assets(&assets, &filter, &period)
        .into_iter()
        .cloned()
        .collect();
    let rows = rollforward::rollforward_rows(&selected, &period).unwrap();
    let counts: Vec<(&str, usize)> = rows
        .iter()
        .map(|r| (r.category.as_str(), r.asset_count))
        .collect();
    assert_eq!(counts, vec![("IT", 1), ("Machinery", 1)]);
}

#[test]
fn test_long_retired_asset_same_with_or_without_filter() {
    let mut scrapped = asset("V-0", "Vehicles", "Sales", dec!(10000), d(2019, 1, 1));
    scrapped.status = AssetStatus::Disposed;
    scrapped.disposal_info = Some(DisposalInfo {
        date: d(2022, 3, 1),
        proceeds: Decimal::ZERO,
        method: DisposalMethod::Scrapped,
        reason: "End of life".into(),
        notes: None,
    });
    let mut assets = portfolio();
    assets.push(scrapped);

    let period = ReportingPeriod::calendar_year(2024).unwrap();
    let raw = rollforward::rollforward_rows(&assets, &period).unwrap();
    let selected: Vec<Asset> = select_assets(&assets, &AssetFilter::default(), &period)
        .into_iter()
        .cloned()
        .collect();
    let filtered = rollforward::rollforward_rows(&selected, &period).unwrap();

    assert_eq!(raw, filtered);
    let vehicles = raw.iter().find(|r| r.category == "Vehicles").unwrap();
    assert_eq!(vehicles.asset_count, 1);
    assert_eq!(vehicles.beginning_balance, dec!(30000));
}

// ===========================================================================
// Disposals and waterfall
// ===========================================================================

#[test]
fn test_disposal_report_uses_nbv_at_disposal_date() {
    let input = DisposalReportInput {
        assets: portfolio(),
        period: ReportingPeriod::calendar_year(2024).unwrap(),
    };
    let out = disposal::disposal_report(&input).unwrap().result;
    assert_eq!(out.disposals.len(), 1);
    let line = &out.disposals[0];
    // 6000 per year for 2021..2023 => 12000 NBV on 2024-01-01
    assert_eq!(line.net_book_value, dec!(12000));
    assert_eq!(line.gain_loss, dec!(3000));
    assert_eq!(line.method, DisposalMethod::TradedIn);
}

#[test]
fn test_waterfall_over_portfolio() {
    let input = WaterfallInput {
        assets: portfolio(),
        period: ReportingPeriod::calendar_year(2024).unwrap(),
    };
    let out = waterfall::calculate_waterfall(&input).unwrap().result;
    assert_eq!(out.additions, dec!(10000));
    assert_eq!(out.disposals, dec!(12000));
    assert_eq!(out.ending_balance, dec!(65000));
    assert_eq!(
        out.beginning_balance + out.additions - out.depreciation - out.disposals,
        out.ending_balance
    );
}

// ===========================================================================
// Tax basis
// ===========================================================================

#[test]
fn test_basis_reference_amount() {
    let input = BasisInput {
        cost: dec!(100000),
        adjustments: BasisAdjustment {
            section_179: dec!(20000),
            section_168k: dec!(10000),
            special_depreciation: Decimal::ZERO,
            other_adjustments: Decimal::ZERO,
            notes: None,
        },
    };
    let out = basis::calculate_adjusted_basis(&input).unwrap().result;
    assert_eq!(out.adjusted_basis, dec!(70000));
}
