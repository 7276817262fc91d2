use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use fixed_asset_core::asset::filter::{select_assets, AssetFilter};
use fixed_asset_core::asset::Asset;
use fixed_asset_core::ReportingPeriod;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_schedule(input_json: String) -> NapiResult<String> {
    let input: fixed_asset_core::depreciation::schedule::ScheduleRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fixed_asset_core::depreciation::schedule::calculate_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn depreciation_report(asset_json: String) -> NapiResult<String> {
    let asset: Asset = serde_json::from_str(&asset_json).map_err(to_napi_error)?;
    let output = fixed_asset_core::depreciation::schedule::depreciation_report(&asset)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Period reports
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_rollforward(input_json: String) -> NapiResult<String> {
    let input: fixed_asset_core::reports::rollforward::RollforwardInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fixed_asset_core::reports::rollforward::calculate_rollforward(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn disposal_report(input_json: String) -> NapiResult<String> {
    let input: fixed_asset_core::reports::disposal::DisposalReportInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fixed_asset_core::reports::disposal::disposal_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_waterfall(input_json: String) -> NapiResult<String> {
    let input: fixed_asset_core::reports::waterfall::WaterfallInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fixed_asset_core::reports::waterfall::calculate_waterfall(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Assets matching a filter and active during the period, as a JSON array.
#[napi]
pub fn filter_assets(input_json: String) -> NapiResult<String> {
    #[derive(Deserialize)]
    struct FilterInput {
        assets: Vec<Asset>,
        period: ReportingPeriod,
        #[serde(default)]
        filter: AssetFilter,
    }

    let input: FilterInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.period.validate().map_err(to_napi_error)?;
    let selected = select_assets(&input.assets, &input.filter, &input.period);
    serde_json::to_string(&selected).map_err(to_napi_error)
}

#[napi]
pub fn gain_loss(proceeds: String, net_book_value: String) -> NapiResult<String> {
    let proceeds: Decimal = proceeds.parse().map_err(to_napi_error)?;
    let net_book_value: Decimal = net_book_value.parse().map_err(to_napi_error)?;
    Ok(fixed_asset_core::reports::disposal::gain_loss(proceeds, net_book_value).to_string())
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_adjusted_basis(input_json: String) -> NapiResult<String> {
    let input: fixed_asset_core::tax::basis::BasisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fixed_asset_core::tax::basis::calculate_adjusted_basis(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn prepare_form_4562(input_json: String) -> NapiResult<String> {
    let input: fixed_asset_core::tax::form4562::Form4562Input =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fixed_asset_core::tax::form4562::prepare_form_4562(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Returns "null" for a valid asset, otherwise the first failure as JSON
/// `{ "field": ..., "error": ... }`.
#[napi]
pub fn validate_asset(asset_json: String) -> NapiResult<String> {
    let asset: Asset = serde_json::from_str(&asset_json).map_err(to_napi_error)?;
    let outcome = match fixed_asset_core::asset::validation::validate_asset(&asset) {
        Ok(()) => serde_json::Value::Null,
        Err(e) => serde_json::json!({ "field": e.field(), "error": e.to_string() }),
    };
    serde_json::to_string(&outcome).map_err(to_napi_error)
}
