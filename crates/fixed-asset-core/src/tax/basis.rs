//! Tax basis after elected reductions (Section 179, 168(k) bonus, special
//! depreciation allowance, other).

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::asset::model::BasisAdjustment;
use crate::asset::validation::validate_basis_adjustment;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FixedAssetResult;

/// Input for a standalone adjusted-basis computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisInput {
    pub cost: Money,
    #[serde(default)]
    pub adjustments: BasisAdjustment,
}

/// One reduction and the basis left after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisStep {
    pub reduction: String,
    pub amount: Money,
    pub remaining_basis: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisOutput {
    pub cost: Money,
    pub total_reductions: Money,
    pub adjusted_basis: Money,
    pub steps: Vec<BasisStep>,
}

/// cost - section_179 - section_168k - special_depreciation - other_adjustments
///
/// Pure arithmetic. Range checks belong to the input boundary, see
/// [`validate_basis_adjustment`].
pub fn adjusted_basis(cost: Money, adjustments: &BasisAdjustment) -> Money {
    cost - adjustments.section_179
        - adjustments.section_168k
        - adjustments.special_depreciation
        - adjustments.other_adjustments
}

/// Validate the reductions against cost, then compute the adjusted basis
/// with a step-by-step trail.
pub fn calculate_adjusted_basis(
    input: &BasisInput,
) -> FixedAssetResult<ComputationOutput<BasisOutput>> {
    let start = Instant::now();
    validate_basis_adjustment(input.cost, &input.adjustments, "basis input")?;

    let mut warnings = Vec::new();
    let mut remaining = input.cost;
    let mut steps = Vec::with_capacity(4);
    for (name, amount) in input.adjustments.ordered() {
        remaining -= amount;
        steps.push(BasisStep {
            reduction: name.to_string(),
            amount,
            remaining_basis: remaining,
        });
    }

    let result = adjusted_basis(input.cost, &input.adjustments);
    if result.is_zero() && !input.cost.is_zero() {
        warnings.push(
            "Reductions consume the entire basis; no regular depreciation remains".into(),
        );
    }

    let output = BasisOutput {
        cost: input.cost,
        total_reductions: input.adjustments.total(),
        adjusted_basis: result,
        steps,
    };

    Ok(with_metadata(
        "Cost less Section 179, 168(k), special and other basis reductions",
        input,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}
