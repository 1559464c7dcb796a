//! Budget allocation engine: converts a total budget, a direct-cost ratio,
//! and per-category percentage splits into absolute won amounts, and back.
//!
//! The engine is total over its numeric domain and never errors; range and
//! ratio-sum validation is the caller's job (see [`ratios_balanced`]).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

use crate::models::{Allocation, BUDGET_CATEGORIES};

/// Category name → percentage split of the direct cost.
pub(crate) type CategoryRatios = BTreeMap<String, Decimal>;

/// Allowed distance of the ratio sum from 100 when persisting a project.
/// One policy value for both creation and editing.
pub(crate) const RATIO_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// The share of the total budget subject to category allocation.
pub(crate) fn direct_cost(total_budget: i64, direct_cost_ratio: Decimal) -> Decimal {
    Decimal::from(total_budget) * direct_cost_ratio / Decimal::ONE_HUNDRED
}

/// Derives absolute per-category amounts from percentage splits.
///
/// Each amount is `floor(direct_cost * ratio / 100)`. The summed allocations
/// may fall short of the direct cost by a few won; that remainder is never
/// redistributed. Every fixed category gets an entry (missing ratio counts
/// as 0); extra categories in `ratios` are carried through the same formula.
pub(crate) fn compute_allocation(
    total_budget: i64,
    direct_cost_ratio: Decimal,
    ratios: &CategoryRatios,
) -> Allocation {
    let direct = direct_cost(total_budget, direct_cost_ratio);

    let mut allocation = Allocation::new();
    for category in BUDGET_CATEGORIES {
        let ratio = ratios.get(category).copied().unwrap_or(Decimal::ZERO);
        allocation.insert(category.to_string(), floor_won(direct * ratio));
    }
    for (category, ratio) in ratios {
        if !allocation.contains_key(category) {
            allocation.insert(category.clone(), floor_won(direct * *ratio));
        }
    }
    allocation
}

/// Recovers approximate percentage splits from stored amounts, for
/// pre-filling the edit form.
///
/// Lossy: amounts were floored, and the result is rounded to the nearest
/// whole percent, so re-saving an untouched form may shift the allocation by
/// rounding noise. A zero direct cost yields all-zero ratios.
pub(crate) fn derive_ratios(
    total_budget: i64,
    direct_cost_ratio: Decimal,
    allocation: &Allocation,
) -> CategoryRatios {
    let direct = direct_cost(total_budget, direct_cost_ratio);

    let mut ratios = CategoryRatios::new();
    for category in BUDGET_CATEGORIES {
        let amount = allocation.get(category).copied().unwrap_or(0);
        let ratio = if direct > Decimal::ZERO {
            (Decimal::from(amount) / direct * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        };
        ratios.insert(category.to_string(), ratio);
    }
    ratios
}

pub(crate) fn ratio_sum(ratios: &CategoryRatios) -> Decimal {
    ratios.values().copied().sum()
}

/// Caller-side persist check: the ratio sum must sit within
/// [`RATIO_TOLERANCE`] of 100 before the allocation is written.
pub(crate) fn ratios_balanced(ratios: &CategoryRatios) -> bool {
    (ratio_sum(ratios) - Decimal::ONE_HUNDRED).abs() <= RATIO_TOLERANCE
}

fn floor_won(share: Decimal) -> i64 {
    (share / Decimal::ONE_HUNDRED).floor().to_i64().unwrap_or(0)
}

#[cfg(test)]
mod tests;
