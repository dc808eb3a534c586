//! Pricing engine: applies inflation events to the resource price list.

use crate::events::{EventEffect, InflationEvent};
use crate::numbers::{i64_to_f64, round_half_up_to_i32, round_half_up_to_i64};
use crate::resources::PricedResource;

/// Reprice every resource under `event`.
///
/// Each resource takes the first effect whose category is unset or equals its
/// own; unmatched resources keep their price and report no change. The input
/// slice is left untouched.
#[must_use]
pub fn apply_event(prices: &[PricedResource], event: &InflationEvent) -> Vec<PricedResource> {
    prices
        .iter()
        .map(|resource| reprice(resource, event.matching_effect(resource.category())))
        .collect()
}

/// Reprice a single resource under an optional effect.
#[must_use]
pub fn reprice(resource: &PricedResource, effect: Option<&EventEffect>) -> PricedResource {
    let previous_price = resource.price;
    let (price, percentage_change) = effect.map_or((previous_price, 0), |effect| {
        (
            scaled_price(previous_price, effect.multiplier),
            percentage_for(effect.multiplier),
        )
    });
    PricedResource {
        resource: resource.resource.clone(),
        price,
        previous_price,
        percentage_change,
    }
}

/// `round(price * multiplier)` with half-up rounding.
#[must_use]
pub fn scaled_price(price: i64, multiplier: f64) -> i64 {
    round_half_up_to_i64(i64_to_f64(price) * multiplier)
}

/// `round((multiplier - 1) * 100)` with half-up rounding.
#[must_use]
pub fn percentage_for(multiplier: f64) -> i32 {
    round_half_up_to_i32((multiplier - 1.0) * 100.0)
}

/// Sum of the current prices of every required resource.
#[must_use]
pub fn required_expenses(prices: &[PricedResource]) -> i64 {
    prices
        .iter()
        .filter(|resource| resource.is_required())
        .fold(0_i64, |total, resource| total.saturating_add(resource.price))
}
