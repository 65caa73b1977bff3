// Recipe math: water-fill volume to wax/fragrance quantities and material cost.

use crate::catalog::{WickCatalog, WickKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// $157.64 for 45 lb (720 oz) of wax, no promo
pub const DEFAULT_WAX_COST_PER_OZ: f64 = 157.64 / 720.0;
// 1 oz of water fits ~0.9 oz of wax in the same jar
pub const DEFAULT_WATER_TO_WAX_RATIO: f64 = 0.90;
// 8% fragrance oil by wax weight
pub const DEFAULT_FRAGRANCE_LOAD: f64 = 0.08;

/// Session-wide assumptions, adjustable per run but not persisted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub wax_cost_per_oz: f64,
    pub water_to_wax_ratio: f64,
    pub fragrance_load: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wax_cost_per_oz: DEFAULT_WAX_COST_PER_OZ,
            water_to_wax_ratio: DEFAULT_WATER_TO_WAX_RATIO,
            fragrance_load: DEFAULT_FRAGRANCE_LOAD,
        }
    }
}

/// Quantities and cost breakdown for one candle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecipeResult {
    pub wax_oz: f64,
    pub fragrance_oz: f64,
    pub wax_cost: f64,
    pub fragrance_cost: f64,
    pub wick_cost: f64,
    pub total_material_cost: f64,
    pub cost_per_wax_oz: f64,
}

/// Converts a jar's water-fill volume into wax and fragrance quantities and
/// aggregates the material cost. A water volume of zero or less yields
/// all-zero results rather than an error; the caller gates on positivity
/// before showing anything.
pub fn compute_materials(
    water_oz: f64,
    wax_cost_per_oz: f64,
    water_to_wax_ratio: f64,
    fragrance_load: f64,
    fo_cost_per_oz: f64,
    wick_cost: f64,
) -> RecipeResult {
    let wax_oz = water_oz * water_to_wax_ratio;
    let fragrance_oz = wax_oz * fragrance_load;

    let wax_cost = wax_oz * wax_cost_per_oz;
    let fragrance_cost = fragrance_oz * fo_cost_per_oz;

    let total_material_cost = wax_cost + fragrance_cost + wick_cost;
    let cost_per_wax_oz = if wax_oz > 0.0 {
        total_material_cost / wax_oz
    } else {
        0.0
    };

    RecipeResult {
        wax_oz,
        fragrance_oz,
        wax_cost,
        fragrance_cost,
        wick_cost,
        total_material_cost,
        cost_per_wax_oz,
    }
}

/// Total wick cost for a candle. Counts for wick types missing from the
/// catalog contribute nothing; the [0, 10] per-type bound is enforced by the
/// caller, not here.
pub fn sum_wick_cost(wicks: &WickCatalog, counts: &HashMap<WickKey, u32>) -> f64 {
    counts
        .iter()
        .filter_map(|(key, count)| {
            wicks
                .cost_per_wick(key)
                .map(|cost| cost * f64::from(*count))
        })
        .sum()
}
