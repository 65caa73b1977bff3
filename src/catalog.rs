// Fragrance oil and wick catalogs: built-in cost tables plus user-added scents.

use crate::engine::{EngineError, ErrorCode};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ScentKey = String;
pub type WickKey = String;

// 34 wicks in the last order, $7.50 shipping spread across them
pub const SHIPPING_PER_WICK: f64 = 7.50 / 34.0;

/// Derives a catalog key from a display name: trim, lowercase, spaces to
/// underscores. Collisions silently overwrite; that is the intended behavior
/// for re-adding the same scent or container with fresher numbers.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Inverse of `normalize_key` for display: underscores to spaces, Title Case.
pub fn pretty_name(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .join(" ")
}

/// A scent added by the user from a bottle purchase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomScent {
    pub key: ScentKey,
    pub cost_per_oz: f64,
}

impl CustomScent {
    /// Builds a custom scent from a bottle size and total price (shipping
    /// included if the user wants it counted).
    pub fn new(name: &str, bottle_oz: f64, total_cost: f64) -> Result<Self, EngineError> {
        if name.trim().is_empty() {
            return Err(EngineError {
                code: ErrorCode::Validation,
                message: "Please enter a scent name".to_string(),
            });
        }
        if bottle_oz <= 0.0 || total_cost <= 0.0 {
            return Err(EngineError {
                code: ErrorCode::Validation,
                message: "Bottle size and cost must both be greater than 0".to_string(),
            });
        }
        Ok(Self {
            key: normalize_key(name),
            cost_per_oz: total_cost / bottle_oz,
        })
    }
}

/// Cost-per-ounce table of fragrance oils.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScentCatalog {
    costs: HashMap<ScentKey, f64>,
}

impl ScentCatalog {
    pub fn base() -> Self {
        let costs = HashMap::from([
            ("bonfire_embers".to_string(), 38.87 / 16.0), // $29.04 + $9.83 shipping, 16 oz
            ("lavender".to_string(), 24.71 / 15.0),
            ("leather".to_string(), 27.63 / 16.0),
            ("white_eucalyptus".to_string(), 32.20 / 16.0),
            ("sandalwood".to_string(), 25.91 / 15.0),
        ]);
        Self { costs }
    }

    pub fn from_costs(costs: HashMap<ScentKey, f64>) -> Self {
        Self { costs }
    }

    /// Overlays `customs` on top of this catalog; customs win on key collision.
    pub fn merged(&self, customs: &HashMap<ScentKey, f64>) -> Self {
        let mut costs = self.costs.clone();
        for (key, cost) in customs {
            costs.insert(key.clone(), *cost);
        }
        Self { costs }
    }

    pub fn cost_per_oz(&self, key: &str) -> Option<f64> {
        self.costs.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.costs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Entries sorted by key, for stable listings.
    pub fn entries(&self) -> Vec<(ScentKey, f64)> {
        self.costs
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .collect()
    }
}

/// Cost-per-piece table of wicks, shipping share included.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WickCatalog {
    costs: HashMap<WickKey, f64>,
}

impl WickCatalog {
    pub fn base() -> Self {
        let costs = HashMap::from([
            ("wood_30mm".to_string(), 1.25 + SHIPPING_PER_WICK), // ~1.47
            ("wood_20mm".to_string(), 8.25 / 10.0 + SHIPPING_PER_WICK), // ~1.05
            ("cdn12".to_string(), 7.50 / 10.0 + SHIPPING_PER_WICK), // ~0.97
            ("cdn16".to_string(), 5.00 / 10.0 + SHIPPING_PER_WICK), // ~0.72
        ]);
        Self { costs }
    }

    pub fn cost_per_wick(&self, key: &str) -> Option<f64> {
        self.costs.get(key).copied()
    }

    pub fn entries(&self) -> Vec<(WickKey, f64)> {
        self.costs
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Pumpkin Spice "), "pumpkin_spice");
        assert_eq!(normalize_key("Leather"), "leather");
    }

    #[test]
    fn test_pretty_name() {
        assert_eq!(pretty_name("pumpkin_spice"), "Pumpkin Spice");
        assert_eq!(pretty_name("cdn12"), "Cdn12");
    }

    #[test]
    fn test_custom_scent_cost() {
        let scent = CustomScent::new("Pumpkin Spice", 16.0, 32.0).unwrap();
        assert_eq!(scent.key, "pumpkin_spice");
        assert!((scent.cost_per_oz - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_scent_rejects_blank_name() {
        let err = CustomScent::new("   ", 16.0, 32.0).unwrap_err();
        assert!(matches!(err.code, ErrorCode::Validation));
    }

    #[test]
    fn test_custom_scent_rejects_non_positive_numbers() {
        assert!(CustomScent::new("Pine", 0.0, 32.0).is_err());
        assert!(CustomScent::new("Pine", 16.0, -1.0).is_err());
    }

    #[test]
    fn test_merge_customs_override_base() {
        let base = ScentCatalog::base();
        let customs = HashMap::from([("lavender".to_string(), 9.99)]);
        let merged = base.merged(&customs);
        assert_eq!(merged.cost_per_oz("lavender"), Some(9.99));
        assert_eq!(merged.len(), base.len());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let base = ScentCatalog::base();
        let customs = HashMap::from([("pine".to_string(), 1.5)]);
        let once = base.merged(&customs);
        let twice = once.merged(&customs);
        assert_eq!(once.entries(), twice.entries());
    }

    #[test]
    fn test_base_wick_costs() {
        let wicks = WickCatalog::base();
        let wood_30 = wicks.cost_per_wick("wood_30mm").unwrap();
        assert!((wood_30 - 1.47).abs() < 0.01);
        let cdn16 = wicks.cost_per_wick("cdn16").unwrap();
        assert!((cdn16 - 0.72).abs() < 0.01);
    }
}
